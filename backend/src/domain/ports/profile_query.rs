//! Driving port for resolving the caller's profile.
//!
//! Inbound adapters use this port to turn a session user id into a profile
//! and role without importing the identity adapter.

use async_trait::async_trait;

use crate::domain::{Error, Profile, UserId};

/// Domain use-case port for reading the current account's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, Error>;
}
