//! Driving port for sign-in and registration use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Create a guest account and return its id.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;
}
