//! Port resolving an authenticated account to its profile and role.

use async_trait::async_trait;

use crate::domain::{Profile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Provider connection could not be established.
        Connection { message: String } => "identity provider connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "identity provider query failed: {message}",
    }
}

/// Port for profile lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Profile for `user_id`, or `None` when the account has no profile row.
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Profile>, IdentityProviderError>;
}
