//! Port for stored login accounts.
//!
//! An account is a profile plus the email and password digest used to sign
//! in. Emails are stored already normalised, so lookups compare exactly.

use async_trait::async_trait;

use crate::domain::{NewAccount, StoredCredentials};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum AccountStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "account store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account store query failed: {message}",
        /// The email or account id is already taken.
        Duplicate { message: String } => "account store rejected duplicate: {message}",
    }
}

/// Port for creating accounts and reading their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Store a new account together with its profile.
    async fn insert_account(&self, account: &NewAccount) -> Result<(), AccountStoreError>;

    /// Credentials registered under `email`, if any.
    async fn find_account(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountStoreError>;
}
