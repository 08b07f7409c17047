//! `AccountStore` and `IdentityProvider` over the shared in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{
    AccountStore, AccountStoreError, IdentityProvider, IdentityProviderError,
};
use crate::domain::{NewAccount, Profile, StoredCredentials, UserId};

use super::{Account, InMemoryStore};

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_account(&self, account: &NewAccount) -> Result<(), AccountStoreError> {
        let mut state = self.lock(AccountStoreError::query)?;
        if state.accounts.iter().any(|stored| {
            stored.email == account.email || stored.profile.id == account.profile.id
        }) {
            return Err(AccountStoreError::duplicate("account already exists"));
        }
        state.accounts.push(Account {
            profile: account.profile.clone(),
            email: account.email.clone(),
            password: account.password.clone(),
        });
        Ok(())
    }

    async fn find_account(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountStoreError> {
        let state = self.lock(AccountStoreError::query)?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.email == email)
            .map(|account| StoredCredentials {
                user_id: account.profile.id,
                password: account.password.clone(),
            }))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryStore {
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Profile>, IdentityProviderError> {
        let state = self.lock(IdentityProviderError::query)?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.profile.id == *user_id)
            .map(|account| account.profile.clone()))
    }
}
