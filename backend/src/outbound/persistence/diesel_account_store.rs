//! PostgreSQL-backed `AccountStore` writing sign-in columns on `profiles`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AccountStore, AccountStoreError};
use crate::domain::{NewAccount, PasswordDigest, StoredCredentials, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::NewAccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the account store port.
#[derive(Clone)]
pub struct DieselAccountStore {
    pool: DbPool,
}

impl DieselAccountStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountStoreError {
    map_basic_pool_error(error, AccountStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountStoreError {
    if is_unique_violation(&error) {
        return AccountStoreError::duplicate("account already exists");
    }
    map_basic_diesel_error(
        error,
        AccountStoreError::query,
        AccountStoreError::connection,
    )
}

#[async_trait]
impl AccountStore for DieselAccountStore {
    async fn insert_account(&self, account: &NewAccount) -> Result<(), AccountStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccountRow {
            id: *account.profile.id.as_uuid(),
            role: account.profile.role.as_str(),
            full_name: &account.profile.full_name,
            image: account.profile.image.as_deref(),
            email: &account.email,
            password_hash: account.password.as_str(),
        };
        diesel::insert_into(profiles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_account(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::email.eq(email))
            .filter(profiles::password_hash.is_not_null())
            .select((profiles::id, profiles::password_hash))
            .first::<(Uuid, Option<String>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.and_then(|(id, hash)| {
            hash.map(|hash| StoredCredentials {
                user_id: UserId::from_uuid(id),
                password: PasswordDigest::from_stored(hash),
            })
        }))
    }
}
