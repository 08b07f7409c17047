//! PostgreSQL-backed `IdentityProvider` reading the `profiles` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Profile, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ProfileRow;
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the identity provider port.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    /// Create a new provider with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityProviderError {
    map_basic_pool_error(error, IdentityProviderError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityProviderError {
    map_basic_diesel_error(
        error,
        IdentityProviderError::query,
        IdentityProviderError::connection,
    )
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Profile>, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = profiles::table
            .filter(profiles::id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first::<ProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Profile::try_from(row).map_err(IdentityProviderError::query))
            .transpose()
    }
}
