//! Profile resolution over the identity provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{IdentityProvider, IdentityProviderError, ProfileQuery};
use crate::domain::{Error, Profile, Role, UserId};

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Query { message } => {
            Error::internal(format!("identity provider error: {message}"))
        }
    }
}

/// Resolves profiles, treating accounts without a profile row as guests.
#[derive(Clone)]
pub struct ProfileService<P> {
    identity: Arc<P>,
}

impl<P> ProfileService<P> {
    /// Create a service over the given identity provider.
    pub fn new(identity: Arc<P>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl<P> ProfileQuery for ProfileService<P>
where
    P: IdentityProvider,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        let profile = self
            .identity
            .resolve(user_id)
            .await
            .map_err(map_identity_error)?;
        Ok(profile.unwrap_or_else(|| Profile {
            id: *user_id,
            role: Role::Guest,
            full_name: String::new(),
            image: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockIdentityProvider;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn accounts_without_profiles_are_guests() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().return_once(|_| Ok(None));
        let user_id = UserId::random();

        let profile = ProfileService::new(Arc::new(identity))
            .fetch_profile(&user_id)
            .await
            .expect("profile");

        assert_eq!(profile.id, user_id);
        assert_eq!(profile.role, Role::Guest);
    }

    #[rstest]
    #[tokio::test]
    async fn stored_roles_are_kept() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().return_once(|id| {
            Ok(Some(Profile {
                id: *id,
                role: Role::Admin,
                full_name: "Front Desk".to_owned(),
                image: None,
            }))
        });

        let profile = ProfileService::new(Arc::new(identity))
            .fetch_profile(&UserId::random())
            .await
            .expect("profile");

        assert_eq!(profile.actor().role(), Role::Admin);
    }

    #[rstest]
    #[tokio::test]
    async fn provider_outage_is_service_unavailable() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_resolve()
            .return_once(|_| Err(IdentityProviderError::connection("refused")));

        let err = ProfileService::new(Arc::new(identity))
            .fetch_profile(&UserId::random())
            .await
            .expect_err("outage");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
