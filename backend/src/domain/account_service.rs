//! Sign-in and self-service registration over the account store.
//!
//! Hashing and verification run on the blocking pool so a slow Argon2 round
//! never stalls a worker's event loop.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{AccountStore, AccountStoreError, LoginService};
use crate::domain::{
    DEVELOPMENT_ACCOUNTS, DEVELOPMENT_PASSWORD, Error, LoginCredentials, NewAccount,
    PasswordDigest, Profile, Registration, Role, StoredCredentials, UserId,
};

fn map_store_error(error: AccountStoreError) -> Error {
    match error {
        AccountStoreError::Connection { message } => {
            Error::service_unavailable(format!("account store unavailable: {message}"))
        }
        AccountStoreError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
        AccountStoreError::Duplicate { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

async fn off_thread<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("password worker failed: {err}")))
}

async fn hashed_account(profile: Profile, email: &str, password: &str) -> Result<NewAccount, Error> {
    let password = Zeroizing::new(password.to_owned());
    let digest = off_thread(move || PasswordDigest::hash(&password))
        .await?
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(NewAccount {
        profile,
        email: email.to_owned(),
        password: digest,
    })
}

/// Account service implementing the login driving port.
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
}

impl<A> AccountService<A> {
    /// Create a service over the given account store.
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

impl<A> AccountService<A>
where
    A: AccountStore,
{
    /// Create the development admin and guest unless they already exist.
    ///
    /// Returns how many accounts were created.
    pub async fn seed_development_accounts(&self) -> Result<usize, Error> {
        let mut created = 0;
        for account in DEVELOPMENT_ACCOUNTS {
            let id = UserId::new(account.id)
                .map_err(|err| Error::internal(format!("invalid development account id: {err}")))?;
            let profile = Profile {
                id,
                role: account.role,
                full_name: account.full_name.to_owned(),
                image: None,
            };
            let new_account = hashed_account(profile, account.email, DEVELOPMENT_PASSWORD).await?;
            match self.accounts.insert_account(&new_account).await {
                Ok(()) => created += 1,
                Err(AccountStoreError::Duplicate { .. }) => {
                    debug!(email = account.email, "development account already present");
                }
                Err(err) => return Err(map_store_error(err)),
            }
        }
        info!(created, "development accounts ready");
        Ok(created)
    }
}

#[async_trait]
impl<A> LoginService for AccountService<A>
where
    A: AccountStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(StoredCredentials { user_id, password }) = self
            .accounts
            .find_account(credentials.email())
            .await
            .map_err(map_store_error)?
        else {
            return Err(invalid_credentials());
        };
        let attempt = Zeroizing::new(credentials.password().to_owned());
        if off_thread(move || password.matches(&attempt)).await? {
            Ok(user_id)
        } else {
            Err(invalid_credentials())
        }
    }

    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let id = UserId::random();
        let profile = Profile {
            id,
            role: Role::Guest,
            full_name: registration.full_name().to_owned(),
            image: None,
        };
        let account =
            hashed_account(profile, registration.email(), registration.password()).await?;
        self.accounts
            .insert_account(&account)
            .await
            .map_err(map_store_error)?;
        info!(user_id = %id, "account registered");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAccountStore;
    use rstest::rstest;

    fn service(store: MockAccountStore) -> AccountService<MockAccountStore> {
        AccountService::new(Arc::new(store))
    }

    fn stored(password: &str) -> StoredCredentials {
        StoredCredentials {
            user_id: UserId::random(),
            password: PasswordDigest::hash(password).expect("hashes"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn registration_stores_a_hashed_guest() {
        let mut store = MockAccountStore::new();
        store
            .expect_insert_account()
            .withf(|account| {
                account.email == "new@example.com"
                    && account.profile.role == Role::Guest
                    && account.profile.full_name == "New Guest"
                    && account.password.as_str() != "abcde"
                    && account.password.matches("abcde")
            })
            .times(1)
            .return_once(|_| Ok(()));
        let registration =
            Registration::try_from_parts("new@example.com", "abcde", Some("New Guest"))
                .expect("valid registration");

        service(store)
            .register(&registration)
            .await
            .expect("registered");
    }

    #[rstest]
    #[tokio::test]
    async fn taken_emails_conflict() {
        let mut store = MockAccountStore::new();
        store
            .expect_insert_account()
            .return_once(|_| Err(AccountStoreError::duplicate("profiles_email_key")));
        let registration = Registration::try_from_parts("guest@example.com", "abcde", None)
            .expect("valid registration");

        let err = service(store)
            .register(&registration)
            .await
            .expect_err("email taken");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case("secret", true)]
    #[case("Secret", false)]
    #[tokio::test]
    async fn sign_in_checks_the_digest(#[case] attempt: &str, #[case] accepted: bool) {
        let account = stored("secret");
        let user_id = account.user_id;
        let mut store = MockAccountStore::new();
        store
            .expect_find_account()
            .withf(|email| email == "guest@example.com")
            .return_once(move |_| Ok(Some(account)));
        let credentials =
            LoginCredentials::try_from_parts("guest@example.com", attempt).expect("shape");

        let result = service(store).authenticate(&credentials).await;

        match result {
            Ok(id) => assert!(accepted && id == user_id),
            Err(err) => assert!(!accepted && err.code() == ErrorCode::Unauthorized),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_emails_are_unauthorised() {
        let mut store = MockAccountStore::new();
        store.expect_find_account().return_once(|_| Ok(None));
        let credentials =
            LoginCredentials::try_from_parts("nobody@example.com", "secret").expect("shape");

        let err = service(store)
            .authenticate(&credentials)
            .await
            .expect_err("unknown account");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let mut store = MockAccountStore::new();
        store
            .expect_find_account()
            .return_once(|_| Err(AccountStoreError::connection("refused")));
        let credentials =
            LoginCredentials::try_from_parts("guest@example.com", "secret").expect("shape");

        let err = service(store)
            .authenticate(&credentials)
            .await
            .expect_err("store down");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_skips_existing_accounts() {
        let mut store = MockAccountStore::new();
        store
            .expect_insert_account()
            .withf(|account| account.profile.role == Role::Admin)
            .return_once(|_| Err(AccountStoreError::duplicate("profiles_pkey")));
        store
            .expect_insert_account()
            .withf(|account| {
                account.email == "guest@example.com"
                    && account.password.matches(DEVELOPMENT_PASSWORD)
            })
            .return_once(|_| Ok(()));

        let created = service(store)
            .seed_development_accounts()
            .await
            .expect("seeded");

        assert_eq!(created, 1);
    }
}
