//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Only compiled for tests or with the `test-support` feature.

pub mod fixtures {
    //! Inventory seeding helpers over the in-memory store.

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::ports::{CatalogStore, CatalogStoreError};
    use crate::domain::{Hotel, HotelDraft, NewRoom, Room, RoomType};
    use crate::outbound::memory::InMemoryStore;

    /// Parse a `YYYY-MM-DD` literal.
    ///
    /// # Panics
    /// Panics when `raw` is not a valid date; callers pass literals.
    #[expect(clippy::expect_used, reason = "fixtures only receive date literals")]
    pub fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date literal")
    }

    /// A hotel draft that passes creation validation.
    pub fn hotel_draft(name: &str) -> HotelDraft {
        HotelDraft {
            name: name.to_owned(),
            address: "2 Harbour Row".to_owned(),
            city: "Stromness".to_owned(),
            state: "Orkney".to_owned(),
            country: "Scotland".to_owned(),
            price_per_night: Some(Decimal::new(95, 0)),
            image: Some("/images/front.png".to_owned()),
            ..HotelDraft::default()
        }
    }

    /// Room parameters for [`seed_room`].
    #[derive(Debug, Clone)]
    pub struct RoomSeed {
        pub room_number: String,
        pub room_type: RoomType,
        pub capacity: u32,
        pub price_per_night: Decimal,
    }

    impl Default for RoomSeed {
        fn default() -> Self {
            Self {
                room_number: "101".to_owned(),
                room_type: RoomType::Standard,
                capacity: 2,
                price_per_night: Decimal::new(80, 0),
            }
        }
    }

    /// Insert a hotel named `name`.
    ///
    /// # Errors
    /// Propagates [`CatalogStoreError`] from the store.
    pub async fn seed_hotel(store: &InMemoryStore, name: &str) -> Result<Hotel, CatalogStoreError> {
        store.insert_hotel(&hotel_draft(name)).await
    }

    /// Insert a room into `hotel`.
    ///
    /// # Errors
    /// Propagates [`CatalogStoreError`] from the store.
    pub async fn seed_room(
        store: &InMemoryStore,
        hotel: &Hotel,
        seed: RoomSeed,
    ) -> Result<Room, CatalogStoreError> {
        store
            .insert_room(&NewRoom {
                hotel_id: hotel.id,
                room_number: seed.room_number,
                room_type: seed.room_type,
                capacity: seed.capacity,
                price_per_night: seed.price_per_night,
            })
            .await
    }
}

pub mod accounts {
    //! Deterministic stand-ins for the account adapters.
    //!
    //! They accept the development accounts without hashing, which keeps
    //! handler tests fast. Registration hands out fresh ids and refuses the
    //! development emails.

    use async_trait::async_trait;

    use crate::domain::ports::{IdentityProvider, IdentityProviderError, LoginService};
    use crate::domain::{
        DEVELOPMENT_ACCOUNTS, DEVELOPMENT_PASSWORD, Error, LoginCredentials, Profile,
        Registration, UserId,
    };

    fn development_id(raw: &str) -> Result<UserId, Error> {
        UserId::new(raw).map_err(|err| Error::internal(format!("invalid development id: {err}")))
    }

    /// Login service knowing only the development accounts.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FixtureLoginService;

    #[async_trait]
    impl LoginService for FixtureLoginService {
        async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
            let account = DEVELOPMENT_ACCOUNTS
                .iter()
                .find(|account| {
                    account.email == credentials.email()
                        && credentials.password() == DEVELOPMENT_PASSWORD
                })
                .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
            development_id(account.id)
        }

        async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
            if DEVELOPMENT_ACCOUNTS
                .iter()
                .any(|account| account.email == registration.email())
            {
                return Err(Error::conflict("an account with this email already exists"));
            }
            Ok(UserId::random())
        }
    }

    /// Identity provider resolving only the development accounts.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FixtureIdentityProvider;

    #[async_trait]
    impl IdentityProvider for FixtureIdentityProvider {
        async fn resolve(
            &self,
            user_id: &UserId,
        ) -> Result<Option<Profile>, IdentityProviderError> {
            let raw = user_id.to_string();
            Ok(DEVELOPMENT_ACCOUNTS
                .iter()
                .find(|account| account.id == raw)
                .map(|account| Profile {
                    id: *user_id,
                    role: account.role,
                    full_name: account.full_name.to_owned(),
                    image: None,
                }))
        }
    }
}
