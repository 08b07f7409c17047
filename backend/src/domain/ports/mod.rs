//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AccountStore`, `CatalogStore`, `BookingLedger`,
//! `ChangeFeed`, `ImageStore`, `IdentityProvider`) are implemented by
//! outbound adapters. Driving ports
//! (`BookingCommand`, `BookingQuery`, `CatalogCommand`, `CatalogQuery`,
//! `LoginService`, `ProfileQuery`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_store;
mod booking_command;
mod booking_ledger;
mod booking_query;
mod catalog_command;
mod catalog_query;
mod catalog_store;
mod change_feed;
mod conditional_write;
mod identity_provider;
mod image_store;
mod login_service;
mod profile_query;

#[cfg(test)]
pub use account_store::MockAccountStore;
pub use account_store::{AccountStore, AccountStoreError};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::BookingCommand;
#[cfg(test)]
pub use booking_ledger::MockBookingLedger;
pub use booking_ledger::{BookingLedger, BookingLedgerError};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_command::CatalogCommand;
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::CatalogQuery;
#[cfg(test)]
pub use catalog_store::MockCatalogStore;
pub use catalog_store::{CatalogStore, CatalogStoreError};
#[cfg(test)]
pub use change_feed::MockChangeFeed;
pub use change_feed::{ChangeFeed, DiscardingChangeFeed};
pub use conditional_write::ConditionalWrite;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageKey, ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
