//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the catalog store, booking ledger, account
//! store and identity provider ports, backed by PostgreSQL through `diesel-async` with
//! `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain records. Admission logic stays in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Conditional writes**: availability claims and status changes are
//!   single `UPDATE` statements guarded by the expected current value.
//! - **Strongly typed errors**: Diesel and pool failures map onto the port
//!   error enums.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselCatalogStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hotel")).await?;
//! let catalog = DieselCatalogStore::new(pool);
//! ```

mod diesel_account_store;
mod diesel_basic_error_mapping;
mod diesel_booking_ledger;
mod diesel_catalog_store;
mod diesel_identity_provider;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_store::DieselAccountStore;
pub use diesel_booking_ledger::DieselBookingLedger;
pub use diesel_catalog_store::DieselCatalogStore;
pub use diesel_identity_provider::DieselIdentityProvider;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
