//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL catalog store, booking ledger and identity
//!   provider using Diesel ORM
//! - **memory**: in-process catalog store and ledger for running without a
//!   database
//! - **change_feed**: Tokio broadcast fan-out of row change events
//! - **storage**: capability-scoped directory holding uploaded images
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod change_feed;
pub mod memory;
pub mod persistence;
pub mod storage;
