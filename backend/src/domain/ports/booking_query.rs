//! Driving port for booking listings.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{BookingView, Error, UserId};

/// Read-only booking use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// A guest's bookings with room and hotel details, newest first.
    async fn list_guest_bookings(&self, guest_id: &UserId) -> Result<Vec<BookingView>, Error>;

    /// One page of every booking with room, hotel and guest details, newest
    /// first.
    async fn list_all_bookings(&self, page: PageRequest) -> Result<Page<BookingView>, Error>;
}
