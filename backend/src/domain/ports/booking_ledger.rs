//! Port for booking ledger persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::{Page, PageRequest};

use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, BookingView, NewBooking, RoomId,
};

use super::{ConditionalWrite, define_port_error};

define_port_error! {
    /// Errors raised by booking ledger adapters.
    pub enum BookingLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "booking ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking ledger query failed: {message}",
    }
}

/// Port for appending bookings and updating their status.
///
/// Bookings are never deleted in the normal flow; hotel deletion cascades
/// at the storage level.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Append a pending booking and return the stored record.
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, BookingLedgerError>;

    /// Set the status to `new` only if it currently equals `expected`.
    async fn update_booking_status(
        &self,
        booking_id: &BookingId,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> Result<ConditionalWrite, BookingLedgerError>;

    /// Read one booking.
    async fn find_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError>;

    /// Every matching booking joined with its room, hotel and guest
    /// profile, newest first.
    async fn list_bookings(
        &self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingView>, BookingLedgerError>;

    /// One page of [`list_bookings`](Self::list_bookings), with the exact
    /// total.
    async fn page_bookings(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingLedgerError>;

    /// Whether another pending or confirmed booking of the room covers `day`.
    async fn has_active_booking_covering(
        &self,
        room_id: &RoomId,
        day: NaiveDate,
        excluding: &BookingId,
    ) -> Result<bool, BookingLedgerError>;

    /// Mark a booking whose room could not be claimed after insertion.
    async fn flag_for_reconciliation(&self, booking_id: &BookingId)
    -> Result<(), BookingLedgerError>;

    /// Number of bookings in the ledger.
    async fn count_bookings(&self) -> Result<u64, BookingLedgerError>;
}
