//! Driving port for booking admission and status changes.

use async_trait::async_trait;

use crate::domain::{Actor, Booking, BookingId, BookingRequest, BookingStatus, Error};

/// Use cases that mutate the booking ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Admit a booking for the requesting guest.
    async fn request_booking(&self, request: BookingRequest) -> Result<Booking, Error>;

    /// Move a booking to `target` on behalf of `actor`.
    async fn change_status(
        &self,
        actor: &Actor,
        booking_id: &BookingId,
        target: BookingStatus,
    ) -> Result<Booking, Error>;
}
