//! Booking ledger records.

mod stay;
mod status;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use stay::{StayRange, StayRangeError, max_total_amount, parse_stay_date};
pub use status::{
    BookingStatus, TransitionError, TransitionPlan, UnknownBookingStatus, plan_transition,
};

use super::{BookingId, Hotel, Profile, RoomId, RoomType, UserId};

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: UserId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub number_of_guests: u32,
    pub booking_date: DateTime<Utc>,
    /// Set when admission inserted the booking but could not mark the room
    /// unavailable; operators reconcile these by hand.
    pub needs_reconciliation: bool,
}

impl Booking {
    /// The stay covered by this booking.
    ///
    /// Stored rows always satisfy `check_in < check_out`; rows that do not
    /// are reported as covering nothing.
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.check_in, self.check_out).ok()
    }

    /// Copy of the booking with a different status.
    #[must_use]
    pub fn with_status(&self, status: BookingStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// The room a booking holds, with its hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRoom {
    pub room_number: String,
    pub room_type: RoomType,
    pub hotel: Hotel,
}

/// A booking joined with its room, hotel and guest profile for listings.
///
/// `guest` is `None` when the account has no profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: BookedRoom,
    pub guest: Option<Profile>,
}

/// A booking ready for insertion; the ledger assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub guest_id: UserId,
    pub room_id: RoomId,
    pub stay: StayRange,
    pub total_amount: Decimal,
    pub number_of_guests: u32,
    pub booking_date: DateTime<Utc>,
}

impl NewBooking {
    /// Materialise the stored record once the ledger picked an id.
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            guest_id: self.guest_id,
            room_id: self.room_id,
            check_in: self.stay.check_in(),
            check_out: self.stay.check_out(),
            total_amount: self.total_amount,
            status: BookingStatus::Pending,
            number_of_guests: self.number_of_guests,
            booking_date: self.booking_date,
            needs_reconciliation: false,
        }
    }
}

/// Which bookings a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    /// Every booking in the ledger.
    All,
    /// Bookings made by one guest.
    Guest(UserId),
}

/// A guest's request to book a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub guest_id: UserId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
}
