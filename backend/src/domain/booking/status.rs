//! Booking status state machine.
//!
//! `pending` is the only state that accepts changes. Guests may confirm or
//! cancel their own pending bookings; admins may move any pending booking to
//! any status, and asking for `pending` again is a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Booking;
use crate::domain::Actor;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Lowercase storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses reject every change.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Whether a booking in this status holds its room.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownBookingStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownBookingStatus(other.to_owned())),
        }
    }
}

/// What a permitted status change requires of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Nothing to write.
    Unchanged,
    /// Write `to` on the condition that the stored status is still `from`.
    Apply {
        /// Status the write expects to replace.
        from: BookingStatus,
        /// Status to write.
        to: BookingStatus,
    },
}

/// Reasons a status change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A guest tried to act on somebody else's booking.
    #[error("booking belongs to another guest")]
    NotOwner,
    /// The requested change is not allowed from the current status.
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },
}

/// Decide whether `actor` may move `booking` to `target`.
///
/// # Examples
/// ```
/// use backend::domain::{plan_transition, Actor, BookingStatus, TransitionPlan};
/// # use backend::domain::{Booking, BookingId, RoomId, UserId};
/// # use chrono::{NaiveDate, Utc};
/// # use rust_decimal::Decimal;
/// # let guest = UserId::random();
/// # let booking = Booking {
/// #     id: BookingId::random(),
/// #     guest_id: guest,
/// #     room_id: RoomId::random(),
/// #     check_in: NaiveDate::from_ymd_opt(2024, 5, 10).expect("date"),
/// #     check_out: NaiveDate::from_ymd_opt(2024, 5, 12).expect("date"),
/// #     total_amount: Decimal::ONE,
/// #     status: BookingStatus::Pending,
/// #     number_of_guests: 1,
/// #     booking_date: Utc::now(),
/// #     needs_reconciliation: false,
/// # };
///
/// let plan = plan_transition(&Actor::guest(guest), &booking, BookingStatus::Cancelled)
///     .expect("guests may cancel their own pending booking");
/// assert_eq!(
///     plan,
///     TransitionPlan::Apply { from: BookingStatus::Pending, to: BookingStatus::Cancelled }
/// );
/// ```
pub fn plan_transition(
    actor: &Actor,
    booking: &Booking,
    target: BookingStatus,
) -> Result<TransitionPlan, TransitionError> {
    let from = booking.status;
    if !actor.is_admin() {
        if booking.guest_id != actor.user_id() {
            return Err(TransitionError::NotOwner);
        }
        if target == BookingStatus::Pending {
            return Err(TransitionError::InvalidTransition { from, to: target });
        }
    }
    if from.is_terminal() {
        return Err(TransitionError::InvalidTransition { from, to: target });
    }
    if from == target {
        return Ok(TransitionPlan::Unchanged);
    }
    Ok(TransitionPlan::Apply { from, to: target })
}
