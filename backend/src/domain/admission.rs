//! Booking admission and availability synchronisation.
//!
//! Admission turns a guest's [`BookingRequest`] into a pending booking while
//! keeping the room's availability flag consistent with the ledger. Two
//! strategies exist:
//!
//! - [`AdmissionStrategy::ConditionalClaim`] claims the room with a
//!   conditional write before inserting the booking and releases it again if
//!   the insert fails. Two concurrent requests for one room admit at most one
//!   booking.
//! - [`AdmissionStrategy::CheckThenAct`] reads the flag, inserts the booking,
//!   then overwrites the flag. Concurrent requests may both be admitted; it is
//!   kept to reproduce and test that behaviour.
//!
//! Status changes follow [`plan_transition`] and write conditionally on the
//! status that was read. Cancelling a booking releases its room unless another
//! active booking of that room covers the current UTC day.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    BookingCommand, BookingLedger, BookingLedgerError, CatalogStore, CatalogStoreError,
    ChangeFeed, ConditionalWrite,
};
use crate::domain::{
    Actor, Booking, BookingId, BookingRequest, BookingStatus, ChangeEvent, Error, NewBooking,
    Room, RoomId, StayRange, StayRangeError, TransitionError, TransitionPlan, plan_transition,
};

/// How admission coordinates the booking insert with the room flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdmissionStrategy {
    /// Claim the room conditionally, then insert, compensating on failure.
    #[default]
    ConditionalClaim,
    /// Read, insert, then overwrite the flag as separate steps.
    CheckThenAct,
}

impl AdmissionStrategy {
    /// Configuration spelling of the strategy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConditionalClaim => "conditional_claim",
            Self::CheckThenAct => "check_then_act",
        }
    }
}

impl fmt::Display for AdmissionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown admission strategy {0:?}; expected conditional_claim or check_then_act")]
pub struct UnknownAdmissionStrategy(pub String);

impl FromStr for AdmissionStrategy {
    type Err = UnknownAdmissionStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "conditional_claim" => Ok(Self::ConditionalClaim),
            "check_then_act" => Ok(Self::CheckThenAct),
            _ => Err(UnknownAdmissionStrategy(s.to_owned())),
        }
    }
}

/// Tunables for admission and cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Strategy used by [`BookingAdmissionService::admit`].
    pub strategy: AdmissionStrategy,
    /// Release the room when a booking is cancelled.
    pub restore_on_cancel: bool,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            strategy: AdmissionStrategy::default(),
            restore_on_cancel: true,
        }
    }
}

/// A storage call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageFailure {
    /// The store could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// The store was reached but the operation failed.
    #[error("storage operation failed: {message}")]
    Query { message: String },
}

impl From<CatalogStoreError> for StorageFailure {
    fn from(value: CatalogStoreError) -> Self {
        match value {
            CatalogStoreError::Connection { message } => Self::Unavailable { message },
            other => Self::Query {
                message: other.to_string(),
            },
        }
    }
}

impl From<BookingLedgerError> for StorageFailure {
    fn from(value: BookingLedgerError) -> Self {
        match value {
            BookingLedgerError::Connection { message } => Self::Unavailable { message },
            BookingLedgerError::Query { message } => Self::Query { message },
        }
    }
}

impl From<StorageFailure> for Error {
    fn from(value: StorageFailure) -> Self {
        match value {
            StorageFailure::Unavailable { message } => {
                Self::service_unavailable(format!("storage unavailable: {message}"))
            }
            StorageFailure::Query { message } => {
                Self::internal(format!("storage error: {message}"))
            }
        }
    }
}

/// Reasons a booking request is not admitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingAdmissionError {
    /// Check-out is not after check-in.
    #[error(transparent)]
    InvalidDateRange(#[from] StayRangeError),
    /// Fewer than one guest was requested.
    #[error("number of guests must be at least 1")]
    NoGuests,
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    /// The room is not available, or another request claimed it first.
    #[error("room {0} is not available")]
    RoomUnavailable(RoomId),
    /// More guests than the room holds.
    #[error("room holds {capacity} guests but {requested} were requested")]
    GuestCountExceedsCapacity { requested: u32, capacity: u32 },
    /// The stay total does not fit the ledger's amount range.
    #[error("total for room {0} exceeds the largest bookable amount")]
    AmountOutOfRange(RoomId),
    /// A storage call failed and nothing was left half done.
    #[error(transparent)]
    StorageFailure(#[from] StorageFailure),
    /// A storage call failed after part of the admission took effect.
    ///
    /// `booking_id` is set when a booking exists without its room claimed;
    /// it is `None` when the room stayed claimed without a booking.
    #[error("booking admission for room {room_id} was only partially applied")]
    PartialAdmissionFailure {
        room_id: RoomId,
        booking_id: Option<BookingId>,
    },
}

impl From<BookingAdmissionError> for Error {
    fn from(value: BookingAdmissionError) -> Self {
        match value {
            BookingAdmissionError::InvalidDateRange(err) => Self::invalid_request(err.to_string())
                .with_details(json!({ "code": "invalid_date_range" })),
            BookingAdmissionError::NoGuests => Self::invalid_request(value.to_string())
                .with_details(json!({ "code": "invalid_guest_count" })),
            BookingAdmissionError::GuestCountExceedsCapacity {
                requested,
                capacity,
            } => Self::invalid_request(value.to_string()).with_details(json!({
                "code": "guest_count_exceeds_capacity",
                "requested": requested,
                "capacity": capacity,
            })),
            BookingAdmissionError::AmountOutOfRange(room_id) => Self::invalid_request(
                value.to_string(),
            )
            .with_details(json!({ "code": "amount_out_of_range", "roomId": room_id })),
            BookingAdmissionError::RoomNotFound(room_id) => Self::not_found(value.to_string())
                .with_details(json!({ "code": "room_not_found", "roomId": room_id })),
            BookingAdmissionError::RoomUnavailable(room_id) => Self::conflict(value.to_string())
                .with_details(json!({ "code": "room_unavailable", "roomId": room_id })),
            BookingAdmissionError::StorageFailure(failure) => failure.into(),
            BookingAdmissionError::PartialAdmissionFailure {
                room_id,
                booking_id,
            } => Self::internal(value.to_string()).with_details(json!({
                "code": "partial_admission",
                "roomId": room_id,
                "bookingId": booking_id,
            })),
        }
    }
}

/// Reasons a status change is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingStatusError {
    /// The booking does not exist.
    #[error("booking {0} not found")]
    NotFound(BookingId),
    /// The state machine refused the change.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The status changed between read and write.
    #[error("booking {0} changed concurrently")]
    Concurrent(BookingId),
    /// A storage call failed.
    #[error(transparent)]
    StorageFailure(#[from] StorageFailure),
}

impl From<BookingStatusError> for Error {
    fn from(value: BookingStatusError) -> Self {
        match value {
            BookingStatusError::NotFound(_) => Self::not_found(value.to_string()),
            BookingStatusError::Transition(TransitionError::NotOwner) => {
                Self::forbidden(value.to_string())
            }
            BookingStatusError::Transition(TransitionError::InvalidTransition { from, to }) => {
                Self::conflict(value.to_string()).with_details(json!({
                    "code": "invalid_transition",
                    "from": from,
                    "to": to,
                }))
            }
            BookingStatusError::Concurrent(_) => Self::conflict(value.to_string())
                .with_details(json!({ "code": "concurrent_update" })),
            BookingStatusError::StorageFailure(failure) => failure.into(),
        }
    }
}

/// Service admitting bookings and driving their status.
#[derive(Clone)]
pub struct BookingAdmissionService<C, L> {
    catalog: Arc<C>,
    ledger: Arc<L>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
    policy: AdmissionPolicy,
}

impl<C, L> BookingAdmissionService<C, L> {
    /// Create a service using the default [`AdmissionPolicy`].
    pub fn new(
        catalog: Arc<C>,
        ledger: Arc<L>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            feed,
            clock,
            policy: AdmissionPolicy::default(),
        }
    }

    /// Replace the admission policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active policy.
    pub const fn policy(&self) -> AdmissionPolicy {
        self.policy
    }
}

impl<C, L> BookingAdmissionService<C, L>
where
    C: CatalogStore,
    L: BookingLedger,
{
    /// Admit a booking request using the configured strategy.
    pub async fn admit(&self, request: BookingRequest) -> Result<Booking, BookingAdmissionError> {
        let (room, booking) = self.prepare(&request).await?;
        let admitted = match self.policy.strategy {
            AdmissionStrategy::ConditionalClaim => self.claim_then_insert(&room, &booking).await,
            AdmissionStrategy::CheckThenAct => self.insert_then_overwrite(&room, &booking).await,
        }?;
        info!(
            booking_id = %admitted.id,
            room_id = %room.id,
            strategy = %self.policy.strategy,
            "booking admitted"
        );
        Ok(admitted)
    }

    async fn prepare(
        &self,
        request: &BookingRequest,
    ) -> Result<(Room, NewBooking), BookingAdmissionError> {
        let stay = StayRange::new(request.check_in, request.check_out)?;
        if request.number_of_guests == 0 {
            return Err(BookingAdmissionError::NoGuests);
        }
        let room = self
            .catalog
            .get_room(&request.room_id)
            .await
            .map_err(StorageFailure::from)?
            .ok_or(BookingAdmissionError::RoomNotFound(request.room_id))?;
        if !room.is_available {
            return Err(BookingAdmissionError::RoomUnavailable(room.id));
        }
        if request.number_of_guests > room.capacity {
            return Err(BookingAdmissionError::GuestCountExceedsCapacity {
                requested: request.number_of_guests,
                capacity: room.capacity,
            });
        }
        let total_amount = stay
            .total_amount(room.price_per_night)
            .ok_or(BookingAdmissionError::AmountOutOfRange(room.id))?;
        let booking = NewBooking {
            guest_id: request.guest_id,
            room_id: room.id,
            stay,
            total_amount,
            number_of_guests: request.number_of_guests,
            booking_date: self.clock.utc(),
        };
        Ok((room, booking))
    }

    async fn claim_then_insert(
        &self,
        room: &Room,
        booking: &NewBooking,
    ) -> Result<Booking, BookingAdmissionError> {
        let claim = self
            .catalog
            .set_room_availability(&room.id, true, false)
            .await
            .map_err(StorageFailure::from)?;
        if claim == ConditionalWrite::Conflict {
            return Err(BookingAdmissionError::RoomUnavailable(room.id));
        }
        let claimed = room.with_availability(false);

        let inserted = match self.ledger.insert_booking(booking).await {
            Ok(inserted) => inserted,
            Err(insert_error) => {
                return Err(self.release_after_failed_insert(room, insert_error).await);
            }
        };

        self.feed
            .publish(ChangeEvent::room_updated(room.clone(), claimed));
        self.feed
            .publish(ChangeEvent::booking_inserted(inserted.clone()));
        Ok(inserted)
    }

    async fn release_after_failed_insert(
        &self,
        room: &Room,
        insert_error: BookingLedgerError,
    ) -> BookingAdmissionError {
        match self
            .catalog
            .set_room_availability(&room.id, false, true)
            .await
        {
            Ok(ConditionalWrite::Applied) => StorageFailure::from(insert_error).into(),
            Ok(ConditionalWrite::Conflict) => {
                error!(
                    room_id = %room.id,
                    error = %insert_error,
                    "room availability changed before release; room needs reconciliation"
                );
                BookingAdmissionError::PartialAdmissionFailure {
                    room_id: room.id,
                    booking_id: None,
                }
            }
            Err(release_error) => {
                error!(
                    room_id = %room.id,
                    error = %insert_error,
                    release_error = %release_error,
                    "room claimed without booking; room needs reconciliation"
                );
                BookingAdmissionError::PartialAdmissionFailure {
                    room_id: room.id,
                    booking_id: None,
                }
            }
        }
    }

    async fn insert_then_overwrite(
        &self,
        room: &Room,
        booking: &NewBooking,
    ) -> Result<Booking, BookingAdmissionError> {
        let inserted = self
            .ledger
            .insert_booking(booking)
            .await
            .map_err(StorageFailure::from)?;
        self.feed
            .publish(ChangeEvent::booking_inserted(inserted.clone()));

        if let Err(write_error) = self
            .catalog
            .overwrite_room_availability(&room.id, false)
            .await
        {
            error!(
                booking_id = %inserted.id,
                room_id = %room.id,
                error = %write_error,
                "booking stored but room still available; flagging for reconciliation"
            );
            if let Err(flag_error) = self.ledger.flag_for_reconciliation(&inserted.id).await {
                error!(
                    booking_id = %inserted.id,
                    error = %flag_error,
                    "failed to flag booking for reconciliation"
                );
            }
            return Err(BookingAdmissionError::PartialAdmissionFailure {
                room_id: room.id,
                booking_id: Some(inserted.id),
            });
        }

        self.feed.publish(ChangeEvent::room_updated(
            room.clone(),
            room.with_availability(false),
        ));
        Ok(inserted)
    }

    /// Move a booking to `target` on behalf of `actor`.
    pub async fn transition(
        &self,
        actor: &Actor,
        booking_id: &BookingId,
        target: BookingStatus,
    ) -> Result<Booking, BookingStatusError> {
        let current = self
            .ledger
            .find_booking(booking_id)
            .await
            .map_err(StorageFailure::from)?
            .ok_or(BookingStatusError::NotFound(*booking_id))?;

        let (from, to) = match plan_transition(actor, &current, target)? {
            TransitionPlan::Unchanged => return Ok(current),
            TransitionPlan::Apply { from, to } => (from, to),
        };

        let write = self
            .ledger
            .update_booking_status(booking_id, from, to)
            .await
            .map_err(StorageFailure::from)?;
        if write == ConditionalWrite::Conflict {
            return Err(BookingStatusError::Concurrent(*booking_id));
        }

        let updated = current.with_status(to);
        self.feed
            .publish(ChangeEvent::booking_updated(current, updated.clone()));
        info!(booking_id = %booking_id, %from, %to, "booking status changed");

        if to == BookingStatus::Cancelled && self.policy.restore_on_cancel {
            self.release_after_cancel(&updated).await;
        }
        Ok(updated)
    }

    /// Release the room of a cancelled booking unless another active
    /// booking covers today.
    ///
    /// Failures are logged: the cancellation itself has already been stored.
    async fn release_after_cancel(&self, cancelled: &Booking) {
        let today = self.clock.utc().date_naive();
        match self
            .ledger
            .has_active_booking_covering(&cancelled.room_id, today, &cancelled.id)
            .await
        {
            Ok(true) => return,
            Ok(false) => {}
            Err(err) => {
                warn!(booking_id = %cancelled.id, error = %err, "could not check room occupancy");
                return;
            }
        }

        let room = match self.catalog.get_room(&cancelled.room_id).await {
            Ok(Some(room)) => room,
            Ok(None) => return,
            Err(err) => {
                warn!(room_id = %cancelled.room_id, error = %err, "could not read room to release");
                return;
            }
        };
        match self
            .catalog
            .set_room_availability(&room.id, false, true)
            .await
        {
            Ok(ConditionalWrite::Applied) => {
                self.feed.publish(ChangeEvent::room_updated(
                    room.clone(),
                    room.with_availability(true),
                ));
            }
            Ok(ConditionalWrite::Conflict) => {}
            Err(err) => {
                warn!(room_id = %room.id, error = %err, "could not release room after cancellation");
            }
        }
    }
}

#[async_trait]
impl<C, L> BookingCommand for BookingAdmissionService<C, L>
where
    C: CatalogStore,
    L: BookingLedger,
{
    async fn request_booking(&self, request: BookingRequest) -> Result<Booking, Error> {
        self.admit(request).await.map_err(Into::into)
    }

    async fn change_status(
        &self,
        actor: &Actor,
        booking_id: &BookingId,
        target: BookingStatus,
    ) -> Result<Booking, Error> {
        self.transition(actor, booking_id, target)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
