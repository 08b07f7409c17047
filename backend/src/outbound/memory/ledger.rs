//! `BookingLedger` over the shared in-memory state.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::{Page, PageRequest};

use crate::domain::ports::{BookingLedger, BookingLedgerError, ConditionalWrite};
use crate::domain::{
    BookedRoom, Booking, BookingFilter, BookingId, BookingStatus, BookingView, NewBooking, RoomId,
};

use super::{InMemoryStore, State, newest_first, page_of};

fn matches(filter: BookingFilter, booking: &Booking) -> bool {
    match filter {
        BookingFilter::All => true,
        BookingFilter::Guest(guest_id) => booking.guest_id == guest_id,
    }
}

fn view_of(state: &State, booking: Booking) -> Result<BookingView, BookingLedgerError> {
    let dangling = || BookingLedgerError::query(format!("booking {} has no room", booking.id));
    let room = state
        .rooms
        .iter()
        .find(|room| room.id == booking.room_id)
        .ok_or_else(dangling)?;
    let hotel = state
        .hotels
        .iter()
        .find(|hotel| hotel.id == room.hotel_id)
        .ok_or_else(dangling)?;
    let guest = state
        .accounts
        .iter()
        .find(|account| account.profile.id == booking.guest_id)
        .map(|account| account.profile.clone());
    Ok(BookingView {
        room: BookedRoom {
            room_number: room.room_number.clone(),
            room_type: room.room_type,
            hotel: hotel.clone(),
        },
        guest,
        booking,
    })
}

impl InMemoryStore {
    fn filtered(&self, filter: BookingFilter) -> Result<Vec<BookingView>, BookingLedgerError> {
        let state = self.lock(BookingLedgerError::query)?;
        let selected: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| matches(filter, booking))
            .cloned()
            .collect();
        newest_first(&selected, |booking| booking.booking_date)
            .into_iter()
            .map(|booking| view_of(&state, booking))
            .collect()
    }
}

#[async_trait]
impl BookingLedger for InMemoryStore {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, BookingLedgerError> {
        let mut state = self.lock(BookingLedgerError::query)?;
        if !state.rooms.iter().any(|room| room.id == booking.room_id) {
            return Err(BookingLedgerError::query("referenced record does not exist"));
        }
        let stored = booking.clone().into_booking(BookingId::random());
        state.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn update_booking_status(
        &self,
        booking_id: &BookingId,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> Result<ConditionalWrite, BookingLedgerError> {
        let mut state = self.lock(BookingLedgerError::query)?;
        let applied = state
            .bookings
            .iter_mut()
            .find(|booking| booking.id == *booking_id && booking.status == expected)
            .map(|booking| booking.status = new)
            .is_some();
        Ok(if applied {
            ConditionalWrite::Applied
        } else {
            ConditionalWrite::Conflict
        })
    }

    async fn find_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError> {
        let state = self.lock(BookingLedgerError::query)?;
        Ok(state
            .bookings
            .iter()
            .find(|booking| booking.id == *booking_id)
            .cloned())
    }

    async fn list_bookings(
        &self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingView>, BookingLedgerError> {
        self.filtered(filter)
    }

    async fn page_bookings(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingLedgerError> {
        Ok(page_of(self.filtered(filter)?, page))
    }

    async fn has_active_booking_covering(
        &self,
        room_id: &RoomId,
        day: NaiveDate,
        excluding: &BookingId,
    ) -> Result<bool, BookingLedgerError> {
        let state = self.lock(BookingLedgerError::query)?;
        Ok(state.bookings.iter().any(|booking| {
            booking.room_id == *room_id
                && booking.id != *excluding
                && booking.status.is_active()
                && booking.stay().is_some_and(|stay| stay.covers(day))
        }))
    }

    async fn flag_for_reconciliation(
        &self,
        booking_id: &BookingId,
    ) -> Result<(), BookingLedgerError> {
        let mut state = self.lock(BookingLedgerError::query)?;
        if let Some(booking) = state
            .bookings
            .iter_mut()
            .find(|booking| booking.id == *booking_id)
        {
            booking.needs_reconciliation = true;
        }
        Ok(())
    }

    async fn count_bookings(&self) -> Result<u64, BookingLedgerError> {
        let state = self.lock(BookingLedgerError::query)?;
        Ok(u64::try_from(state.bookings.len()).unwrap_or(u64::MAX))
    }
}
