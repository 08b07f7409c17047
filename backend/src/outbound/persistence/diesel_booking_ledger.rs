//! PostgreSQL-backed `BookingLedger` implementation using Diesel ORM.
//!
//! Listings join each booking to its room and hotel, and left join the
//! guest's profile, in a single query.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{BookingLedger, BookingLedgerError, ConditionalWrite};
use crate::domain::{
    BookedRoom, Booking, BookingFilter, BookingId, BookingStatus, BookingView, Hotel, NewBooking,
    Profile, RoomId, RoomType,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookingRow, HotelRow, NewBookingRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, hotels, profiles, rooms};

type ViewRow = (BookingRow, String, String, HotelRow, Option<ProfileRow>);

const ACTIVE_STATUSES: [&str; 2] = [
    BookingStatus::Pending.as_str(),
    BookingStatus::Confirmed.as_str(),
];

/// Diesel-backed implementation of the booking ledger port.
#[derive(Clone)]
pub struct DieselBookingLedger {
    pool: DbPool,
}

impl DieselBookingLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingLedgerError {
    map_basic_pool_error(error, BookingLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingLedgerError {
    map_basic_diesel_error(
        error,
        BookingLedgerError::query,
        BookingLedgerError::connection,
    )
}

fn to_booking(row: BookingRow) -> Result<Booking, BookingLedgerError> {
    Booking::try_from(row).map_err(BookingLedgerError::query)
}

fn to_view(row: ViewRow) -> Result<BookingView, BookingLedgerError> {
    let (booking, room_number, room_type, hotel, guest) = row;
    let room_type: RoomType = room_type
        .parse()
        .map_err(|err| BookingLedgerError::query(format!("room {room_number}: {err}")))?;
    let guest = guest
        .map(Profile::try_from)
        .transpose()
        .map_err(BookingLedgerError::query)?;
    Ok(BookingView {
        booking: to_booking(booking)?,
        room: BookedRoom {
            room_number,
            room_type,
            hotel: Hotel::from(hotel),
        },
        guest,
    })
}

fn filtered(filter: BookingFilter) -> bookings::BoxedQuery<'static, Pg> {
    let query = bookings::table.into_boxed();
    match filter {
        BookingFilter::All => query,
        BookingFilter::Guest(guest_id) => query.filter(bookings::guest_id.eq(*guest_id.as_uuid())),
    }
}

impl DieselBookingLedger {
    async fn load_views(
        &self,
        filter: BookingFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<BookingView>, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = bookings::table
            .inner_join(rooms::table.inner_join(hotels::table))
            .left_join(profiles::table.on(profiles::id.eq(bookings::guest_id)))
            .select((
                BookingRow::as_select(),
                rooms::room_number,
                rooms::room_type,
                HotelRow::as_select(),
                Option::<ProfileRow>::as_select(),
            ))
            .order((bookings::booking_date.desc(), bookings::id.desc()))
            .into_boxed();
        if let BookingFilter::Guest(guest_id) = filter {
            query = query.filter(bookings::guest_id.eq(*guest_id.as_uuid()));
        }
        if let Some(page) = page {
            query = query
                .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
                .limit(i64::try_from(page.limit()).unwrap_or(i64::MAX));
        }
        let rows: Vec<ViewRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(to_view).collect()
    }
}

#[async_trait]
impl BookingLedger for DieselBookingLedger {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let number_of_guests = i32::try_from(booking.number_of_guests)
            .map_err(|_| BookingLedgerError::query("guest count out of range"))?;
        let new_row = NewBookingRow {
            guest_id: *booking.guest_id.as_uuid(),
            room_id: *booking.room_id.as_uuid(),
            check_in: booking.stay.check_in(),
            check_out: booking.stay.check_out(),
            total_amount: booking.total_amount,
            status: BookingStatus::Pending.as_str(),
            number_of_guests,
            booking_date: booking.booking_date,
        };
        let row = diesel::insert_into(bookings::table)
            .values(&new_row)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_booking(row)
    }

    async fn update_booking_status(
        &self,
        booking_id: &BookingId,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> Result<ConditionalWrite, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            bookings::table.filter(
                bookings::id
                    .eq(booking_id.as_uuid())
                    .and(bookings::status.eq(expected.as_str())),
            ),
        )
        .set(bookings::status.eq(new.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(ConditionalWrite::from_rows_affected(affected))
    }

    async fn find_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Booking>, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bookings::table
            .filter(bookings::id.eq(booking_id.as_uuid()))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_booking).transpose()
    }

    async fn list_bookings(
        &self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingView>, BookingLedgerError> {
        self.load_views(filter, None).await
    }

    async fn page_bookings(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingLedgerError> {
        let total: i64 = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            filtered(filter)
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        let items = self.load_views(filter, Some(page)).await?;
        Ok(Page::new(
            items,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn has_active_booking_covering(
        &self,
        room_id: &RoomId,
        day: NaiveDate,
        excluding: &BookingId,
    ) -> Result<bool, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let covering = bookings::table.filter(
            bookings::room_id
                .eq(room_id.as_uuid())
                .and(bookings::id.ne(excluding.as_uuid()))
                .and(bookings::status.eq_any(ACTIVE_STATUSES))
                .and(bookings::check_in.le(day))
                .and(bookings::check_out.ge(day)),
        );
        diesel::select(diesel::dsl::exists(covering))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn flag_for_reconciliation(
        &self,
        booking_id: &BookingId,
    ) -> Result<(), BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(bookings::table.filter(bookings::id.eq(booking_id.as_uuid())))
            .set(bookings::needs_reconciliation.eq(true))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn count_bookings(&self) -> Result<u64, BookingLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bookings::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(|total| u64::try_from(total).unwrap_or_default())
            .map_err(map_diesel_error)
    }
}
