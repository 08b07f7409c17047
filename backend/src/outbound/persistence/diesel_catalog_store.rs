//! PostgreSQL-backed `CatalogStore` implementation using Diesel ORM.
//!
//! The availability claim is a single conditional `UPDATE ... WHERE id = $1
//! AND is_available = $2`; the affected row count decides whether the claim
//! applied. No transaction or row lock is held across admission steps.
//!
//! Hotel deletion removes bookings, rooms and the hotel explicitly inside one
//! transaction, returning every removed row so callers can announce them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CatalogStore, CatalogStoreError, ConditionalWrite};
use crate::domain::{Booking, Hotel, HotelDraft, HotelId, HotelRemoval, NewRoom, Room, RoomId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BookingRow, HotelRow, HotelUpdate, NewHotelRow, NewRoomRow, RoomRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, hotels, rooms};

/// Diesel-backed implementation of the catalog store port.
#[derive(Clone)]
pub struct DieselCatalogStore {
    pool: DbPool,
}

impl DieselCatalogStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogStoreError {
    map_basic_pool_error(error, CatalogStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogStoreError {
    if is_unique_violation(&error) {
        return CatalogStoreError::duplicate("room number already exists in this hotel");
    }
    map_basic_diesel_error(
        error,
        CatalogStoreError::query,
        CatalogStoreError::connection,
    )
}

fn to_room(row: RoomRow) -> Result<Room, CatalogStoreError> {
    Room::try_from(row).map_err(CatalogStoreError::query)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl CatalogStore for DieselCatalogStore {
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = rooms::table
            .filter(rooms::id.eq(room_id.as_uuid()))
            .select(RoomRow::as_select())
            .first::<RoomRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_room).transpose()
    }

    async fn set_room_availability(
        &self,
        room_id: &RoomId,
        expected: bool,
        new: bool,
    ) -> Result<ConditionalWrite, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            rooms::table.filter(
                rooms::id
                    .eq(room_id.as_uuid())
                    .and(rooms::is_available.eq(expected)),
            ),
        )
        .set(rooms::is_available.eq(new))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(ConditionalWrite::from_rows_affected(affected))
    }

    async fn overwrite_room_availability(
        &self,
        room_id: &RoomId,
        is_available: bool,
    ) -> Result<(), CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(rooms::table.filter(rooms::id.eq(room_id.as_uuid())))
            .set(rooms::is_available.eq(is_available))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(CatalogStoreError::query(format!("room {room_id} not found")));
        }
        Ok(())
    }

    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoomRow> = rooms::table
            .filter(rooms::hotel_id.eq(hotel_id.as_uuid()))
            .order(rooms::room_number.asc())
            .select(RoomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_room).collect()
    }

    async fn insert_room(&self, room: &NewRoom) -> Result<Room, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let capacity = i32::try_from(room.capacity)
            .map_err(|_| CatalogStoreError::query("room capacity out of range"))?;
        let new_row = NewRoomRow {
            hotel_id: *room.hotel_id.as_uuid(),
            room_number: &room.room_number,
            room_type: room.room_type.as_str(),
            capacity,
            price_per_night: room.price_per_night,
            is_available: true,
        };
        let row = diesel::insert_into(rooms::table)
            .values(&new_row)
            .returning(RoomRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_room(row)
    }

    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = hotels::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<HotelRow> = hotels::table
            .order((hotels::created_at.desc(), hotels::id.desc()))
            .offset(to_i64(page.offset()))
            .limit(to_i64(page.limit()))
            .select(HotelRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows.into_iter().map(Hotel::from).collect();
        Ok(Page::new(items, page, to_count(total)))
    }

    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Option<Hotel>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        hotels::table
            .filter(hotels::id.eq(hotel_id.as_uuid()))
            .select(HotelRow::as_select())
            .first::<HotelRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Hotel::from))
            .map_err(map_diesel_error)
    }

    async fn insert_hotel(&self, draft: &HotelDraft) -> Result<Hotel, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewHotelRow {
            name: &draft.name,
            description: draft.description.as_deref(),
            address: &draft.address,
            city: &draft.city,
            state: &draft.state,
            country: &draft.country,
            price_per_night: draft.price_per_night,
            image: draft.image.as_deref(),
        };
        diesel::insert_into(hotels::table)
            .values(&new_row)
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Hotel::from)
            .map_err(map_diesel_error)
    }

    async fn update_hotel(
        &self,
        hotel_id: &HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = HotelUpdate {
            name: &draft.name,
            description: Some(draft.description.as_deref()),
            address: &draft.address,
            city: &draft.city,
            state: &draft.state,
            country: &draft.country,
            price_per_night: Some(draft.price_per_night),
            image: draft.image.as_deref(),
        };
        diesel::update(hotels::table.filter(hotels::id.eq(hotel_id.as_uuid())))
            .set(&changes)
            .returning(HotelRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Hotel::from))
            .map_err(map_diesel_error)
    }

    async fn delete_hotel(
        &self,
        hotel_id: &HotelId,
    ) -> Result<Option<HotelRemoval>, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hotel_uuid = *hotel_id.as_uuid();
        let removed = conn
            .transaction(|conn| {
                async move {
                    let hotel_rooms = rooms::table
                        .filter(rooms::hotel_id.eq(hotel_uuid))
                        .select(rooms::id);
                    let booking_rows: Vec<BookingRow> = diesel::delete(
                        bookings::table.filter(bookings::room_id.eq_any(hotel_rooms)),
                    )
                    .returning(BookingRow::as_returning())
                    .get_results(conn)
                    .await?;
                    let room_rows: Vec<RoomRow> =
                        diesel::delete(rooms::table.filter(rooms::hotel_id.eq(hotel_uuid)))
                            .returning(RoomRow::as_returning())
                            .get_results(conn)
                            .await?;
                    let hotel_row =
                        diesel::delete(hotels::table.filter(hotels::id.eq(hotel_uuid)))
                            .returning(HotelRow::as_returning())
                            .get_result::<HotelRow>(conn)
                            .await
                            .optional()?;
                    Ok::<_, diesel::result::Error>(
                        hotel_row.map(|hotel| (hotel, room_rows, booking_rows)),
                    )
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((hotel_row, room_rows, booking_rows)) = removed else {
            return Ok(None);
        };
        let rooms = room_rows
            .into_iter()
            .map(to_room)
            .collect::<Result<Vec<_>, _>>()?;
        let bookings = booking_rows
            .into_iter()
            .map(|row| Booking::try_from(row).map_err(CatalogStoreError::query))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(HotelRemoval {
            hotel: Hotel::from(hotel_row),
            rooms,
            bookings,
        }))
    }

    async fn count_hotels(&self) -> Result<u64, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        hotels::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(map_diesel_error)
    }

    async fn count_rooms(&self) -> Result<u64, CatalogStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        rooms::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(map_diesel_error)
    }
}
