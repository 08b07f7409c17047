//! Port for hotel and room inventory persistence.
//!
//! The store owns the room availability flag. Admission only changes it
//! through [`CatalogStore::set_room_availability`], a write conditioned on the
//! flag's current value, so two racing claims cannot both succeed.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Hotel, HotelDraft, HotelId, HotelRemoval, NewRoom, Room, RoomId};

use super::{ConditionalWrite, define_port_error};

define_port_error! {
    /// Errors raised by catalog store adapters.
    pub enum CatalogStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "catalog store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalog store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } => "catalog store rejected duplicate: {message}",
    }
}

/// Port for reading and mutating hotels and rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read one room.
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, CatalogStoreError>;

    /// Set `is_available` to `new` only if it currently equals `expected`.
    async fn set_room_availability(
        &self,
        room_id: &RoomId,
        expected: bool,
        new: bool,
    ) -> Result<ConditionalWrite, CatalogStoreError>;

    /// Write `is_available` regardless of its current value.
    ///
    /// Only the legacy check-then-act admission strategy uses this.
    async fn overwrite_room_availability(
        &self,
        room_id: &RoomId,
        is_available: bool,
    ) -> Result<(), CatalogStoreError>;

    /// Rooms of a hotel ordered by room number.
    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, CatalogStoreError>;

    /// Insert a room; it starts available.
    async fn insert_room(&self, room: &NewRoom) -> Result<Room, CatalogStoreError>;

    /// Hotels ordered by creation time, newest first.
    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, CatalogStoreError>;

    /// Read one hotel.
    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Option<Hotel>, CatalogStoreError>;

    /// Insert a validated hotel draft.
    async fn insert_hotel(&self, draft: &HotelDraft) -> Result<Hotel, CatalogStoreError>;

    /// Update a hotel. A draft without an image keeps the stored image.
    ///
    /// Returns `None` when the hotel does not exist.
    async fn update_hotel(
        &self,
        hotel_id: &HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, CatalogStoreError>;

    /// Delete a hotel along with its rooms and their bookings.
    ///
    /// Returns the removed rows, or `None` when the hotel does not exist.
    async fn delete_hotel(
        &self,
        hotel_id: &HotelId,
    ) -> Result<Option<HotelRemoval>, CatalogStoreError>;

    /// Number of hotels.
    async fn count_hotels(&self) -> Result<u64, CatalogStoreError>;

    /// Number of rooms across every hotel.
    async fn count_rooms(&self) -> Result<u64, CatalogStoreError>;
}
