//! Driving port for inventory administration.

use async_trait::async_trait;

use crate::domain::{Error, Hotel, HotelDraft, HotelId, Room, RoomDraft};

/// Use cases that mutate hotels, rooms and their images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Create a hotel; the draft must carry an uploaded image URL.
    async fn create_hotel(&self, draft: HotelDraft) -> Result<Hotel, Error>;

    /// Edit a hotel; omitting the image keeps the current one.
    async fn update_hotel(&self, hotel_id: &HotelId, draft: HotelDraft) -> Result<Hotel, Error>;

    /// Delete a hotel with its rooms and bookings.
    async fn delete_hotel(&self, hotel_id: &HotelId) -> Result<(), Error>;

    /// Add an available room to a hotel.
    async fn add_room(&self, hotel_id: &HotelId, draft: RoomDraft) -> Result<Room, Error>;

    /// Store an image and return its public URL.
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Error>;
}
