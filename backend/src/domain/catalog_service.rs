//! Hotel and room administration service.
//!
//! Implements the catalog command and query driving ports over the catalog
//! store, with the booking ledger contributing dashboard totals and the image
//! store holding uploaded hotel pictures. Added rooms and every row removed by
//! a hotel deletion are announced on the change feed.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{
    BookingLedger, BookingLedgerError, CatalogCommand, CatalogQuery, CatalogStore,
    CatalogStoreError, ChangeFeed, ImageKey, ImageStore, ImageStoreError,
};
use crate::domain::{
    CatalogValidationError, ChangeEvent, DashboardSummary, DraftPurpose, Error, Hotel,
    HotelDraft, HotelId, Room, RoomDraft,
};

fn map_store_error(error: CatalogStoreError) -> Error {
    match error {
        CatalogStoreError::Connection { message } => {
            Error::service_unavailable(format!("catalog store unavailable: {message}"))
        }
        CatalogStoreError::Query { message } => {
            Error::internal(format!("catalog store error: {message}"))
        }
        CatalogStoreError::Duplicate { message } => Error::conflict(message),
    }
}

fn map_ledger_error(error: BookingLedgerError) -> Error {
    match error {
        BookingLedgerError::Connection { message } => {
            Error::service_unavailable(format!("booking ledger unavailable: {message}"))
        }
        BookingLedgerError::Query { message } => {
            Error::internal(format!("booking ledger error: {message}"))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("image store unavailable: {message}"))
        }
        ImageStoreError::Write { message } => {
            Error::internal(format!("image upload failed: {message}"))
        }
    }
}

fn map_validation_error(error: CatalogValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn hotel_not_found(hotel_id: &HotelId) -> Error {
    Error::not_found(format!("hotel {hotel_id} not found"))
}

/// Catalog service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CatalogService<C, L, I> {
    catalog: Arc<C>,
    ledger: Arc<L>,
    images: Arc<I>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
}

impl<C, L, I> CatalogService<C, L, I> {
    /// Create a service over the given stores, announcing room changes on
    /// `feed`.
    pub fn new(
        catalog: Arc<C>,
        ledger: Arc<L>,
        images: Arc<I>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            images,
            feed,
            clock,
        }
    }
}

#[async_trait]
impl<C, L, I> CatalogCommand for CatalogService<C, L, I>
where
    C: CatalogStore,
    L: BookingLedger,
    I: ImageStore,
{
    async fn create_hotel(&self, draft: HotelDraft) -> Result<Hotel, Error> {
        let draft = draft
            .validate(DraftPurpose::Create)
            .map_err(map_validation_error)?;
        let hotel = self
            .catalog
            .insert_hotel(&draft)
            .await
            .map_err(map_store_error)?;
        info!(hotel_id = %hotel.id, "hotel created");
        Ok(hotel)
    }

    async fn update_hotel(&self, hotel_id: &HotelId, draft: HotelDraft) -> Result<Hotel, Error> {
        let draft = draft
            .validate(DraftPurpose::Update)
            .map_err(map_validation_error)?;
        self.catalog
            .update_hotel(hotel_id, &draft)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| hotel_not_found(hotel_id))
    }

    async fn delete_hotel(&self, hotel_id: &HotelId) -> Result<(), Error> {
        let removal = self
            .catalog
            .delete_hotel(hotel_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| hotel_not_found(hotel_id))?;
        info!(
            hotel_id = %hotel_id,
            rooms = removal.rooms.len(),
            bookings = removal.bookings.len(),
            "hotel deleted with its rooms and bookings"
        );
        for booking in removal.bookings {
            self.feed.publish(ChangeEvent::booking_deleted(booking));
        }
        for room in removal.rooms {
            self.feed.publish(ChangeEvent::room_deleted(room));
        }
        Ok(())
    }

    async fn add_room(&self, hotel_id: &HotelId, draft: RoomDraft) -> Result<Room, Error> {
        let room = draft.validate(*hotel_id).map_err(map_validation_error)?;
        self.catalog
            .get_hotel(hotel_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| hotel_not_found(hotel_id))?;
        let room = self
            .catalog
            .insert_room(&room)
            .await
            .map_err(map_store_error)?;
        self.feed.publish(ChangeEvent::room_inserted(room.clone()));
        Ok(room)
    }

    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Error> {
        if bytes.is_empty() {
            return Err(Error::invalid_request("image upload is empty"));
        }
        let key = ImageKey::new(self.clock.utc(), file_name);
        let url = self
            .images
            .upload(&key, &bytes)
            .await
            .map_err(map_image_error)?;
        info!(key = %key, size = bytes.len(), "hotel image stored");
        Ok(url)
    }
}

#[async_trait]
impl<C, L, I> CatalogQuery for CatalogService<C, L, I>
where
    C: CatalogStore,
    L: BookingLedger,
    I: ImageStore,
{
    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, Error> {
        self.catalog
            .list_hotels(page)
            .await
            .map_err(map_store_error)
    }

    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Hotel, Error> {
        self.catalog
            .get_hotel(hotel_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| hotel_not_found(hotel_id))
    }

    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, Error> {
        self.catalog
            .list_rooms(hotel_id)
            .await
            .map_err(map_store_error)
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, Error> {
        let hotels = self.catalog.count_hotels().await.map_err(map_store_error)?;
        let rooms = self.catalog.count_rooms().await.map_err(map_store_error)?;
        let bookings = self
            .ledger
            .count_bookings()
            .await
            .map_err(map_ledger_error)?;
        Ok(DashboardSummary {
            hotels,
            rooms,
            bookings,
        })
    }

    async fn fetch_image(&self, key: &str) -> Result<Vec<u8>, Error> {
        let not_found = || Error::not_found(format!("image {key} not found"));
        let key = ImageKey::parse(key).ok_or_else(not_found)?;
        self.images
            .fetch(&key)
            .await
            .map_err(map_image_error)?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
