//! Driving port for inventory reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{DashboardSummary, Error, Hotel, HotelId, Room};

/// Read-only catalog use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Hotels, newest first.
    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, Error>;

    /// One hotel.
    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Hotel, Error>;

    /// Rooms of a hotel ordered by room number.
    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, Error>;

    /// Inventory and ledger totals.
    async fn dashboard_summary(&self) -> Result<DashboardSummary, Error>;

    /// Bytes of an uploaded image by key.
    async fn fetch_image(&self, key: &str) -> Result<Vec<u8>, Error>;
}
