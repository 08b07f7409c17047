//! `CatalogStore` over the shared in-memory state.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CatalogStore, CatalogStoreError, ConditionalWrite};
use crate::domain::{Booking, Hotel, HotelDraft, HotelId, HotelRemoval, NewRoom, Room, RoomId};

use super::{InMemoryStore, newest_first, page_of};

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        Ok(state.rooms.iter().find(|room| room.id == *room_id).cloned())
    }

    async fn set_room_availability(
        &self,
        room_id: &RoomId,
        expected: bool,
        new: bool,
    ) -> Result<ConditionalWrite, CatalogStoreError> {
        let mut state = self.lock(CatalogStoreError::query)?;
        let claimed = state
            .rooms
            .iter_mut()
            .find(|room| room.id == *room_id && room.is_available == expected)
            .map(|room| room.is_available = new)
            .is_some();
        Ok(if claimed {
            ConditionalWrite::Applied
        } else {
            ConditionalWrite::Conflict
        })
    }

    async fn overwrite_room_availability(
        &self,
        room_id: &RoomId,
        is_available: bool,
    ) -> Result<(), CatalogStoreError> {
        let mut state = self.lock(CatalogStoreError::query)?;
        let room = state
            .rooms
            .iter_mut()
            .find(|room| room.id == *room_id)
            .ok_or_else(|| CatalogStoreError::query(format!("room {room_id} not found")))?;
        room.is_available = is_available;
        Ok(())
    }

    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        let mut rooms: Vec<Room> = state
            .rooms
            .iter()
            .filter(|room| room.hotel_id == *hotel_id)
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rooms)
    }

    async fn insert_room(&self, room: &NewRoom) -> Result<Room, CatalogStoreError> {
        let mut state = self.lock(CatalogStoreError::query)?;
        if !state.hotels.iter().any(|hotel| hotel.id == room.hotel_id) {
            return Err(CatalogStoreError::query("referenced record does not exist"));
        }
        if state
            .rooms
            .iter()
            .any(|r| r.hotel_id == room.hotel_id && r.room_number == room.room_number)
        {
            return Err(CatalogStoreError::duplicate(
                "room number already exists in this hotel",
            ));
        }
        let stored = Room {
            id: RoomId::random(),
            hotel_id: room.hotel_id,
            room_number: room.room_number.clone(),
            room_type: room.room_type,
            capacity: room.capacity,
            price_per_night: room.price_per_night,
            is_available: true,
        };
        state.rooms.push(stored.clone());
        Ok(stored)
    }

    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        let ordered = newest_first(&state.hotels, |hotel| hotel.created_at);
        Ok(page_of(ordered, page))
    }

    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Option<Hotel>, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        Ok(state.hotels.iter().find(|hotel| hotel.id == *hotel_id).cloned())
    }

    async fn insert_hotel(&self, draft: &HotelDraft) -> Result<Hotel, CatalogStoreError> {
        let created_at = self.clock.utc();
        let mut state = self.lock(CatalogStoreError::query)?;
        let hotel = Hotel {
            id: HotelId::random(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            country: draft.country.clone(),
            price_per_night: draft.price_per_night,
            image: draft.image.clone(),
            created_at,
        };
        state.hotels.push(hotel.clone());
        Ok(hotel)
    }

    async fn update_hotel(
        &self,
        hotel_id: &HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, CatalogStoreError> {
        let mut state = self.lock(CatalogStoreError::query)?;
        let Some(hotel) = state.hotels.iter_mut().find(|hotel| hotel.id == *hotel_id) else {
            return Ok(None);
        };
        hotel.name.clone_from(&draft.name);
        hotel.description.clone_from(&draft.description);
        hotel.address.clone_from(&draft.address);
        hotel.city.clone_from(&draft.city);
        hotel.state.clone_from(&draft.state);
        hotel.country.clone_from(&draft.country);
        hotel.price_per_night = draft.price_per_night;
        if let Some(image) = &draft.image {
            hotel.image = Some(image.clone());
        }
        Ok(Some(hotel.clone()))
    }

    async fn delete_hotel(
        &self,
        hotel_id: &HotelId,
    ) -> Result<Option<HotelRemoval>, CatalogStoreError> {
        let mut state = self.lock(CatalogStoreError::query)?;
        let Some(position) = state.hotels.iter().position(|hotel| hotel.id == *hotel_id) else {
            return Ok(None);
        };
        let hotel = state.hotels.remove(position);
        let (rooms, kept_rooms): (Vec<Room>, Vec<Room>) = std::mem::take(&mut state.rooms)
            .into_iter()
            .partition(|room| room.hotel_id == *hotel_id);
        state.rooms = kept_rooms;
        let (bookings, kept_bookings): (Vec<Booking>, Vec<Booking>) = std::mem::take(&mut state.bookings)
            .into_iter()
            .partition(|booking| rooms.iter().any(|room| room.id == booking.room_id));
        state.bookings = kept_bookings;
        Ok(Some(HotelRemoval {
            hotel,
            rooms,
            bookings,
        }))
    }

    async fn count_hotels(&self) -> Result<u64, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        Ok(count(state.hotels.len()))
    }

    async fn count_rooms(&self) -> Result<u64, CatalogStoreError> {
        let state = self.lock(CatalogStoreError::query)?;
        Ok(count(state.rooms.len()))
    }
}
