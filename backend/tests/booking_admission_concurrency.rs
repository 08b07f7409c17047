//! Concurrent admission of two requests for the same room.
//!
//! A gated catalog store holds every room read until both requests have
//! seen the room as available, forcing the interleaving in which the
//! check-then-act strategy double books.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use rstest::rstest;
use tokio::sync::Barrier;

use backend::domain::ports::{BookingLedger, CatalogStore, CatalogStoreError, ConditionalWrite};
use backend::domain::{
    AdmissionPolicy, AdmissionStrategy, BookingAdmissionError, BookingAdmissionService,
    BookingFilter, BookingRequest, Hotel, HotelDraft, HotelId, HotelRemoval, NewRoom, Room,
    RoomId, RoomType, UserId,
};
use backend::test_support::fixtures::{RoomSeed, day, seed_hotel, seed_room};
use backend::outbound::change_feed::BroadcastChangeFeed;
use backend::outbound::memory::InMemoryStore;

/// Catalog store that parks room reads on a shared barrier.
struct GatedCatalog {
    inner: InMemoryStore,
    gate: Arc<Barrier>,
}

#[async_trait]
impl CatalogStore for GatedCatalog {
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, CatalogStoreError> {
        let room = self.inner.get_room(room_id).await;
        self.gate.wait().await;
        room
    }

    async fn set_room_availability(
        &self,
        room_id: &RoomId,
        expected: bool,
        new: bool,
    ) -> Result<ConditionalWrite, CatalogStoreError> {
        self.inner
            .set_room_availability(room_id, expected, new)
            .await
    }

    async fn overwrite_room_availability(
        &self,
        room_id: &RoomId,
        is_available: bool,
    ) -> Result<(), CatalogStoreError> {
        self.inner
            .overwrite_room_availability(room_id, is_available)
            .await
    }

    async fn list_rooms(&self, hotel_id: &HotelId) -> Result<Vec<Room>, CatalogStoreError> {
        self.inner.list_rooms(hotel_id).await
    }

    async fn insert_room(&self, room: &NewRoom) -> Result<Room, CatalogStoreError> {
        self.inner.insert_room(room).await
    }

    async fn list_hotels(&self, page: PageRequest) -> Result<Page<Hotel>, CatalogStoreError> {
        self.inner.list_hotels(page).await
    }

    async fn get_hotel(&self, hotel_id: &HotelId) -> Result<Option<Hotel>, CatalogStoreError> {
        self.inner.get_hotel(hotel_id).await
    }

    async fn insert_hotel(&self, draft: &HotelDraft) -> Result<Hotel, CatalogStoreError> {
        self.inner.insert_hotel(draft).await
    }

    async fn update_hotel(
        &self,
        hotel_id: &HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, CatalogStoreError> {
        self.inner.update_hotel(hotel_id, draft).await
    }

    async fn delete_hotel(
        &self,
        hotel_id: &HotelId,
    ) -> Result<Option<HotelRemoval>, CatalogStoreError> {
        self.inner.delete_hotel(hotel_id).await
    }

    async fn count_hotels(&self) -> Result<u64, CatalogStoreError> {
        self.inner.count_hotels().await
    }

    async fn count_rooms(&self) -> Result<u64, CatalogStoreError> {
        self.inner.count_rooms().await
    }
}

struct Race {
    store: InMemoryStore,
    service: BookingAdmissionService<GatedCatalog, InMemoryStore>,
    room: Room,
}

async fn race(strategy: AdmissionStrategy) -> Race {
    let store = InMemoryStore::default();
    let hotel = seed_hotel(&store, "Lighthouse Inn")
        .await
        .expect("hotel stored");
    let room = seed_room(
        &store,
        &hotel,
        RoomSeed {
            room_number: "7".to_owned(),
            room_type: RoomType::Deluxe,
            ..RoomSeed::default()
        },
    )
    .await
    .expect("room stored");

    let catalog = GatedCatalog {
        inner: store.clone(),
        gate: Arc::new(Barrier::new(2)),
    };
    let service = BookingAdmissionService::new(
        Arc::new(catalog),
        Arc::new(store.clone()),
        Arc::new(BroadcastChangeFeed::default()),
        Arc::new(mockable::DefaultClock),
    )
    .with_policy(AdmissionPolicy {
        strategy,
        restore_on_cancel: true,
    });
    Race {
        store,
        service,
        room,
    }
}

fn request(room: &Room) -> BookingRequest {
    BookingRequest {
        guest_id: UserId::random(),
        room_id: room.id,
        check_in: day("2030-07-01"),
        check_out: day("2030-07-04"),
        number_of_guests: 2,
    }
}

#[rstest]
#[tokio::test]
async fn conditional_claim_admits_at_most_one() {
    let Race {
        store,
        service,
        room,
    } = race(AdmissionStrategy::ConditionalClaim).await;

    let (first, second) = tokio::join!(
        service.admit(request(&room)),
        service.admit(request(&room))
    );

    let outcomes = [first, second];
    let admitted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(admitted, 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(BookingAdmissionError::RoomUnavailable(id)) if *id == room.id
    )));
    let bookings = store
        .list_bookings(BookingFilter::All)
        .await
        .expect("ledger readable");
    assert_eq!(bookings.len(), 1);
    let stored = store
        .get_room(&room.id)
        .await
        .expect("catalog readable")
        .expect("room exists");
    assert!(!stored.is_available);
}

#[rstest]
#[tokio::test]
async fn check_then_act_double_books_under_the_same_interleaving() {
    let Race {
        store,
        service,
        room,
    } = race(AdmissionStrategy::CheckThenAct).await;

    let (first, second) = tokio::join!(
        service.admit(request(&room)),
        service.admit(request(&room))
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    let bookings = store
        .list_bookings(BookingFilter::All)
        .await
        .expect("ledger readable");
    assert_eq!(bookings.len(), 2);
}
