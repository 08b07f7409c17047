//! Behaviour of the in-memory catalog and ledger.

use chrono::{NaiveDate, Utc};
use pagination::PageRequest;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::InMemoryStore;
use crate::domain::ports::{
    AccountStore, AccountStoreError, BookingLedger, CatalogStore, ConditionalWrite,
    IdentityProvider,
};
use crate::domain::{
    BookingFilter, BookingId, BookingStatus, HotelDraft, NewAccount, NewBooking, NewRoom,
    PasswordDigest, Profile, Role, Room, RoomType, StayRange, UserId,
};

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

fn draft(name: &str) -> HotelDraft {
    HotelDraft {
        name: name.to_owned(),
        address: "1 Main Street".to_owned(),
        city: "Galway".to_owned(),
        state: "Connacht".to_owned(),
        country: "Ireland".to_owned(),
        image: Some("/images/front.png".to_owned()),
        ..HotelDraft::default()
    }
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

async fn seeded_room(store: &InMemoryStore) -> Room {
    let hotel = store
        .insert_hotel(&draft("Quay House"))
        .await
        .expect("hotel stored");
    store
        .insert_room(&NewRoom {
            hotel_id: hotel.id,
            room_number: "101".to_owned(),
            room_type: RoomType::Standard,
            capacity: 2,
            price_per_night: Decimal::new(80, 0),
        })
        .await
        .expect("room stored")
}

fn booking_for(room: &Room, check_in: &str, check_out: &str) -> NewBooking {
    NewBooking {
        guest_id: UserId::random(),
        room_id: room.id,
        stay: StayRange::new(day(check_in), day(check_out)).expect("valid stay"),
        total_amount: Decimal::new(160, 0),
        number_of_guests: 1,
        booking_date: Utc::now(),
    }
}

#[rstest]
#[tokio::test]
async fn availability_claim_applies_once(store: InMemoryStore) {
    let room = seeded_room(&store).await;

    let first = store
        .set_room_availability(&room.id, true, false)
        .await
        .expect("claim");
    let second = store
        .set_room_availability(&room.id, true, false)
        .await
        .expect("claim");

    assert_eq!(first, ConditionalWrite::Applied);
    assert_eq!(second, ConditionalWrite::Conflict);
    let stored = store.get_room(&room.id).await.expect("read").expect("room");
    assert!(!stored.is_available);
}

#[rstest]
#[tokio::test]
async fn duplicate_room_numbers_are_rejected(store: InMemoryStore) {
    let room = seeded_room(&store).await;

    let err = store
        .insert_room(&NewRoom {
            hotel_id: room.hotel_id,
            room_number: room.room_number.clone(),
            room_type: RoomType::Deluxe,
            capacity: 4,
            price_per_night: Decimal::ONE,
        })
        .await
        .expect_err("duplicate");

    assert!(err.to_string().contains("already exists"));
}

#[rstest]
#[tokio::test]
async fn deleting_a_hotel_cascades(store: InMemoryStore) {
    let room = seeded_room(&store).await;
    let booking = store
        .insert_booking(&booking_for(&room, "2024-05-10", "2024-05-12"))
        .await
        .expect("booking stored");

    let removal = store
        .delete_hotel(&room.hotel_id)
        .await
        .expect("delete")
        .expect("hotel existed");

    assert_eq!(removal.hotel.id, room.hotel_id);
    assert_eq!(removal.rooms, vec![room.clone()]);
    assert_eq!(removal.bookings, vec![booking]);
    assert_eq!(store.count_rooms().await.expect("count"), 0);
    assert_eq!(store.count_bookings().await.expect("count"), 0);
    assert!(
        store
            .delete_hotel(&room.hotel_id)
            .await
            .expect("delete")
            .is_none()
    );
}

#[rstest]
#[case("2024-05-11", true)]
#[case("2024-05-12", true)]
#[case("2024-05-13", false)]
#[tokio::test]
async fn covering_check_is_inclusive(
    store: InMemoryStore,
    #[case] today: &str,
    #[case] expected: bool,
) {
    let room = seeded_room(&store).await;
    store
        .insert_booking(&booking_for(&room, "2024-05-10", "2024-05-12"))
        .await
        .expect("booking stored");

    let covered = store
        .has_active_booking_covering(&room.id, day(today), &BookingId::random())
        .await
        .expect("query");

    assert_eq!(covered, expected);
}

#[rstest]
#[tokio::test]
async fn cancelled_bookings_do_not_cover(store: InMemoryStore) {
    let room = seeded_room(&store).await;
    let booking = store
        .insert_booking(&booking_for(&room, "2024-05-10", "2024-05-12"))
        .await
        .expect("booking stored");
    store
        .update_booking_status(&booking.id, BookingStatus::Pending, BookingStatus::Cancelled)
        .await
        .expect("status write");

    let covered = store
        .has_active_booking_covering(&room.id, day("2024-05-11"), &BookingId::random())
        .await
        .expect("query");

    assert!(!covered);
}

#[rstest]
#[tokio::test]
async fn status_write_is_conditional(store: InMemoryStore) {
    let room = seeded_room(&store).await;
    let booking = store
        .insert_booking(&booking_for(&room, "2024-05-10", "2024-05-12"))
        .await
        .expect("booking stored");

    let stale = store
        .update_booking_status(&booking.id, BookingStatus::Confirmed, BookingStatus::Cancelled)
        .await
        .expect("status write");

    assert_eq!(stale, ConditionalWrite::Conflict);
}

#[rstest]
#[tokio::test]
async fn hotels_list_newest_first_with_totals(store: InMemoryStore) {
    for name in ["Alpha", "Bravo", "Charlie", "Delta"] {
        store.insert_hotel(&draft(name)).await.expect("hotel stored");
    }

    let page = store
        .list_hotels(PageRequest::new(1, 3).expect("page"))
        .await
        .expect("listing");

    assert_eq!(page.total_count(), 4);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items().len(), 3);
    assert_eq!(page.items()[0].name, "Delta");
}

#[rstest]
#[tokio::test]
async fn guest_listing_round_trips_stay_and_total(store: InMemoryStore) {
    let room = seeded_room(&store).await;
    let request = booking_for(&room, "2024-05-10", "2024-05-12");
    let guest = request.guest_id;
    store.insert_booking(&request).await.expect("booking stored");
    store
        .insert_booking(&booking_for(&room, "2024-06-01", "2024-06-03"))
        .await
        .expect("other guest");

    let listed = store
        .list_bookings(BookingFilter::Guest(guest))
        .await
        .expect("listing");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].booking.check_in, day("2024-05-10"));
    assert_eq!(listed[0].booking.check_out, day("2024-05-12"));
    assert_eq!(listed[0].booking.total_amount, Decimal::new(160, 0));
}

#[rstest]
#[tokio::test]
async fn listings_join_room_hotel_and_guest(store: InMemoryStore) {
    let room = seeded_room(&store).await;
    let request = booking_for(&room, "2024-05-10", "2024-05-12");
    let guest = Profile {
        id: request.guest_id,
        role: Role::Guest,
        full_name: "Mairi Flett".to_owned(),
        image: None,
    };
    store
        .insert_account(&account(guest.clone(), "mairi@example.com"))
        .await
        .expect("account stored");
    store.insert_booking(&request).await.expect("booking stored");
    store
        .insert_booking(&booking_for(&room, "2024-06-01", "2024-06-03"))
        .await
        .expect("profile-less guest");

    let page = store
        .page_bookings(BookingFilter::All, PageRequest::new(1, 10).expect("page"))
        .await
        .expect("listing");

    let views = page.items();
    assert_eq!(views.len(), 2);
    assert!(views.iter().all(|view| view.room.room_number == "101"));
    assert!(views.iter().all(|view| view.room.hotel.name == "Quay House"));
    let profiles: Vec<Option<Profile>> = views.iter().map(|view| view.guest.clone()).collect();
    assert!(profiles.contains(&Some(guest)));
    assert!(profiles.contains(&None));
}

fn account(profile: Profile, email: &str) -> NewAccount {
    NewAccount {
        profile,
        email: email.to_owned(),
        password: PasswordDigest::from_stored("$argon2id$stub"),
    }
}

fn guest_profile() -> Profile {
    Profile {
        id: UserId::random(),
        role: Role::Guest,
        full_name: "Hamish".to_owned(),
        image: None,
    }
}

#[rstest]
#[tokio::test]
async fn accounts_resolve_by_email_and_id(store: InMemoryStore) {
    let profile = guest_profile();
    store
        .insert_account(&account(profile.clone(), "hamish@example.com"))
        .await
        .expect("account stored");

    let found = store
        .find_account("hamish@example.com")
        .await
        .expect("lookup")
        .expect("account present");
    let resolved = store.resolve(&profile.id).await.expect("resolve");

    assert_eq!(found.user_id, profile.id);
    assert_eq!(resolved, Some(profile));
    assert!(store.find_account("other@example.com").await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(store: InMemoryStore) {
    store
        .insert_account(&account(guest_profile(), "hamish@example.com"))
        .await
        .expect("first account");

    let err = store
        .insert_account(&account(guest_profile(), "hamish@example.com"))
        .await
        .expect_err("email taken");

    assert!(matches!(err, AccountStoreError::Duplicate { .. }));
}
