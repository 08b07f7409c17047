//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain records parse the
//! text-encoded enums and narrow integer columns, failing with a message the
//! adapters wrap into their query error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingId, BookingStatus, Hotel, HotelId, Profile, Role, Room, RoomId, UserId,
};

use super::schema::{bookings, hotels, profiles, rooms};

/// Row struct for reading from the hotels table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hotels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HotelRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub price_per_night: Option<Decimal>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Self {
            id: HotelId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            price_per_night: row.price_per_night,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

/// Insertable struct for creating hotels; the database assigns id and
/// creation time.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hotels)]
pub(crate) struct NewHotelRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
    pub price_per_night: Option<Decimal>,
    pub image: Option<&'a str>,
}

/// Changeset for editing a hotel. `None` fields keep the stored value, so a
/// missing image leaves the current one in place.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = hotels)]
pub(crate) struct HotelUpdate<'a> {
    pub name: &'a str,
    pub description: Option<Option<&'a str>>,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
    pub price_per_night: Option<Option<Decimal>>,
    pub image: Option<&'a str>,
}

/// Row struct for reading from the rooms table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_number: String,
    pub room_type: String,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub is_available: bool,
}

impl TryFrom<RoomRow> for Room {
    type Error = String;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let room_type = row
            .room_type
            .parse()
            .map_err(|err| format!("room {}: {err}", row.id))?;
        let capacity = u32::try_from(row.capacity)
            .map_err(|_| format!("room {}: negative capacity {}", row.id, row.capacity))?;
        Ok(Self {
            id: RoomId::from_uuid(row.id),
            hotel_id: HotelId::from_uuid(row.hotel_id),
            room_number: row.room_number,
            room_type,
            capacity,
            price_per_night: row.price_per_night,
            is_available: row.is_available,
        })
    }
}

/// Insertable struct for new rooms; they start available.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub(crate) struct NewRoomRow<'a> {
    pub hotel_id: Uuid,
    pub room_number: &'a str,
    pub room_type: &'a str,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub is_available: bool,
}

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: Decimal,
    pub status: String,
    pub number_of_guests: i32,
    pub booking_date: DateTime<Utc>,
    pub needs_reconciliation: bool,
}

impl TryFrom<BookingRow> for Booking {
    type Error = String;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|err| format!("booking {}: {err}", row.id))?;
        let number_of_guests = u32::try_from(row.number_of_guests).map_err(|_| {
            format!(
                "booking {}: negative guest count {}",
                row.id, row.number_of_guests
            )
        })?;
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            guest_id: UserId::from_uuid(row.guest_id),
            room_id: RoomId::from_uuid(row.room_id),
            check_in: row.check_in,
            check_out: row.check_out,
            total_amount: row.total_amount,
            status,
            number_of_guests,
            booking_date: row.booking_date,
            needs_reconciliation: row.needs_reconciliation,
        })
    }
}

/// Insertable struct for appending a pending booking.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_amount: Decimal,
    pub status: &'a str,
    pub number_of_guests: i32,
    pub booking_date: DateTime<Utc>,
}

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub full_name: String,
    pub image: Option<String>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = String;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|err| format!("profile {}: {err}", row.id))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            role,
            full_name: row.full_name,
            image: row.image,
        })
    }
}

/// Insertable struct for a profile that can sign in.
#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub role: &'a str,
    pub full_name: &'a str,
    pub image: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
}
