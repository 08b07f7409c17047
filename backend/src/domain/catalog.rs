//! Hotel and room inventory model.
//!
//! The catalog is the source of truth for room price, capacity and the
//! availability flag that booking admission claims. Drafts validate raw
//! administrator input before anything reaches a store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Booking, HotelId, RoomId};

/// Validation failures for catalog drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    /// A required text field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Room capacity outside `1..=MAX_ROOM_CAPACITY`.
    #[error("capacity must be between 1 and {MAX_ROOM_CAPACITY}")]
    InvalidCapacity,
    /// Room price not strictly positive.
    #[error("price per night must be greater than zero")]
    InvalidRoomPrice,
    /// Hotel price below zero.
    #[error("price per night must not be negative")]
    NegativeHotelPrice,
    /// Price above the stored range or with more than two decimal places.
    #[error("price per night must be at most 99999999.99 with at most two decimal places")]
    PriceOutOfRange,
    /// Room type outside Standard, Deluxe or Presidential.
    #[error("unknown room type: {0}")]
    UnknownRoomType(String),
}

/// Largest room capacity the inventory stores.
pub const MAX_ROOM_CAPACITY: u32 = i32::MAX.unsigned_abs();

/// Decimal places kept for prices and totals.
pub const MONEY_SCALE: u32 = 2;

/// Largest nightly price the inventory stores (`NUMERIC(10, 2)`).
pub fn max_price_per_night() -> Decimal {
    Decimal::new(9_999_999_999, MONEY_SCALE)
}

fn price_in_range(price: Decimal) -> bool {
    price <= max_price_per_night() && price.normalize().scale() <= MONEY_SCALE
}

/// A hotel listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: HotelId,
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

/// Whether a hotel draft creates a listing or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPurpose {
    /// New listings must carry an image.
    Create,
    /// Edits may omit the image to keep the current one.
    Update,
}

/// Administrator input for creating or editing a hotel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(default)]
    pub price_per_night: Option<Decimal>,
    #[serde(default)]
    pub image: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, CatalogValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

impl HotelDraft {
    /// Trim and validate the draft.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{DraftPurpose, HotelDraft};
    ///
    /// let draft = HotelDraft {
    ///     name: " Sea View ".into(),
    ///     address: "1 Quay".into(),
    ///     city: "Brest".into(),
    ///     state: "Finistere".into(),
    ///     country: "France".into(),
    ///     image: Some("https://img/sea.png".into()),
    ///     ..HotelDraft::default()
    /// };
    /// let valid = draft.validate(DraftPurpose::Create).expect("valid draft");
    /// assert_eq!(valid.name, "Sea View");
    /// ```
    pub fn validate(self, purpose: DraftPurpose) -> Result<Self, CatalogValidationError> {
        let image = optional(self.image);
        if purpose == DraftPurpose::Create && image.is_none() {
            return Err(CatalogValidationError::MissingField("image"));
        }
        if let Some(price) = self.price_per_night {
            if price < Decimal::ZERO {
                return Err(CatalogValidationError::NegativeHotelPrice);
            }
            if !price_in_range(price) {
                return Err(CatalogValidationError::PriceOutOfRange);
            }
        }
        Ok(Self {
            name: required(&self.name, "name")?,
            description: optional(self.description),
            address: required(&self.address, "address")?,
            city: required(&self.city, "city")?,
            state: required(&self.state, "state")?,
            country: required(&self.country, "country")?,
            price_per_night: self.price_per_night,
            image,
        })
    }
}

/// Room category offered by a hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Deluxe,
    Presidential,
}

impl RoomType {
    /// Canonical spelling used in storage and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Deluxe => "Deluxe",
            Self::Presidential => "Presidential",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = CatalogValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "deluxe" => Ok(Self::Deluxe),
            "presidential" => Ok(Self::Presidential),
            _ => Err(CatalogValidationError::UnknownRoomType(s.trim().to_owned())),
        }
    }
}

/// A bookable room.
///
/// `is_available` is the only field booking admission mutates, and it only
/// does so through a conditional store write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub hotel_id: HotelId,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: u32,
    pub price_per_night: Decimal,
    pub is_available: bool,
}

impl Room {
    /// Copy of the room with a different availability flag.
    #[must_use]
    pub fn with_availability(&self, is_available: bool) -> Self {
        Self {
            is_available,
            ..self.clone()
        }
    }
}

/// Validated room ready for insertion. New rooms start available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub hotel_id: HotelId,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: u32,
    pub price_per_night: Decimal,
}

/// Administrator input for adding a room to a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    pub room_number: String,
    pub room_type: String,
    pub capacity: i64,
    pub price_per_night: Decimal,
}

impl RoomDraft {
    /// Validate the draft for the given hotel.
    pub fn validate(self, hotel_id: HotelId) -> Result<NewRoom, CatalogValidationError> {
        let room_number = required(&self.room_number, "room number")?;
        let room_type = self.room_type.parse()?;
        let capacity = u32::try_from(self.capacity)
            .ok()
            .filter(|capacity| (1..=MAX_ROOM_CAPACITY).contains(capacity))
            .ok_or(CatalogValidationError::InvalidCapacity)?;
        if self.price_per_night <= Decimal::ZERO {
            return Err(CatalogValidationError::InvalidRoomPrice);
        }
        if !price_in_range(self.price_per_night) {
            return Err(CatalogValidationError::PriceOutOfRange);
        }
        Ok(NewRoom {
            hotel_id,
            room_number,
            room_type,
            capacity,
            price_per_night: self.price_per_night,
        })
    }
}

/// Everything a hotel deletion removed.
///
/// Rooms go with their hotel and bookings go with their room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelRemoval {
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
}

/// Inventory and ledger totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub hotels: u64,
    pub rooms: u64,
    pub bookings: u64,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hotel_draft() -> HotelDraft {
        HotelDraft {
            name: "Harbour Lights".to_owned(),
            description: Some("  ".to_owned()),
            address: "4 Pier Road".to_owned(),
            city: "Oban".to_owned(),
            state: "Argyll".to_owned(),
            country: "Scotland".to_owned(),
            price_per_night: Some(Decimal::new(12_000, 2)),
            image: Some("https://cdn.example/harbour.png".to_owned()),
        }
    }

    #[rstest]
    fn blank_optional_fields_collapse_to_none(hotel_draft: HotelDraft) {
        let valid = hotel_draft
            .validate(DraftPurpose::Create)
            .expect("draft is valid");
        assert_eq!(valid.description, None);
    }

    #[rstest]
    #[case::name(|d: &mut HotelDraft| d.name = " ".to_owned(), "name")]
    #[case::address(|d: &mut HotelDraft| d.address.clear(), "address")]
    #[case::city(|d: &mut HotelDraft| d.city.clear(), "city")]
    #[case::state(|d: &mut HotelDraft| d.state.clear(), "state")]
    #[case::country(|d: &mut HotelDraft| d.country.clear(), "country")]
    #[case::image(|d: &mut HotelDraft| d.image = None, "image")]
    fn create_requires_every_listing_field(
        mut hotel_draft: HotelDraft,
        #[case] blank: fn(&mut HotelDraft),
        #[case] field: &'static str,
    ) {
        blank(&mut hotel_draft);
        assert_eq!(
            hotel_draft.validate(DraftPurpose::Create),
            Err(CatalogValidationError::MissingField(field))
        );
    }

    #[rstest]
    fn update_keeps_current_image_when_omitted(mut hotel_draft: HotelDraft) {
        hotel_draft.image = None;
        let valid = hotel_draft
            .validate(DraftPurpose::Update)
            .expect("image is optional on update");
        assert!(valid.image.is_none());
    }

    #[rstest]
    #[case(Decimal::new(-1, 0), CatalogValidationError::NegativeHotelPrice)]
    #[case(Decimal::MAX, CatalogValidationError::PriceOutOfRange)]
    #[case(Decimal::new(12_345, 3), CatalogValidationError::PriceOutOfRange)]
    fn hotel_prices_must_fit_the_stored_range(
        mut hotel_draft: HotelDraft,
        #[case] price: Decimal,
        #[case] expected: CatalogValidationError,
    ) {
        hotel_draft.price_per_night = Some(price);
        assert_eq!(hotel_draft.validate(DraftPurpose::Create), Err(expected));
    }

    #[rstest]
    fn largest_stored_values_are_accepted() {
        let draft = RoomDraft {
            room_number: "PH".to_owned(),
            room_type: "Presidential".to_owned(),
            capacity: i64::from(MAX_ROOM_CAPACITY),
            price_per_night: max_price_per_night(),
        };
        let room = draft.validate(HotelId::random()).expect("bounds are inclusive");
        assert_eq!(room.capacity, MAX_ROOM_CAPACITY);
        assert_eq!(room.price_per_night.to_string(), "99999999.99");
    }

    #[rstest]
    #[case("standard", RoomType::Standard)]
    #[case("DELUXE", RoomType::Deluxe)]
    #[case(" Presidential ", RoomType::Presidential)]
    fn room_types_parse_case_insensitively(#[case] raw: &str, #[case] expected: RoomType) {
        assert_eq!(raw.parse::<RoomType>(), Ok(expected));
    }

    #[rstest]
    #[case("101", "Suite", 2, Decimal::ONE, CatalogValidationError::UnknownRoomType("Suite".to_owned()))]
    #[case(" ", "Standard", 2, Decimal::ONE, CatalogValidationError::MissingField("room number"))]
    #[case("101", "Standard", 0, Decimal::ONE, CatalogValidationError::InvalidCapacity)]
    #[case("101", "Standard", -3, Decimal::ONE, CatalogValidationError::InvalidCapacity)]
    #[case("101", "Standard", 2, Decimal::ZERO, CatalogValidationError::InvalidRoomPrice)]
    #[case("101", "Standard", 2_147_483_648, Decimal::ONE, CatalogValidationError::InvalidCapacity)]
    #[case("101", "Standard", 2, Decimal::MAX, CatalogValidationError::PriceOutOfRange)]
    #[case("101", "Standard", 2, Decimal::new(100_000_000, 0), CatalogValidationError::PriceOutOfRange)]
    #[case("101", "Standard", 2, Decimal::new(1_005, 3), CatalogValidationError::PriceOutOfRange)]
    fn invalid_room_drafts_are_rejected(
        #[case] room_number: &str,
        #[case] room_type: &str,
        #[case] capacity: i64,
        #[case] price: Decimal,
        #[case] expected: CatalogValidationError,
    ) {
        let draft = RoomDraft {
            room_number: room_number.to_owned(),
            room_type: room_type.to_owned(),
            capacity,
            price_per_night: price,
        };
        assert_eq!(draft.validate(HotelId::random()), Err(expected));
    }

    #[rstest]
    fn valid_room_draft_is_normalised() {
        let hotel_id = HotelId::random();
        let draft = RoomDraft {
            room_number: " 12B ".to_owned(),
            room_type: "deluxe".to_owned(),
            capacity: 3,
            price_per_night: Decimal::new(9_950, 2),
        };
        let room = draft.validate(hotel_id).expect("valid draft");
        assert_eq!(room.room_number, "12B");
        assert_eq!(room.room_type, RoomType::Deluxe);
        assert_eq!(room.capacity, 3);
        assert_eq!(room.hotel_id, hotel_id);
    }
}
