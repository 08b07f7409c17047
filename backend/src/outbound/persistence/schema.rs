//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Hotel listings, newest first in every listing.
    hotels (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        address -> Text,
        city -> Text,
        state -> Text,
        country -> Text,
        /// Advertised starting price; rooms carry the price that is charged.
        price_per_night -> Nullable<Numeric>,
        /// Public URL of the uploaded picture.
        image -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookable rooms. `(hotel_id, room_number)` is unique.
    rooms (id) {
        id -> Uuid,
        /// Owning hotel; deleting the hotel cascades.
        hotel_id -> Uuid,
        room_number -> Text,
        /// One of `Standard`, `Deluxe`, `Presidential`.
        room_type -> Text,
        capacity -> Int4,
        price_per_night -> Numeric,
        /// Claimed by booking admission through conditional updates only.
        is_available -> Bool,
    }
}

diesel::table! {
    /// Account profiles carrying the role that gates admin surfaces.
    profiles (id) {
        id -> Uuid,
        /// `guest` or `admin`.
        role -> Text,
        full_name -> Text,
        image -> Nullable<Text>,
        /// Normalised sign-in email; unique when present.
        email -> Nullable<Text>,
        /// Argon2id PHC string. Profiles without one cannot sign in.
        password_hash -> Nullable<Text>,
    }
}

diesel::table! {
    /// Booking ledger. Rows are appended and updated, never deleted directly.
    bookings (id) {
        id -> Uuid,
        guest_id -> Uuid,
        /// Booked room; deleting the room cascades.
        room_id -> Uuid,
        check_in -> Date,
        check_out -> Date,
        total_amount -> Numeric,
        /// `pending`, `confirmed` or `cancelled`.
        status -> Text,
        number_of_guests -> Int4,
        booking_date -> Timestamptz,
        /// Set when the room flag could not be written after insertion.
        needs_reconciliation -> Bool,
    }
}

diesel::joinable!(rooms -> hotels (hotel_id));
diesel::joinable!(bookings -> rooms (room_id));

diesel::allow_tables_to_appear_in_same_query!(bookings, hotels, profiles, rooms);
