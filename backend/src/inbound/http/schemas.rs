//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module mirrors their wire shape for utoipa so the inbound adapter owns the
//! documentation concern.

#![expect(
    dead_code,
    reason = "Schema mirrors are only read by utoipa's OpenAPI generation"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with current state, such as a taken room.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "room is not available")]
    message: String,
    /// Correlation identifier echoed from the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Machine-readable context, such as `{"code": "partial_admission"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Hotel`].
#[derive(ToSchema)]
#[schema(as = Hotel)]
#[schema(rename_all = "camelCase")]
pub struct HotelSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    description: Option<String>,
    address: String,
    city: String,
    state: String,
    country: String,
    #[schema(value_type = Option<String>, example = "120.00")]
    price_per_night: Option<String>,
    image: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::RoomType`].
#[derive(ToSchema)]
#[schema(as = RoomType)]
pub enum RoomTypeSchema {
    Standard,
    Deluxe,
    Presidential,
}

/// OpenAPI schema for [`crate::domain::Room`].
#[derive(ToSchema)]
#[schema(as = Room)]
#[schema(rename_all = "camelCase")]
pub struct RoomSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    hotel_id: String,
    room_number: String,
    room_type: RoomTypeSchema,
    #[schema(minimum = 1)]
    capacity: u32,
    #[schema(example = "95.00")]
    price_per_night: String,
    is_available: bool,
}

/// OpenAPI schema for [`crate::domain::BookingStatus`].
#[derive(ToSchema)]
#[schema(as = BookingStatus)]
pub enum BookingStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "confirmed")]
    Confirmed,
    #[schema(rename = "cancelled")]
    Cancelled,
}

/// OpenAPI schema for [`crate::domain::Booking`].
#[derive(ToSchema)]
#[schema(as = Booking)]
#[schema(rename_all = "camelCase")]
pub struct BookingSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    guest_id: String,
    #[schema(format = "uuid")]
    room_id: String,
    #[schema(format = "date")]
    check_in: String,
    #[schema(format = "date")]
    check_out: String,
    #[schema(example = "300.00")]
    total_amount: String,
    status: BookingStatusSchema,
    number_of_guests: u32,
    #[schema(format = "date-time")]
    booking_date: String,
    /// Set when the room flag could not be written after the booking insert.
    needs_reconciliation: bool,
}

/// OpenAPI schema for [`crate::domain::BookedRoom`].
#[derive(ToSchema)]
#[schema(as = BookedRoom)]
#[schema(rename_all = "camelCase")]
pub struct BookedRoomSchema {
    room_number: String,
    room_type: RoomTypeSchema,
    hotel: HotelSchema,
}

/// OpenAPI schema for [`crate::domain::BookingView`]: a booking's own
/// fields plus its room, hotel and guest.
#[derive(ToSchema)]
#[schema(as = BookingView)]
#[schema(rename_all = "camelCase")]
pub struct BookingViewSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    guest_id: String,
    #[schema(format = "uuid")]
    room_id: String,
    #[schema(format = "date")]
    check_in: String,
    #[schema(format = "date")]
    check_out: String,
    #[schema(example = "300.00")]
    total_amount: String,
    status: BookingStatusSchema,
    number_of_guests: u32,
    #[schema(format = "date-time")]
    booking_date: String,
    needs_reconciliation: bool,
    room: BookedRoomSchema,
    /// Absent when the guest's profile no longer exists.
    guest: Option<ProfileSchema>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    #[schema(rename = "guest")]
    Guest,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::Profile`].
#[derive(ToSchema)]
#[schema(as = Profile)]
#[schema(rename_all = "camelCase")]
pub struct ProfileSchema {
    #[schema(format = "uuid")]
    id: String,
    role: RoleSchema,
    full_name: String,
    image: Option<String>,
}

/// OpenAPI schema for [`crate::domain::DashboardSummary`].
#[derive(ToSchema)]
#[schema(as = DashboardSummary)]
pub struct DashboardSummarySchema {
    hotels: u64,
    rooms: u64,
    bookings: u64,
}

/// OpenAPI schema for [`crate::domain::HotelDraft`].
#[derive(ToSchema)]
#[schema(as = HotelDraft)]
#[schema(rename_all = "camelCase")]
pub struct HotelDraftSchema {
    name: String,
    description: Option<String>,
    address: String,
    city: String,
    state: String,
    country: String,
    #[schema(value_type = Option<String>, example = "120.00")]
    price_per_night: Option<String>,
    /// URL returned by the image upload; required on create.
    image: Option<String>,
}

/// OpenAPI schema for [`crate::domain::RoomDraft`].
#[derive(ToSchema)]
#[schema(as = RoomDraft)]
#[schema(rename_all = "camelCase")]
pub struct RoomDraftSchema {
    room_number: String,
    #[schema(example = "Deluxe")]
    room_type: String,
    #[schema(minimum = 1)]
    capacity: i64,
    #[schema(example = "95.00")]
    price_per_night: String,
}

/// One page of hotels.
#[derive(ToSchema)]
#[schema(as = HotelPage)]
#[schema(rename_all = "camelCase")]
pub struct HotelPageSchema {
    items: Vec<HotelSchema>,
    page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u64,
}

/// One page of bookings.
#[derive(ToSchema)]
#[schema(as = BookingPage)]
#[schema(rename_all = "camelCase")]
pub struct BookingPageSchema {
    items: Vec<BookingViewSchema>,
    page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_domain_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn booking_schema_uses_wire_names() {
        assert_eq!(BookingSchema::name(), "Booking");
        let schema_json = schema_to_json::<BookingSchema>();
        assert!(schema_json.contains("needsReconciliation"));
        assert!(schema_json.contains("numberOfGuests"));
    }
}
