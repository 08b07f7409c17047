//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer (accounts, hotels,
//!   bookings, administration, health)
//! - **Schemas**: mirrors of domain types from
//!   [`crate::inbound::http::schemas`] plus request bodies owned by handlers
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling. The
//! `/ws/changes` socket is not an OpenAPI operation and is documented on
//! [`crate::inbound::ws::ws_changes`].

use crate::inbound::http::admin::ImageUploadResponse;
use crate::inbound::http::bookings::{CreateBookingRequestBody, StatusChangeRequestBody};
use crate::inbound::http::schemas::{
    BookedRoomSchema, BookingPageSchema, BookingSchema, BookingStatusSchema, BookingViewSchema,
    DashboardSummarySchema, ErrorCodeSchema, ErrorSchema, HotelDraftSchema, HotelPageSchema,
    HotelSchema, ProfileSchema, RoleSchema, RoomDraftSchema, RoomSchema, RoomTypeSchema,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Hotel booking API",
        description = "Hotel catalog browsing, booking admission and administration.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::hotels::list_hotels,
        crate::inbound::http::hotels::get_hotel,
        crate::inbound::http::hotels::list_rooms,
        crate::inbound::http::hotels::get_image,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_my_bookings,
        crate::inbound::http::bookings::change_booking_status,
        crate::inbound::http::admin::create_hotel,
        crate::inbound::http::admin::update_hotel,
        crate::inbound::http::admin::delete_hotel,
        crate::inbound::http::admin::add_room,
        crate::inbound::http::admin::upload_image,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::list_bookings,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        HotelSchema,
        HotelPageSchema,
        HotelDraftSchema,
        RoomSchema,
        RoomTypeSchema,
        RoomDraftSchema,
        BookingSchema,
        BookingViewSchema,
        BookedRoomSchema,
        BookingStatusSchema,
        BookingPageSchema,
        ProfileSchema,
        RoleSchema,
        DashboardSummarySchema,
        LoginRequest,
        RegisterRequest,
        CreateBookingRequestBody,
        StatusChangeRequestBody,
        ImageUploadResponse,
    )),
    tags(
        (name = "users", description = "Registration, login, logout and the current profile"),
        (name = "hotels", description = "Public hotel and room catalog"),
        (name = "bookings", description = "Guest bookings and status changes"),
        (name = "admin", description = "Inventory, images and the booking ledger"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
