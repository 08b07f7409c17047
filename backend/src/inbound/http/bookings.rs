//! Guest booking handlers.
//!
//! ```text
//! POST /api/v1/bookings {"roomId":"…","checkIn":"2024-05-10","checkOut":"2024-05-12","numberOfGuests":2}
//! GET /api/v1/bookings/mine
//! PATCH /api/v1/bookings/{bookingId}/status {"status":"cancelled"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Booking, BookingId, BookingRequest, BookingStatus, BookingView, Error, RoomId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::schemas::{BookingSchema, BookingViewSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_date, parse_id};

/// Request payload for booking a room.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequestBody {
    #[schema(format = "uuid")]
    pub room_id: String,
    /// Calendar date or RFC 3339 timestamp; time of day is dropped.
    #[schema(example = "2024-05-10")]
    pub check_in: String,
    #[schema(example = "2024-05-12")]
    pub check_out: String,
    #[schema(minimum = 1)]
    pub number_of_guests: i64,
}

/// Request payload for a status change.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequestBody {
    #[schema(example = "confirmed")]
    pub status: String,
}

fn parse_guest_count(raw: i64) -> Result<u32, Error> {
    u32::try_from(raw).map_err(|_| {
        Error::invalid_request("numberOfGuests must be a positive integer").with_details(json!({
            "field": "numberOfGuests",
            "value": raw,
            "code": "invalid_guest_count",
        }))
    })
}

fn parse_status(raw: &str) -> Result<BookingStatus, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("status must be pending, confirmed or cancelled").with_details(
            json!({
                "field": "status",
                "value": raw,
                "code": "invalid_status",
            }),
        )
    })
}

/// Book a room for the signed-in account.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequestBody,
    responses(
        (status = 201, description = "Booking admitted as pending", body = BookingSchema),
        (status = 400, description = "Invalid dates or guest count", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown room", body = ErrorSchema),
        (status = 409, description = "Room unavailable", body = ErrorSchema),
        (status = 500, description = "Partial admission", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SessionCookie" = []))
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBookingRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let body = payload.into_inner();
    let request = BookingRequest {
        guest_id: actor.user_id(),
        room_id: parse_id::<RoomId>(&body.room_id, FieldName::new("roomId"))?,
        check_in: parse_date(&body.check_in, FieldName::new("checkIn"))?,
        check_out: parse_date(&body.check_out, FieldName::new("checkOut"))?,
        number_of_guests: parse_guest_count(body.number_of_guests)?,
    };
    let booking = state.bookings.request_booking(request).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// Bookings of the signed-in account, newest first, with their room and
/// hotel.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/mine",
    responses(
        (status = 200, description = "Own bookings", body = [BookingViewSchema]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listMyBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings/mine")]
pub async fn list_my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingView>>> {
    let guest_id = session.require_user_id()?;
    let bookings = state.bookings_query.list_guest_bookings(&guest_id).await?;
    Ok(web::Json(bookings))
}

/// Change a booking's status.
///
/// Guests may confirm or cancel their own pending bookings. Admins may move
/// any pending booking.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{booking_id}/status",
    params(("booking_id" = String, Path, format = "uuid", description = "Booking id")),
    request_body = StatusChangeRequestBody,
    responses(
        (status = 200, description = "Updated booking", body = BookingSchema),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 403, description = "Not the booking's guest", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema),
        (status = 409, description = "Booking is no longer pending", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "changeBookingStatus",
    security(("SessionCookie" = []))
)]
#[patch("/bookings/{booking_id}/status")]
pub async fn change_booking_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusChangeRequestBody>,
) -> ApiResult<web::Json<Booking>> {
    let actor = current_actor(&state, &session).await?;
    let booking_id: BookingId = parse_id(&path, FieldName::new("bookingId"))?;
    let target = parse_status(&payload.status)?;
    let booking = state
        .bookings
        .change_status(&actor, &booking_id, target)
        .await?;
    Ok(web::Json(booking))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
