//! Administrator handlers for inventory, images and the booking ledger.
//!
//! ```text
//! POST /api/v1/admin/hotels
//! PUT /api/v1/admin/hotels/{hotelId}
//! DELETE /api/v1/admin/hotels/{hotelId}
//! POST /api/v1/admin/hotels/{hotelId}/rooms
//! POST /api/v1/admin/images?fileName=lobby.png
//! GET /api/v1/admin/dashboard
//! GET /api/v1/admin/bookings?page=1&pageSize=3
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BookingView, DashboardSummary, Hotel, HotelDraft, HotelId, RoomDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_admin;
use crate::inbound::http::schemas::{
    BookingPageSchema, DashboardSummarySchema, ErrorSchema, HotelDraftSchema, HotelSchema,
    RoomDraftSchema, RoomSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_id};

/// Page size of the admin booking table.
pub const DEFAULT_ADMIN_BOOKING_PAGE_SIZE: u32 = 3;

/// Largest accepted image upload in bytes.
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// `?fileName=` query of image uploads.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ImageUploadQuery {
    /// Original file name; sanitised into the stored key.
    pub file_name: String,
}

/// Public URL of a stored image.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponse {
    #[schema(example = "/images/1715000000000-lobby.png")]
    pub url: String,
}

/// Create a hotel.
#[utoipa::path(
    post,
    path = "/api/v1/admin/hotels",
    request_body = HotelDraftSchema,
    responses(
        (status = 201, description = "Hotel created", body = HotelSchema),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createHotel",
    security(("SessionCookie" = []))
)]
#[post("/admin/hotels")]
pub async fn create_hotel(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HotelDraft>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let hotel = state.catalog.create_hotel(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(hotel))
}

/// Edit a hotel; omit `image` to keep the current one.
#[utoipa::path(
    put,
    path = "/api/v1/admin/hotels/{hotel_id}",
    params(("hotel_id" = String, Path, format = "uuid", description = "Hotel id")),
    request_body = HotelDraftSchema,
    responses(
        (status = 200, description = "Hotel updated", body = HotelSchema),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Unknown hotel", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "updateHotel",
    security(("SessionCookie" = []))
)]
#[put("/admin/hotels/{hotel_id}")]
pub async fn update_hotel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<HotelDraft>,
) -> ApiResult<web::Json<Hotel>> {
    require_admin(&state, &session).await?;
    let hotel_id: HotelId = parse_id(&path, FieldName::new("hotelId"))?;
    let hotel = state
        .catalog
        .update_hotel(&hotel_id, payload.into_inner())
        .await?;
    Ok(web::Json(hotel))
}

/// Delete a hotel together with its rooms and bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/hotels/{hotel_id}",
    params(("hotel_id" = String, Path, format = "uuid", description = "Hotel id")),
    responses(
        (status = 204, description = "Hotel deleted"),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Unknown hotel", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteHotel",
    security(("SessionCookie" = []))
)]
#[delete("/admin/hotels/{hotel_id}")]
pub async fn delete_hotel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let hotel_id: HotelId = parse_id(&path, FieldName::new("hotelId"))?;
    state.catalog.delete_hotel(&hotel_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a room to a hotel.
#[utoipa::path(
    post,
    path = "/api/v1/admin/hotels/{hotel_id}/rooms",
    params(("hotel_id" = String, Path, format = "uuid", description = "Hotel id")),
    request_body = RoomDraftSchema,
    responses(
        (status = 201, description = "Room added", body = RoomSchema),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 404, description = "Unknown hotel", body = ErrorSchema),
        (status = 409, description = "Room number taken", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "addRoom",
    security(("SessionCookie" = []))
)]
#[post("/admin/hotels/{hotel_id}/rooms")]
pub async fn add_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RoomDraft>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let hotel_id: HotelId = parse_id(&path, FieldName::new("hotelId"))?;
    let room = state
        .catalog
        .add_room(&hotel_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(room))
}

/// Store a hotel image sent as the raw request body.
#[utoipa::path(
    post,
    path = "/api/v1/admin/images",
    params(ImageUploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "Empty upload", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema),
        (status = 413, description = "Upload too large")
    ),
    tags = ["admin"],
    operation_id = "uploadImage",
    security(("SessionCookie" = []))
)]
#[post("/admin/images")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ImageUploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let url = state
        .catalog
        .upload_image(&query.file_name, body.to_vec())
        .await?;
    Ok(HttpResponse::Created().json(ImageUploadResponse { url }))
}

/// Inventory and ledger totals.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Totals", body = DashboardSummarySchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "dashboardSummary",
    security(("SessionCookie" = []))
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardSummary>> {
    require_admin(&state, &session).await?;
    let summary = state.catalog_query.dashboard_summary().await?;
    Ok(web::Json(summary))
}

/// Every booking, newest first, one page at a time.
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    params(PageQuery),
    responses(
        (status = 200, description = "Bookings", body = BookingPageSchema),
        (status = 400, description = "Invalid page", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listAllBookings",
    security(("SessionCookie" = []))
)]
#[get("/admin/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<BookingView>>> {
    require_admin(&state, &session).await?;
    let page = query
        .into_inner()
        .into_request(DEFAULT_ADMIN_BOOKING_PAGE_SIZE)?;
    let bookings = state.bookings_query.list_all_bookings(page).await?;
    Ok(web::Json(bookings))
}

/// Payload limit applied to the admin scope so image bodies fit.
pub fn upload_payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(MAX_IMAGE_UPLOAD_BYTES)
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
