//! Public catalog handlers.
//!
//! ```text
//! GET /api/v1/hotels?page=1&pageSize=12
//! GET /api/v1/hotels/{hotelId}
//! GET /api/v1/hotels/{hotelId}/rooms
//! ```

use actix_web::http::header;
use actix_web::{get, web};
use pagination::Page;

use crate::domain::{Hotel, HotelId, Room};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, HotelPageSchema, HotelSchema, RoomSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_id};

/// Page size used when the client does not ask for one.
pub const DEFAULT_HOTEL_PAGE_SIZE: u32 = 12;

/// List hotels, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    params(PageQuery),
    responses(
        (status = 200, description = "Hotels", body = HotelPageSchema),
        (status = 400, description = "Invalid page", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "listHotels",
    security([])
)]
#[get("/hotels")]
pub async fn list_hotels(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<Hotel>>> {
    let page = query.into_inner().into_request(DEFAULT_HOTEL_PAGE_SIZE)?;
    let hotels = state.catalog_query.list_hotels(page).await?;
    Ok(web::Json(hotels))
}

/// Fetch one hotel.
#[utoipa::path(
    get,
    path = "/api/v1/hotels/{hotel_id}",
    params(("hotel_id" = String, Path, format = "uuid", description = "Hotel id")),
    responses(
        (status = 200, description = "Hotel", body = HotelSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown hotel", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "getHotel",
    security([])
)]
#[get("/hotels/{hotel_id}")]
pub async fn get_hotel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Hotel>> {
    let hotel_id: HotelId = parse_id(&path, FieldName::new("hotelId"))?;
    let hotel = state.catalog_query.get_hotel(&hotel_id).await?;
    Ok(web::Json(hotel))
}

/// List a hotel's rooms by room number.
#[utoipa::path(
    get,
    path = "/api/v1/hotels/{hotel_id}/rooms",
    params(("hotel_id" = String, Path, format = "uuid", description = "Hotel id")),
    responses(
        (status = 200, description = "Rooms", body = [RoomSchema]),
        (status = 400, description = "Malformed id", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "listRooms",
    security([])
)]
#[get("/hotels/{hotel_id}/rooms")]
pub async fn list_rooms(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Room>>> {
    let hotel_id: HotelId = parse_id(&path, FieldName::new("hotelId"))?;
    let rooms = state.catalog_query.list_rooms(&hotel_id).await?;
    Ok(web::Json(rooms))
}

/// Serve an uploaded hotel image.
///
/// Only raster formats get an image content type; anything else, SVG
/// included, is sent as an opaque download. Every response is sandboxed and
/// marked `nosniff` so uploaded markup never runs on the API origin.
#[utoipa::path(
    get,
    path = "/images/{key}",
    params(("key" = String, Path, description = "Image key returned by the upload")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown image", body = ErrorSchema)
    ),
    tags = ["hotels"],
    operation_id = "getImage",
    security([])
)]
#[get("/images/{key}")]
pub async fn get_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<actix_web::HttpResponse> {
    let key = path.into_inner();
    let bytes = state.catalog_query.fetch_image(&key).await?;
    Ok(actix_web::HttpResponse::Ok()
        .content_type(content_type_for(&key))
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .insert_header((header::CONTENT_SECURITY_POLICY, "sandbox; default-src 'none'"))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(bytes))
}

fn content_type_for(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
