//! WebSocket inbound adapter streaming booking and room changes.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, signed-in session)
//! - subscribe to the change feed before the handshake completes
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, info, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

use state::{OriginAllowList, WsState};

/// Upgrade to the change feed socket at `/ws/changes`.
///
/// Admins receive every event; guests receive room events and events for
/// their own bookings.
#[get("/ws/changes")]
pub async fn ws_changes(
    state: web::Data<WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin_header)?;

    let user_id = session.require_user_id()?;
    let actor = state.profiles.fetch_profile(&user_id).await?.actor();
    let events = state.changes.subscribe();

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    info!(user_id = %user_id, role = %actor.role(), "change feed subscribed");
    actix_web::rt::spawn(session::handle_ws_session(
        actor, events, ws_session, messages,
    ));
    Ok(response)
}

fn validate_origin(allow: &OriginAllowList, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allow.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
