//! Change feed session tests against a live server.

use super::*;
use crate::domain::ports::ChangeFeed;
use crate::domain::{
    Booking, BookingId, BookingStatus, HotelId, ProfileService, Room, RoomId, RoomType, UserId,
};
use crate::inbound::http::test_utils::{MockPorts, guest_id, test_session_middleware};
use crate::inbound::http::users::login;
use crate::inbound::ws;
use crate::inbound::ws::state::{OriginAllowList, WsState};
use crate::outbound::change_feed::BroadcastChangeFeed;
use crate::test_support::accounts::FixtureIdentityProvider;
use actix_web::{App, HttpServer, dev::ServerHandle, http::header, web};
use awc::{BoxedSocket, ws::Codec, ws::Frame};
use chrono::{NaiveDate, Utc};
use futures_util::SinkExt;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

struct Harness {
    url: String,
    feed: Arc<BroadcastChangeFeed>,
    _server: ServerHandle,
}

fn start_server() -> Harness {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let feed = Arc::new(BroadcastChangeFeed::default());
    let changes: Arc<dyn ChangeFeed> = feed.clone();
    let server = HttpServer::new(move || {
        let ws_state = WsState::new(
            Arc::new(ProfileService::new(Arc::new(FixtureIdentityProvider))),
            Arc::clone(&changes),
            OriginAllowList::default(),
        );
        App::new()
            .app_data(web::Data::new(MockPorts::default().into_state()))
            .app_data(web::Data::new(ws_state))
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").service(login))
            .service(ws::ws_changes)
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    Harness {
        url: format!("http://{addr}"),
        feed,
        _server: handle,
    }
}

async fn connect(harness: &Harness, email: &str) -> Socket {
    let client = awc::Client::default();
    let response = client
        .post(format!("{}/api/v1/login", harness.url))
        .send_json(&json!({"email": email, "password": "password"}))
        .await
        .expect("login request");
    assert!(response.status().is_success(), "login failed");
    let cookie = response
        .cookies()
        .expect("parse cookies")
        .iter()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .clone()
        .into_owned();

    let (_resp, socket) = client
        .ws(format!("{}/ws/changes", harness.url))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .cookie(cookie)
        .connect()
        .await
        .expect("websocket connect");
    socket
}

/// Next text frame as JSON, answering pings so the session stays alive.
async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = futures_util::StreamExt::next(socket)
            .await
            .expect("response frame")
            .expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json frame"),
            Frame::Ping(payload) => socket
                .send(awc::ws::Message::Pong(payload))
                .await
                .expect("send pong"),
            Frame::Pong(_) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

fn room() -> Room {
    Room {
        id: RoomId::random(),
        hotel_id: HotelId::random(),
        room_number: "12".to_owned(),
        room_type: RoomType::Standard,
        capacity: 2,
        price_per_night: Decimal::new(80, 0),
        is_available: true,
    }
}

fn booking_for(guest_id: UserId) -> Booking {
    Booking {
        id: BookingId::random(),
        guest_id,
        room_id: RoomId::random(),
        check_in: NaiveDate::from_ymd_opt(2024, 5, 10).expect("date"),
        check_out: NaiveDate::from_ymd_opt(2024, 5, 12).expect("date"),
        total_amount: Decimal::new(240, 0),
        status: BookingStatus::Pending,
        number_of_guests: 1,
        booking_date: Utc::now(),
        needs_reconciliation: false,
    }
}

#[rstest]
#[actix_rt::test]
async fn guest_receives_rooms_and_own_bookings_only() {
    let harness = start_server();
    let mut socket = connect(&harness, "guest@example.com").await;
    let greeting = next_json(&mut socket).await;
    assert_eq!(greeting, json!({"type": "subscribed", "role": "guest"}));

    harness
        .feed
        .publish(ChangeEvent::booking_inserted(booking_for(UserId::random())));
    let before = room();
    harness
        .feed
        .publish(ChangeEvent::room_updated(before.clone(), before.with_availability(false)));
    harness
        .feed
        .publish(ChangeEvent::booking_inserted(booking_for(guest_id())));

    let first = next_json(&mut socket).await;
    assert_eq!(first["type"], "change");
    assert_eq!(first["table"], "rooms");
    let second = next_json(&mut socket).await;
    assert_eq!(second["table"], "bookings");
    assert_eq!(second["newRow"]["guestId"], guest_id().to_string());
}

#[rstest]
#[actix_rt::test]
async fn admin_receives_every_booking() {
    let harness = start_server();
    let mut socket = connect(&harness, "admin@example.com").await;
    let greeting = next_json(&mut socket).await;
    assert_eq!(greeting["role"], "admin");

    let booking = booking_for(UserId::random());
    let expected_id = booking.id.to_string();
    harness.feed.publish(ChangeEvent::booking_inserted(booking));

    let frame = next_json(&mut socket).await;
    assert_eq!(frame["operation"], "INSERT");
    assert_eq!(frame["newRow"]["id"], expected_id);
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages() {
    let harness = start_server();
    let mut socket = connect(&harness, "guest@example.com").await;

    let observed_close = tokio::time::timeout(CLIENT_TIMEOUT * 20, async {
        while let Some(frame) = futures_util::StreamExt::next(&mut socket).await {
            match frame.expect("frame") {
                Frame::Close(reason) => return reason,
                Frame::Text(_) | Frame::Ping(_) | Frame::Pong(_) => {}
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        None
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame carries a reason");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
