//! Per-connection change feed session.
//!
//! Forwards change events the caller may see and keeps the connection alive
//! with heartbeats. The server pings every 5s and considers a connection idle
//! after 10s without client traffic. Tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{Actor, ChangeEvent};
use crate::inbound::ws::messages::ServerMessage;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    actor: Actor,
    events: BoxStream<'static, ChangeEvent>,
    session: Session,
    stream: MessageStream,
) {
    ChangeSession::new(actor).run(events, session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    FeedClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct ChangeSession {
    actor: Actor,
}

impl ChangeSession {
    fn new(actor: Actor) -> Self {
        Self { actor }
    }

    async fn run(
        &self,
        mut events: BoxStream<'static, ChangeEvent>,
        mut session: Session,
        mut stream: MessageStream,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let greeting = ServerMessage::Subscribed {
            role: self.actor.role(),
        };
        let mut result = send_json(&mut session, &greeting)
            .await
            .map_err(SessionError::Network);

        while result.is_ok() {
            result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                event = events.next() => self.forward_event(&mut session, event).await,
            };
        }

        if let Err(error) = result {
            log_shutdown_reason(&error);
            close_session(session, close_action_for(error)).await;
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };
        let message = message.map_err(SessionError::Protocol)?;

        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            // Clients only listen; anything else they send just proves liveness.
            Message::Text(_)
            | Message::Pong(_)
            | Message::Binary(_)
            | Message::Continuation(_)
            | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn forward_event(
        &self,
        session: &mut Session,
        event: Option<ChangeEvent>,
    ) -> Result<(), SessionError> {
        let Some(event) = event else {
            return Err(SessionError::FeedClosed);
        };
        if !event.visible_to(&self.actor) {
            return Ok(());
        }
        send_json(session, &ServerMessage::Change(&event))
            .await
            .map_err(SessionError::Network)
    }
}

async fn send_json(session: &mut Session, payload: &ServerMessage<'_>) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "Failed to serialize change feed frame");
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::FeedClosed => debug!("change feed closed; ending session"),
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_action_for(error: SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::FeedClosed => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("change feed closed".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session(session: Session, action: CloseAction) {
    let CloseAction::Close(reason) = action else {
        return;
    };
    if let Err(error) = session.close(reason).await {
        warn!(error = %error, "Failed to close WebSocket session");
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
