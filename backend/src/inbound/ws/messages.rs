//! Wire-level message definitions for the change feed socket.
//!
//! Every frame is one JSON object tagged by `type`:
//!
//! ```text
//! {"type":"subscribed","role":"guest"}
//! {"type":"change","table":"rooms","operation":"UPDATE","newRow":{…},"oldRow":{…}}
//! ```

use serde::Serialize;

use crate::domain::{ChangeEvent, Role};

/// Outbound frame sent to a connected client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage<'a> {
    /// Sent once the subscription is live; events published afterwards are
    /// delivered.
    Subscribed { role: Role },
    /// A booking or room change visible to the caller.
    Change(&'a ChangeEvent),
}
