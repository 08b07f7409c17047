//! Tokio broadcast implementation of the change feed.
//!
//! Each subscriber owns a bounded receiver. Publishing never waits: when a
//! receiver falls more than `capacity` events behind, the oldest events are
//! dropped for that receiver only and a warning is logged.

use futures_util::stream::{self, BoxStream};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::ChangeEvent;
use crate::domain::ports::ChangeFeed;

/// Default number of events buffered per subscriber.
pub const DEFAULT_CHANGE_FEED_CAPACITY: usize = 256;

/// Broadcast fan-out of change events.
#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    /// Create a feed buffering `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_FEED_CAPACITY)
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        if self.sender.send(event).is_err() {
            debug!("change event dropped: no subscribers");
        }
    }

    fn subscribe(&self) -> BoxStream<'static, ChangeEvent> {
        let receiver = self.sender.subscribe();
        Box::pin(stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((event, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "change feed subscriber lagged; events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }))
    }
}
