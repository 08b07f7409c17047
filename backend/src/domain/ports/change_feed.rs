//! Port for publishing and observing row change events.
//!
//! Delivery is best effort. Publishing never blocks on slow subscribers;
//! a subscriber that falls behind loses events instead.

use futures_util::stream::{self, BoxStream};

use crate::domain::ChangeEvent;

/// Fan-out of booking and room change events.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeFeed: Send + Sync {
    /// Hand an event to every current subscriber.
    fn publish(&self, event: ChangeEvent);

    /// Lazily yield events published after this call.
    fn subscribe(&self) -> BoxStream<'static, ChangeEvent>;
}

/// Feed that drops every event; used where nobody listens.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardingChangeFeed;

impl ChangeFeed for DiscardingChangeFeed {
    fn publish(&self, _event: ChangeEvent) {}

    fn subscribe(&self) -> BoxStream<'static, ChangeEvent> {
        Box::pin(stream::empty())
    }
}
