//! Change notifications for bookings and rooms.
//!
//! Every booking insert or status change, every room insert or availability
//! change, and every row removed by a hotel deletion produces one
//! [`ChangeEvent`]. Subscribers receive them through the
//! [`ChangeFeed`](crate::domain::ports::ChangeFeed) port.

use serde::{Deserialize, Serialize};

use super::{Actor, Booking, Room};

/// Table an event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTable {
    Bookings,
    Rooms,
}

/// Kind of row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
}

/// Row image carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeRow {
    Booking(Booking),
    Room(Room),
}

/// One row change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub operation: ChangeOperation,
    pub new_row: Option<ChangeRow>,
    pub old_row: Option<ChangeRow>,
}

impl ChangeEvent {
    /// A booking was admitted.
    pub fn booking_inserted(booking: Booking) -> Self {
        Self {
            table: ChangeTable::Bookings,
            operation: ChangeOperation::Insert,
            new_row: Some(ChangeRow::Booking(booking)),
            old_row: None,
        }
    }

    /// A booking changed, typically its status.
    pub fn booking_updated(old: Booking, new: Booking) -> Self {
        Self {
            table: ChangeTable::Bookings,
            operation: ChangeOperation::Update,
            new_row: Some(ChangeRow::Booking(new)),
            old_row: Some(ChangeRow::Booking(old)),
        }
    }

    /// A booking was removed along with its room.
    pub fn booking_deleted(booking: Booking) -> Self {
        Self {
            table: ChangeTable::Bookings,
            operation: ChangeOperation::Delete,
            new_row: None,
            old_row: Some(ChangeRow::Booking(booking)),
        }
    }

    /// A room was added to a hotel.
    pub fn room_inserted(room: Room) -> Self {
        Self {
            table: ChangeTable::Rooms,
            operation: ChangeOperation::Insert,
            new_row: Some(ChangeRow::Room(room)),
            old_row: None,
        }
    }

    /// A room was removed along with its hotel.
    pub fn room_deleted(room: Room) -> Self {
        Self {
            table: ChangeTable::Rooms,
            operation: ChangeOperation::Delete,
            new_row: None,
            old_row: Some(ChangeRow::Room(room)),
        }
    }

    /// A room changed, typically its availability flag.
    pub fn room_updated(old: Room, new: Room) -> Self {
        Self {
            table: ChangeTable::Rooms,
            operation: ChangeOperation::Update,
            new_row: Some(ChangeRow::Room(new)),
            old_row: Some(ChangeRow::Room(old)),
        }
    }

    /// Whether `actor` may observe this event.
    ///
    /// Admins see everything. Guests see room changes and changes to their
    /// own bookings.
    pub fn visible_to(&self, actor: &Actor) -> bool {
        if actor.is_admin() {
            return true;
        }
        match self.table {
            ChangeTable::Rooms => true,
            ChangeTable::Bookings => [&self.new_row, &self.old_row]
                .into_iter()
                .flatten()
                .any(|row| matches!(row, ChangeRow::Booking(b) if b.guest_id == actor.user_id())),
        }
    }
}
