//! Outcome of a compare-and-swap style store write.

/// Result of a write guarded by an expected current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    /// The stored value matched and was replaced.
    Applied,
    /// The stored value differed, or the row was missing; nothing changed.
    Conflict,
}

impl ConditionalWrite {
    /// Map a rows-affected count onto the outcome.
    pub const fn from_rows_affected(rows: usize) -> Self {
        if rows == 0 {
            Self::Conflict
        } else {
            Self::Applied
        }
    }

    /// Whether the write took effect.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}
