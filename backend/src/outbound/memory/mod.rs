//! In-memory adapters for running without PostgreSQL.
//!
//! [`InMemoryStore`] implements the catalog store, the booking ledger, the
//! account store and the identity provider over one shared state, so
//! deleting a hotel drops its rooms and their bookings just as the database
//! cascade does, and booking listings can join guest profiles. Every operation runs
//! under a single mutex; the conditional availability write is therefore
//! atomic with respect to other callers.

mod accounts;
mod catalog;
mod ledger;

use std::sync::{Arc, Mutex, MutexGuard};

use mockable::{Clock, DefaultClock};

use crate::domain::{Booking, Hotel, PasswordDigest, Profile, Room};

#[derive(Debug)]
struct Account {
    profile: Profile,
    email: String,
    password: PasswordDigest,
}

#[derive(Debug, Default)]
struct State {
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    accounts: Vec<Account>,
}

/// Shared in-memory catalog, ledger and account directory.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping hotels with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock,
        }
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

/// Newest first, keeping later insertions ahead on equal keys.
fn newest_first<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone,
{
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

fn page_of<T: Clone>(items: Vec<T>, page: pagination::PageRequest) -> pagination::Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let slice = items.into_iter().skip(skip).take(take).collect();
    pagination::Page::new(slice, page, total)
}

#[cfg(test)]
mod tests;
