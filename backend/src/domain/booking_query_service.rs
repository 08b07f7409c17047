//! Booking listing service.
//!
//! Implements the booking query driving port for guest history screens and
//! the paginated admin ledger. Both return bookings joined with their room,
//! hotel and guest profile.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{BookingLedger, BookingLedgerError, BookingQuery};
use crate::domain::{BookingFilter, BookingView, Error, UserId};

fn map_ledger_error(error: BookingLedgerError) -> Error {
    match error {
        BookingLedgerError::Connection { message } => {
            Error::service_unavailable(format!("booking ledger unavailable: {message}"))
        }
        BookingLedgerError::Query { message } => {
            Error::internal(format!("booking ledger error: {message}"))
        }
    }
}

/// Booking service implementing the query driving port.
#[derive(Clone)]
pub struct BookingQueryService<L> {
    ledger: Arc<L>,
}

impl<L> BookingQueryService<L> {
    /// Create a new query service over the booking ledger.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl<L> BookingQuery for BookingQueryService<L>
where
    L: BookingLedger,
{
    async fn list_guest_bookings(&self, guest_id: &UserId) -> Result<Vec<BookingView>, Error> {
        self.ledger
            .list_bookings(BookingFilter::Guest(*guest_id))
            .await
            .map_err(map_ledger_error)
    }

    async fn list_all_bookings(&self, page: PageRequest) -> Result<Page<BookingView>, Error> {
        self.ledger
            .page_bookings(BookingFilter::All, page)
            .await
            .map_err(map_ledger_error)
    }
}
