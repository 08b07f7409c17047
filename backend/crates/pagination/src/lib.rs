//! Offset pagination primitives for listing endpoints.
//!
//! Listings in the backend are 1-based and page sized by the caller. A
//! [`PageRequest`] is the validated selector handed to storage adapters,
//! which translate it into `OFFSET`/`LIMIT`. A [`Page`] is the response
//! envelope, carrying the exact total row count alongside the items so
//! clients can render page controls without a second round trip.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 3).expect("valid request");
//! assert_eq!(request.offset(), 3);
//! assert_eq!(request.limit(), 3);
//!
//! let page = Page::new(vec!["d", "e", "f"], request, 7);
//! assert_eq!(page.total_pages(), 3);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size any listing accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures raised when building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// The requested size exceeds [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {max}, got {requested}")]
    PageSizeTooLarge {
        /// Size the caller asked for.
        requested: u32,
        /// Upper bound enforced by the crate.
        max: u32,
    },
}

/// Validated 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU32,
    page_size: NonZeroU32,
}

impl PageRequest {
    /// Build a request for `page` (1-based) holding `page_size` items.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero or the size is
    /// above [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        let page = NonZeroU32::new(page).ok_or(PageRequestError::ZeroPage)?;
        let page_size = NonZeroU32::new(page_size).ok_or(PageRequestError::ZeroPageSize)?;
        if page_size.get() > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeTooLarge {
                requested: page_size.get(),
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, page_size })
    }

    /// Build a request from optional query values, applying defaults.
    ///
    /// A missing page selects the first page and a missing size selects
    /// `default_size`.
    ///
    /// # Errors
    /// Propagates the validation performed by [`PageRequest::new`].
    pub fn from_query(
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
    ) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(default_size))
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page.get()
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Number of rows to skip before the page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get().saturating_sub(1)) * u64::from(self.page_size.get())
    }

    /// Number of rows to fetch.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size.get())
    }
}

/// One page of a listing plus the exact total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from fetched items and the total row count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(request.limit());
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_count,
            total_pages,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Exact number of rows across all pages.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages needed to show every row.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Convert every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}
