//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] carries the validated `page` and `limit` of a list query.
//! Adapters translate it into `LIMIT`/`OFFSET` clauses via
//! [`PageRequest::offset`], and services wrap the resulting rows in a
//! [`Paginated`] envelope whose [`PageMeta`] is derived from the total row
//! count.
//!
//! # Examples
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::new(2, 10).expect("valid page request");
//! let page = Paginated::new(vec!["k", "l", "m", "n", "o"], request, 15);
//! assert_eq!(page.pagination.total_pages, 2);
//! assert_eq!(request.offset(), 10);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when a list query omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when a list query omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 500;

/// Reasons a page request cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was zero.
    #[error("page must be a positive integer")]
    InvalidPage,
    /// `limit` was zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}", max = MAX_LIMIT)]
    InvalidLimit,
}

/// Validated page coordinates of a list query.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page request, rejecting out-of-range coordinates.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::InvalidLimit);
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows preceding the first row of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of rows.
///
/// `total_pages` is zero exactly when `total` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// One-based page number that was requested.
    pub page: u32,
    /// Page size that was requested.
    pub limit: u32,
    /// Number of rows matching the query across all pages.
    pub total: u64,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
}

impl PageMeta {
    /// Derive the metadata for `request` given the total matching rows.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

/// Envelope returned by paginated list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Rows on the requested page.
    pub data: Vec<T>,
    /// Page coordinates and totals.
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap `data` with metadata computed from `request` and `total`.
    ///
    /// When `total` is zero the envelope always carries an empty `data`
    /// vector.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let data = if total == 0 { Vec::new() } else { data };
        Self {
            data,
            pagination: PageMeta::new(request, total),
        }
    }
}

#[cfg(test)]
mod tests;
