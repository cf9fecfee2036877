//! Offset pagination shared by every list endpoint.
//!
//! A listing is two independent reads against the store: the page slice
//! (`ORDER BY id DESC LIMIT size OFFSET start`) and the total count for the
//! same filter. [`Page::new`] is the only place those two results are
//! combined into the response envelope.
//!
//! The two reads do not share a snapshot. Under concurrent writes `total` can
//! lag the slice by the rows written in between; callers treat that as a
//! bounded staleness window, not an error.

use serde::Serialize;

use crate::error::CoreError;

/// Page length used when the client does not send `size`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on `size`, so a single request cannot scan a whole table.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated `(start, size)` pair.
///
/// `start` is a zero-based row offset, `size` the page length. Construct via
/// [`PageRequest::new`] or [`PageRequest::from_params`]; both reject values
/// outside `start >= 0` and `0 < size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    start: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(start: i64, size: i64) -> Result<Self, CoreError> {
        if start < 0 {
            return Err(CoreError::Validation(format!(
                "start must be non-negative, got {start}"
            )));
        }
        if size <= 0 {
            return Err(CoreError::Validation(format!(
                "size must be positive, got {size}"
            )));
        }
        if size > MAX_PAGE_SIZE {
            return Err(CoreError::Validation(format!(
                "size must be at most {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        Ok(Self { start, size })
    }

    /// Apply defaults (`start = 0`, `size = DEFAULT_PAGE_SIZE`) to optional
    /// query parameters, then validate.
    pub fn from_params(start: Option<i64>, size: Option<i64>) -> Result<Self, CoreError> {
        Self::new(start.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Request covering up to [`MAX_PAGE_SIZE`] rows from the beginning.
    pub fn first_max() -> Self {
        Self {
            start: 0,
            size: MAX_PAGE_SIZE,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        self.start
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Zero-based page number, `floor(start / size)`.
    pub fn page_number(&self) -> i64 {
        self.start / self.size
    }
}

/// Paged response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub start: i64,
    pub size: i64,
    pub page: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Compose an envelope from a page slice and an independently counted total.
    ///
    /// `total` is taken as given and never recomputed from `items`.
    pub fn new(request: &PageRequest, total: i64, items: Vec<T>) -> Self {
        Self {
            items,
            total,
            start: request.start,
            size: request.size,
            page: request.page_number(),
            has_next: request.start.saturating_add(request.size) < total,
            has_previous: request.start > 0,
        }
    }

    /// Convert the items while keeping every piece of page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            start: self.start,
            size: self.size,
            page: self.page,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    /// Like [`Page::map`], dropping items for which `f` returns `None`.
    ///
    /// `total` still counts the dropped rows; it describes the store, not the
    /// converted slice.
    pub fn filter_map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> Option<U>,
    {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            total: self.total,
            start: self.start,
            size: self.size,
            page: self.page,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
