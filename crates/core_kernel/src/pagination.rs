//! Offset pagination for list queries
//!
//! Every list operation in the system takes a [`PageRequest`] and returns a
//! [`Page`]. Requests are clamped on construction so adapters never see an
//! unbounded limit.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Page size used when the caller does not specify one
    pub const DEFAULT_LIMIT: u32 = 20;
    /// Largest page size a caller may request
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page request, rejecting out-of-range limits
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `limit` is zero or above [`Self::MAX_LIMIT`]
    pub fn new(limit: u32, offset: u32) -> Result<Self, CoreError> {
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(CoreError::validation(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { limit, offset })
    }

    /// Builds a request from optional query parameters, applying defaults
    pub fn from_query(limit: Option<u32>, offset: Option<u32>) -> Result<Self, CoreError> {
        Self::new(
            limit.unwrap_or(Self::DEFAULT_LIMIT),
            offset.unwrap_or(0),
        )
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Applies this page to an already-filtered, already-sorted list
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect();
        Page::new(items, total, *self)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
        }
    }

    /// Whether rows exist beyond this page
    pub fn has_more(&self) -> bool {
        (self.offset as u64) + (self.items.len() as u64) < self.total
    }

    /// Converts every item, keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
