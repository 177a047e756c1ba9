//! Position/size pagination.
//!
//! A [`Page`] is an `offset` into a collection's natural order and a `limit`
//! on how many records to return. A limit of zero means "everything after the
//! offset".
//!
//! ```rust
//! use tdc_core::Page;
//!
//! let page = Page::new(10, 20);
//! assert_eq!(page.offset, 10);
//! assert_eq!(page.take(), Some(20));
//!
//! // Page-based pagination (1-indexed)
//! let third = Page::page(3, 25);
//! assert_eq!(third.offset, 50);
//!
//! let rest = Page::new(5, 0);
//! assert_eq!(rest.take(), None);
//! let taken: Vec<_> = rest.apply(0..8).collect();
//! assert_eq!(taken, vec![5, 6, 7]);
//! ```

use serde::{Deserialize, Serialize};

/// Offset/limit window over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum number of records to return; `0` is unbounded.
    pub limit: u64,
}

impl Page {
    /// Create a page from an offset and a limit.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Get pagination for the first N records.
    pub fn first(n: u64) -> Self {
        Self::new(0, n)
    }

    /// Get pagination for a page (1-indexed).
    pub fn page(page: u64, page_size: u64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        Self::new(offset, page_size)
    }

    /// Whether the limit is absent.
    pub fn is_unbounded(&self) -> bool {
        self.limit == 0
    }

    /// The limit, or `None` when unbounded.
    pub fn take(&self) -> Option<u64> {
        (!self.is_unbounded()).then_some(self.limit)
    }

    /// Apply the window to an iterator already in natural order.
    pub fn apply<I: Iterator>(&self, iter: I) -> impl Iterator<Item = I::Item> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let limit = self
            .take()
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        iter.skip(offset).take(limit)
    }
}
