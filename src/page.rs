//! Display pagination. Slicing a list never affects how it was aggregated.

use crate::Result;
use anyhow::ensure;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A 1-based page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    page: usize,
    page_size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// A page number of 0 is treated as 1.
    ///
    /// # Errors
    /// - When `page_size` is 0.
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        ensure!(page_size > 0, "The page size must be at least 1");
        Ok(Self {
            page: page.max(1),
            page_size,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The number of pages needed to show `len` items, at least 1.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// The items on this page. Pages past the end are clamped to the last page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.page.min(self.page_count(items.len()));
        let start = (page - 1).saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}
