//! Offset/limit pagination types shared by the listing and search queries.

use serde::Serialize;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size used when the caller does not give one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A validated page request: zero-based `page`, `size` in `1..=MAX_PAGE_SIZE`.
///
/// Build one through [`crate::core::validation::validate_page_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub(crate) page: u64,
    pub(crate) size: u64,
}

impl PageRequest {
    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// One page of results plus the totals needed to render a pager.
///
/// A page past the end is an empty `content` with the real totals, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Zero-based index of this page
    pub page: u64,
    /// Requested page size
    pub size: u64,
    /// Count of matching items across all pages
    pub total_elements: u64,
    /// Number of pages at this size
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assembles a page from a fetched slice and the total row count.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size.max(1)),
        }
    }
}
