//! Query-string parameters accepted by the promotion endpoints.

use crate::core::pagination::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

/// `?page=&size=`; defaults to the first page of ten.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_size")]
    pub size: i64,
}

/// `?keyword=&page=&size=`; `page`/`size` are ignored by the unpaginated search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Text to look for in name or description
    pub keyword: Option<String>,
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_size")]
    pub size: i64,
}

#[allow(clippy::cast_possible_wrap)]
const fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}
