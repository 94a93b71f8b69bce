//! Query parameters for the public directory listing.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// `?page&limit&q`. Missing or zero values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DirectoryQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Entries per page, at most 100
    pub limit: Option<u64>,
    /// Optional search term
    pub q: Option<String>,
}

impl DirectoryQuery {
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    /// Calculate offset into the ordered listing
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// Search term, if one was given and is not blank
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// `?q` for the search endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
}
