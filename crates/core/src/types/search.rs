//! Response of the restaurant search endpoint.

use serde::{Deserialize, Serialize};

use super::restaurant::Restaurant;

/// One page of restaurants matching a city search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSearchResponse {
    /// Matching restaurants on this page.
    pub data: Vec<Restaurant>,
    /// Paging information.
    pub pagination: Pagination,
}

/// Paging information for a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of matches across all pages.
    pub total: u64,
    /// Current page, starting at 1.
    pub page: u32,
    /// Number of pages.
    pub pages: u32,
}
