//! Restaurant search bar.

use super::error::{Collector, ValidationError};

/// A validated city search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    city: String,
    page: u32,
}

impl SearchQuery {
    /// Validate a search for `city`, starting at `page` (1-based).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the city is blank or the page is 0.
    pub fn new(city: &str, page: u32) -> Result<Self, ValidationError> {
        let mut errors = Collector::default();
        let city = errors.require("searchQuery", city, "Search query is required");
        if page == 0 {
            errors.push("page", "Pages start at 1");
        }
        errors.finish(Self { city, page })
    }

    /// City to search in.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}
