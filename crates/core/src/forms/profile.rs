//! User profile form.

use serde::Deserialize;

use super::error::{Collector, ValidationError};
use crate::types::{UpdateUserRequest, User};

/// The user-profile form as filled in by the user.
///
/// The email is displayed read-only next to the form and is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDraft {
    /// Display name.
    pub name: String,
    /// First address line.
    pub address_line1: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub zip_code: String,
}

impl ProfileDraft {
    /// Pre-fill the form from the current user (form reset).
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone().unwrap_or_default(),
            address_line1: user.address_line1.clone().unwrap_or_default(),
            city: user.city.clone().unwrap_or_default(),
            state: user.state.clone().unwrap_or_default(),
            country: user.country.clone().unwrap_or_default(),
            zip_code: user.zip_code.clone().unwrap_or_default(),
        }
    }

    /// Validate the form into the `PUT /api/my/user` body.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every empty field.
    pub fn validate(&self) -> Result<UpdateUserRequest, ValidationError> {
        let mut errors = Collector::default();

        let request = UpdateUserRequest {
            name: errors.require("name", &self.name, "Name is required"),
            address_line1: errors.require(
                "addressLine1",
                &self.address_line1,
                "Address Line 1 is required",
            ),
            city: errors.require("city", &self.city, "City is required"),
            state: errors.require("state", &self.state, "State is required"),
            country: errors.require("country", &self.country, "Country is required"),
            zip_code: errors.require("zipCode", &self.zip_code, "Zip Code is required"),
        };

        errors.finish(request)
    }
}
