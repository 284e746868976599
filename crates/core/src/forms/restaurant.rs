//! Manage-restaurant form.
//!
//! The draft collects prices in major units. [`RestaurantDraft::validate`]
//! checks every field and yields a [`ValidatedRestaurant`], the only input the
//! multipart encoder accepts.

use serde::Deserialize;

use super::error::{Collector, ValidationError};
use crate::types::{MajorUnits, Restaurant};

/// An image file chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One menu row of the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    /// Dish name.
    #[serde(default)]
    pub name: String,
    /// Price in major units.
    pub price: MajorUnits,
    /// Description.
    ///
    /// `None` marks a row reset from a record that never had one; such rows
    /// are saved without a description. A blank string is rejected.
    #[serde(default = "unfilled_description")]
    pub description: Option<String>,
}

/// A row read from a draft file without a description still has to fill it.
#[allow(clippy::unnecessary_wraps)]
const fn unfilled_description() -> Option<String> {
    Some(String::new())
}

/// The manage-restaurant form as filled in by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    /// Display name.
    #[serde(default)]
    pub restaurant_name: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Country.
    #[serde(default)]
    pub country: String,
    /// Delivery price in major units.
    pub delivery_price: MajorUnits,
    /// Estimated delivery time in minutes.
    pub estimated_delivery_time: u32,
    /// Selected cuisines, in selection order.
    #[serde(default)]
    pub cuisines: Vec<String>,
    /// Menu rows, in display order.
    #[serde(default)]
    pub menu_items: Vec<MenuItemDraft>,
    /// Newly chosen image file.
    #[serde(skip)]
    pub image_file: Option<ImageUpload>,
    /// Image already stored for this restaurant.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Where the restaurant image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A new file to upload.
    Upload(ImageUpload),
    /// Keep the image the backend already has.
    Existing(String),
}

/// A menu row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMenuItem {
    name: String,
    price: MajorUnits,
    description: Option<String>,
}

impl ValidatedMenuItem {
    /// Dish name, trimmed and non-empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price in major units, at least one minor unit.
    #[must_use]
    pub const fn price(&self) -> MajorUnits {
        self.price
    }

    /// Description, trimmed and non-empty; absent on rows carried over
    /// from a record without one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A restaurant form that passed validation.
///
/// Fields are private so a value can only come from
/// [`RestaurantDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRestaurant {
    restaurant_name: String,
    city: String,
    country: String,
    delivery_price: MajorUnits,
    estimated_delivery_time: u32,
    cuisines: Vec<String>,
    menu_items: Vec<ValidatedMenuItem>,
    image: ImageSource,
}

impl ValidatedRestaurant {
    /// Display name.
    #[must_use]
    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    /// City.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Delivery price in major units.
    #[must_use]
    pub const fn delivery_price(&self) -> MajorUnits {
        self.delivery_price
    }

    /// Estimated delivery time in minutes.
    #[must_use]
    pub const fn estimated_delivery_time(&self) -> u32 {
        self.estimated_delivery_time
    }

    /// Non-empty cuisine list, in selection order.
    #[must_use]
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    /// Menu rows, in display order.
    #[must_use]
    pub fn menu_items(&self) -> &[ValidatedMenuItem] {
        &self.menu_items
    }

    /// Image to send or keep.
    #[must_use]
    pub const fn image(&self) -> &ImageSource {
        &self.image
    }
}

impl RestaurantDraft {
    /// Pre-fill the form from a loaded restaurant (form reset).
    ///
    /// Prices are converted back to major units and the stored image is kept
    /// unless a new file is chosen.
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self {
            restaurant_name: restaurant.restaurant_name.clone(),
            city: restaurant.city.clone(),
            country: restaurant.country.clone(),
            delivery_price: restaurant.delivery_price.to_major(),
            estimated_delivery_time: restaurant.estimated_delivery_time,
            cuisines: restaurant.cuisines.clone(),
            menu_items: restaurant
                .menu_items
                .iter()
                .map(|item| MenuItemDraft {
                    name: item.name.clone(),
                    price: item.price.to_major(),
                    description: item.description.clone(),
                })
                .collect(),
            image_file: None,
            image_url: Some(restaurant.image_url.clone()),
        }
    }

    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every rejected field.
    pub fn validate(self) -> Result<ValidatedRestaurant, ValidationError> {
        let mut errors = Collector::default();

        let restaurant_name = errors.require(
            "restaurantName",
            &self.restaurant_name,
            "Please enter a valid restaurant name",
        );
        let city = errors.require("city", &self.city, "Please enter a valid city name");
        let country = errors.require("country", &self.country, "Please enter a valid country");

        let mut cuisines: Vec<String> = Vec::with_capacity(self.cuisines.len());
        for cuisine in &self.cuisines {
            let cuisine = cuisine.trim();
            if cuisine.is_empty() || cuisines.iter().any(|c| c == cuisine) {
                errors.push("cuisines", format!("Invalid or duplicate cuisine '{cuisine}'"));
            } else {
                cuisines.push(cuisine.to_owned());
            }
        }
        if self.cuisines.is_empty() {
            errors.push("cuisines", "Please select at least one item");
        }

        let menu_items = self
            .menu_items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let name = errors.require(
                    &format!("menuItems[{i}].name"),
                    &item.name,
                    "Please enter a valid name",
                );
                if item.price.to_minor().get() < 1 {
                    errors.push(format!("menuItems[{i}].price"), "Please enter a valid price");
                }
                let description = item.description.as_deref().map(|description| {
                    errors.require(
                        &format!("menuItems[{i}].description"),
                        description,
                        "Please enter a valid description",
                    )
                });
                ValidatedMenuItem {
                    name,
                    price: item.price,
                    description,
                }
            })
            .collect();

        let existing = self
            .image_url
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty());
        let image = match (self.image_file, existing) {
            (Some(upload), _) => Some(ImageSource::Upload(upload)),
            (None, Some(url)) => Some(ImageSource::Existing(url)),
            (None, None) => {
                errors.push("imageFile", "Please upload an image");
                None
            }
        };

        let Some(image) = image else {
            return errors.finish_err();
        };

        errors.finish(ValidatedRestaurant {
            restaurant_name,
            city,
            country,
            delivery_price: self.delivery_price,
            estimated_delivery_time: self.estimated_delivery_time,
            cuisines,
            menu_items,
            image,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{MenuItem, MinorUnits, RestaurantId};

    fn major(s: &str) -> MajorUnits {
        MajorUnits::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn draft() -> RestaurantDraft {
        RestaurantDraft {
            restaurant_name: "Luigi's".to_string(),
            city: "Metropolis".to_string(),
            country: "US".to_string(),
            delivery_price: major("4.5"),
            estimated_delivery_time: 30,
            cuisines: vec!["Italian".to_string(), "Pizza".to_string()],
            menu_items: vec![MenuItemDraft {
                name: "Margherita".to_string(),
                price: major("9.99"),
                description: Some("Tomato and basil".to_string()),
            }],
            image_file: Some(ImageUpload {
                file_name: "luigi.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            }),
            image_url: None,
        }
    }

    #[test]
    fn test_valid_draft() {
        let validated = draft().validate().unwrap();
        assert_eq!(validated.restaurant_name(), "Luigi's");
        assert_eq!(validated.cuisines(), ["Italian", "Pizza"]);
        assert_eq!(validated.menu_items()[0].name(), "Margherita");
        assert!(matches!(validated.image(), ImageSource::Upload(_)));
    }

    #[test]
    fn test_missing_image_and_cuisines() {
        let mut form = draft();
        form.image_file = None;
        form.cuisines.clear();

        let err = form.validate().unwrap_err();
        assert!(err.has_field("imageFile"));
        assert!(err.has_field("cuisines"));
    }

    #[test]
    fn test_menu_item_rules() {
        let mut form = draft();
        form.menu_items.push(MenuItemDraft {
            name: "  ".to_string(),
            price: major("0.004"),
            description: Some(String::new()),
        });

        let err = form.validate().unwrap_err();
        assert!(err.has_field("menuItems[1].name"));
        assert!(err.has_field("menuItems[1].price"));
        assert!(err.has_field("menuItems[1].description"));
        assert!(!err.has_field("menuItems[0].name"));
    }

    #[test]
    fn test_duplicate_cuisine_rejected() {
        let mut form = draft();
        form.cuisines.push("Italian".to_string());
        assert!(form.validate().unwrap_err().has_field("cuisines"));
    }

    #[test]
    fn test_existing_image_url_satisfies_image_rule() {
        let mut form = draft();
        form.image_file = None;
        form.image_url = Some("https://cdn.example/luigi.png".to_string());

        let validated = form.validate().unwrap();
        assert_eq!(
            validated.image(),
            &ImageSource::Existing("https://cdn.example/luigi.png".to_string())
        );
    }

    fn stored(description: Option<&str>) -> Restaurant {
        Restaurant {
            id: RestaurantId::new("r1"),
            user: None,
            restaurant_name: "Luigi's".to_string(),
            city: "Metropolis".to_string(),
            country: "US".to_string(),
            delivery_price: MinorUnits::new(450),
            estimated_delivery_time: 30,
            cuisines: vec!["Italian".to_string()],
            menu_items: vec![MenuItem {
                id: None,
                name: "Margherita".to_string(),
                price: MinorUnits::new(999),
                description: description.map(str::to_string),
            }],
            image_url: "https://cdn.example/luigi.png".to_string(),
            last_updated: None,
        }
    }

    #[test]
    fn test_from_restaurant_resets_in_major_units() {
        let restaurant = stored(Some("Tomato, basil"));
        let form = RestaurantDraft::from_restaurant(&restaurant);
        assert_eq!(form.delivery_price, major("4.5"));
        assert_eq!(form.menu_items[0].price, major("9.99"));
        assert_eq!(form.menu_items[0].description.as_deref(), Some("Tomato, basil"));
        assert_eq!(form.image_url.as_deref(), Some("https://cdn.example/luigi.png"));
    }

    #[test]
    fn test_reset_without_description_saves_unchanged() {
        let form = RestaurantDraft::from_restaurant(&stored(None));
        assert_eq!(form.menu_items[0].description, None);

        let validated = form.validate().unwrap();
        assert_eq!(validated.menu_items()[0].name(), "Margherita");
        assert_eq!(validated.menu_items()[0].description(), None);
    }

    #[test]
    fn test_cleared_description_is_rejected() {
        let mut form = RestaurantDraft::from_restaurant(&stored(None));
        form.menu_items[0].description = Some("  ".to_string());
        assert!(form.validate().unwrap_err().has_field("menuItems[0].description"));
    }

    #[test]
    fn test_draft_file_row_must_fill_description() {
        let row: MenuItemDraft =
            serde_json::from_str(r#"{"name": "Calzone", "price": 12}"#).unwrap();
        assert_eq!(row.description.as_deref(), Some(""));
    }

    #[test]
    fn test_zero_delivery_time_is_accepted() {
        let mut form = draft();
        form.estimated_delivery_time = 0;
        assert_eq!(form.validate().unwrap().estimated_delivery_time(), 0);
    }
}
