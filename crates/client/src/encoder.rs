//! Request payload encoding.
//!
//! User operations send JSON (see [`Payload::json`](crate::executor::Payload::json)).
//! Restaurant operations send `multipart/form-data`, flattened from the
//! validated form with bracket-indexed keys:
//!
//! ```text
//! restaurantName, city, country, deliveryPrice, estimatedDeliveryTime,
//! cuisines[0..n], menuItems[0..n][name|price|description], imageFile
//! ```
//!
//! Prices leave the form in major units and are scaled to minor units here,
//! and nowhere else.

use forkful_core::{ImageSource, ValidatedRestaurant};
use reqwest::multipart::{Form, Part};

/// A single multipart field value.
#[derive(Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File part.
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormValue {
    /// The text value, if this is not a file.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File { .. } => None,
        }
    }
}

impl std::fmt::Debug for FormValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::File {
                file_name,
                content_type,
                bytes,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// An ordered list of multipart fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatForm {
    fields: Vec<(String, FormValue)>,
}

impl FlatForm {
    fn text(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields
            .push((key.into(), FormValue::Text(value.to_string())));
    }

    /// Fields in encoding order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    /// Field keys in encoding order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Look up the first text value for `key`.
    #[must_use]
    pub fn text_value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, value)| value.as_text())
    }

    /// Convert into a `reqwest` multipart form, preserving field order.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if a file part has an unparseable MIME type.
    pub fn into_multipart(self) -> Result<Form, reqwest::Error> {
        self.fields
            .into_iter()
            .try_fold(Form::new(), |form, (key, value)| {
                Ok(match value {
                    FormValue::Text(text) => form.text(key, text),
                    FormValue::File {
                        file_name,
                        content_type,
                        bytes,
                    } => {
                        let part = Part::bytes(bytes)
                            .file_name(file_name)
                            .mime_str(&content_type)?;
                        form.part(key, part)
                    }
                })
            })
    }
}

/// Flatten a validated restaurant form into multipart fields.
///
/// Never fails: every rule that could reject the input was enforced by
/// validation, and price scaling is total for validated amounts.
#[must_use]
pub fn encode_restaurant(restaurant: &ValidatedRestaurant) -> FlatForm {
    let mut form = FlatForm::default();

    form.text("restaurantName", restaurant.restaurant_name());
    form.text("city", restaurant.city());
    form.text("country", restaurant.country());
    form.text("deliveryPrice", restaurant.delivery_price().to_minor());
    form.text("estimatedDeliveryTime", restaurant.estimated_delivery_time());

    for (i, cuisine) in restaurant.cuisines().iter().enumerate() {
        form.text(format!("cuisines[{i}]"), cuisine);
    }

    for (i, item) in restaurant.menu_items().iter().enumerate() {
        form.text(format!("menuItems[{i}][name]"), item.name());
        form.text(format!("menuItems[{i}][price]"), item.price().to_minor());
        if let Some(description) = item.description() {
            form.text(format!("menuItems[{i}][description]"), description);
        }
    }

    // An existing image stays on the server; only new uploads are sent.
    if let ImageSource::Upload(upload) = restaurant.image() {
        form.fields.push((
            "imageFile".to_string(),
            FormValue::File {
                file_name: upload.file_name.clone(),
                content_type: upload.content_type.clone(),
                bytes: upload.bytes.clone(),
            },
        ));
    }

    form
}
