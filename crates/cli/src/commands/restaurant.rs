//! Restaurant commands.
//!
//! Drafts are JSON files in the shape of the manage-restaurant form, with
//! prices in major units:
//!
//! ```json
//! {
//!   "restaurantName": "Luigi's",
//!   "city": "Metropolis",
//!   "country": "US",
//!   "deliveryPrice": 4.5,
//!   "estimatedDeliveryTime": 30,
//!   "cuisines": ["Italian", "Pizza"],
//!   "menuItems": [{ "name": "Margherita", "price": 9.99, "description": "Tomato and basil" }]
//! }
//! ```

use std::path::Path;

use forkful_core::{ImageUpload, RestaurantDraft};

use super::CliError;
use crate::render;
use crate::session::Session;

/// Print the signed-in user's restaurant.
///
/// # Errors
///
/// Returns `CliError::Api` if the restaurant cannot be loaded.
pub async fn show(session: &Session) -> Result<(), CliError> {
    let restaurant = session.restaurants.get_my_restaurant().await?;
    render::print(session.format, &restaurant, render::restaurant);
    Ok(())
}

/// Create the restaurant from a draft file and an image.
///
/// # Errors
///
/// Returns `CliError` if a file cannot be read or the operation fails.
pub async fn create(session: &Session, draft: &Path, image: &Path) -> Result<(), CliError> {
    let mut form = read_draft(draft)?;
    form.image_file = Some(read_image(image)?);

    let created = session.restaurants.create_my_restaurant(form).await?;
    render::print(session.format, &created, render::restaurant);
    Ok(())
}

/// Update the restaurant.
///
/// Without a draft file the form starts from the stored restaurant, so
/// `--image` alone replaces just the image.
///
/// # Errors
///
/// Returns `CliError` if a file cannot be read or the operation fails.
pub async fn update(
    session: &Session,
    draft: Option<&Path>,
    image: Option<&Path>,
) -> Result<(), CliError> {
    let mut form = match draft {
        Some(path) => read_draft(path)?,
        None => RestaurantDraft::from_restaurant(&session.restaurants.get_my_restaurant().await?),
    };
    if let Some(path) = image {
        form.image_file = Some(read_image(path)?);
    } else if form.image_url.is_none() {
        // Keep the stored image.
        form.image_url = Some(session.restaurants.get_my_restaurant().await?.image_url);
    }

    let updated = session.restaurants.update_my_restaurant(form).await?;
    if session.effects.take_reload() {
        return show(session).await;
    }
    render::print(session.format, &updated, render::restaurant);
    Ok(())
}

fn read_draft(path: &Path) -> Result<RestaurantDraft, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Draft {
        path: path.to_path_buf(),
        source,
    })
}

fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(ImageUpload {
        content_type: content_type(path).to_string(),
        file_name,
        bytes,
    })
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type(Path::new("luigi.PNG")), "image/png");
        assert_eq!(content_type(Path::new("a/b.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("menu")), "application/octet-stream");
    }

    #[test]
    fn test_draft_file_shape() {
        let draft: RestaurantDraft = serde_json::from_str(
            r#"{
                "restaurantName": "Luigi's",
                "city": "Metropolis",
                "country": "US",
                "deliveryPrice": 4.5,
                "estimatedDeliveryTime": 30,
                "cuisines": ["Italian"],
                "menuItems": [{"name": "Margherita", "price": 9.99, "description": "Tomato"}]
            }"#,
        )
        .expect("draft parses");

        assert_eq!(draft.delivery_price.to_minor().get(), 450);
        assert_eq!(draft.menu_items.len(), 1);
        assert!(draft.image_file.is_none());
    }
}
