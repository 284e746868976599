//! Restaurant read model as returned by `/api/my/restaurant`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MenuItemId, RestaurantId, UserId};
use super::price::MinorUnits;

/// A restaurant record owned by the authenticated user.
///
/// All prices are integer minor units as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Backend document ID.
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    /// Owning user record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    /// Display name.
    pub restaurant_name: String,
    /// City the restaurant delivers in.
    pub city: String,
    /// Country the restaurant delivers in.
    pub country: String,
    /// Delivery price in minor units.
    pub delivery_price: MinorUnits,
    /// Estimated delivery time in minutes.
    pub estimated_delivery_time: u32,
    /// Cuisine labels, in the order the owner chose them.
    pub cuisines: Vec<String>,
    /// Menu, in display order.
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    /// URL of the uploaded image.
    pub image_url: String,
    /// Last modification time, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A single dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Backend sub-document ID, absent on items that were never saved.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MenuItemId>,
    /// Dish name.
    pub name: String,
    /// Price in minor units.
    pub price: MinorUnits,
    /// Description; older records may not carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
