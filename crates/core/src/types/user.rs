//! User read model and the JSON bodies of `/api/my/user`.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{SubjectId, UserId};

/// The authenticated user's backend record.
///
/// `auth0_id` and `email` never change once the record exists; only the
/// profile fields are editable through [`UpdateUserRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Identity provider subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth0_id: Option<SubjectId>,
    /// Email address reported at sign-up.
    pub email: Email,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// First address line.
    #[serde(default)]
    pub address_line1: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Body of `POST /api/my/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Identity provider subject.
    pub auth0_id: SubjectId,
    /// Email address from the identity provider.
    pub email: Email,
}

/// Body of `PUT /api/my/user`.
///
/// There is deliberately no email field: the identity of a user record is
/// fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
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
