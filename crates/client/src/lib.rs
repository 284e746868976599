//! Forkful Client - Authenticated access to the restaurant backend.
//!
//! Every backend call follows the same sequence:
//!
//! 1. borrow a bearer token from a [`CredentialProvider`]
//! 2. encode the payload (JSON for the user record, flattened
//!    `multipart/form-data` for the restaurant)
//! 3. send it through the [`RequestExecutor`]
//! 4. settle the operation's state and fire exactly one side effect
//!
//! Failures never escape as panics: transport errors and non-2xx statuses
//! collapse into [`ApiError::RequestFailed`], credential errors pass through
//! unchanged, and form errors are reported before any request is made.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`auth`] - Credential providers and the Auth0 login flow
//! - [`executor`] - Authenticated request execution
//! - [`encoder`] - Multipart flattening of the restaurant form
//! - [`hooks`] - Named operations with observable state
//! - [`effects`] - Notifications, reloads and navigation
//! - [`provisioning`] - Create-once backend user after first login

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod effects;
pub mod encoder;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod provisioning;

pub use auth::{ConfiguredCredentials, CredentialError, CredentialProvider, StaticCredentials};
pub use config::{ClientConfig, ConfigError};
pub use effects::{Effects, Notification, NotificationKind, View};
pub use error::ApiError;
pub use executor::RequestExecutor;
pub use hooks::{MyRestaurantApi, MyUserApi, OperationState, RestaurantSearchApi};
pub use provisioning::{Identity, ProvisioningGuard};
