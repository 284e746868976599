//! Core types for Forkful.
//!
//! This module provides the read models returned by the backend, the JSON
//! request bodies sent to it, and type-safe wrappers for common concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod restaurant;
pub mod search;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{MajorUnits, MinorUnits, PriceError};
pub use restaurant::{MenuItem, Restaurant};
pub use search::{Pagination, RestaurantSearchResponse};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
