//! Forkful Core - Shared domain types for the restaurant-ordering client.
//!
//! This crate provides the types used across all Forkful components:
//! - `client` - Authenticated access to the restaurant backend
//! - `cli` - Terminal front end driving every backend operation
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Prices read from the backend are integer minor units; the edit
//! forms collect major units and are converted exactly once, when the
//! client encodes a validated form.
//!
//! # Modules
//!
//! - [`types`] - Read models, wire requests, and newtypes for IDs, emails, and prices
//! - [`forms`] - Caller-side validation that runs before any request is attempted

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod types;

pub use forms::*;
pub use types::*;
