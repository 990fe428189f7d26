//! # Nimbus Client Library
//!
//! Core library behind the Nimbus cloud dashboard. It speaks the dashboard's
//! REST contract and owns the two long-lived state machines of a session:
//! authentication and display theme synchronization.
//!
//! ## Modules
//!
//! - [`api`] - HTTP contract, wire types and the reqwest-backed client
//! - [`auth`] - Session lifecycle and durable session storage
//! - [`theme`] - Theme configuration, colour conversion, palettes and synchronization
//! - [`resources`] - Cloud resource records and templates
//! - [`users`] - Admin user management with protected-user guards
//! - [`model`] - Domain records shared across modules
//! - [`common`] - Error types
//! - [`console`] - Composition root wiring the pieces together

pub mod api;
pub mod auth;
pub mod common;
pub mod console;
pub mod model;
pub mod resources;
pub mod theme;
pub mod users;

pub use common::errors::{ApiError, ClientError, ClientResult};
pub use console::Console;
