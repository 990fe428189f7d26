//! # Nimbus Terminal Library
//!
//! Command line front end for the Nimbus cloud dashboard, built on the
//! `nimbus-client` library.
//!
//! ## Features
//!
//! - Sign in, sign up and profile editing with a persisted session
//! - Resource management and template import
//! - Admin user management that refuses to touch protected accounts
//! - Light/dark mode and colour palettes synchronized with the backend
//! - Text or JSON output
//!
//! ## Modules
//!
//! - [`app`] - Command definitions, dispatch and rendering
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types shown to the user
//! - [`logger`] - Logging configuration
//! - [`utils`] - Password prompts, confirmations and tables
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod utils;

// Re-export commonly used types for easier access in tests
pub use app::{App, Cli, Command, Output};
pub use error::{AppError, AppResult};
