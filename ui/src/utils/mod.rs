//! # Utilities Module
//!
//! Helpers shared by the command handlers.
//!
//! - [`password`] - Hidden password prompts and a zeroizing password container
//! - [`prompt`] - Line input and yes/no confirmation
//! - [`table`] - Plain-text table rendering for list output

pub mod password;
pub mod prompt;
pub mod table;
