//! One module per command group. Handlers print their own results through
//! [`Output`](crate::app::Output) and return [`AppResult`](crate::error::AppResult).

pub mod auth;
pub mod config;
pub mod resources;
pub mod theme;
pub mod users;
