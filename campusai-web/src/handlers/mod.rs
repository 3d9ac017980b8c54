//! HTTP request handlers

pub mod auth;
pub mod health;
pub mod query;
pub mod types;

pub use auth::{login, signup, verify};
pub use health::health_check;
pub use query::handle_query;
