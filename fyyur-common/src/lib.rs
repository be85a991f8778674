//! # Fyyur Common Library
//!
//! Shared code for the Fyyur venue/artist listing service:
//! - Database models, schema initialization and queries
//! - Show classification (past/upcoming) and listing aggregation
//! - Configuration loading
//! - Timestamp parsing and display formatting
//! - Secret key handling for signed cookies

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod secret;
pub mod schedule;
pub mod time;

pub use error::{Error, Result};
pub use secret::SecretKey;
