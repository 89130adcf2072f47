//! # Metrics Common Library
//!
//! Shared code for the metrics sync service including:
//! - Database initialization and the persisted metric row model
//! - Configuration loading and resolution
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
