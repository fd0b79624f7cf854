//! NameHub Common Library
//!
//! Shared code for the NameHub gateway and tools:
//! - Database models and the query layer
//! - Error types and handling
//! - Configuration management
//! - Admin authentication
//! - Keyword classification
//! - Metrics and observability

pub mod auth;
pub mod classify;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use db::{DbPool, Repository};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
