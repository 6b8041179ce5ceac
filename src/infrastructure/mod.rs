//! Infrastructure layer module
//!
//! Adapters around the domain and services:
//! - Configuration management
//! - Logging infrastructure
//! - Template files on disk

pub mod config;
pub mod logging;
pub mod templates;
