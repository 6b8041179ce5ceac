//! Domain layer for phasegate
//!
//! Phase and template models, per-project state, validation issues, and the
//! ports the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
