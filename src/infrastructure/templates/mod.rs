//! Template file loading

pub mod loader;

pub use loader::{TemplateLoader, build_registry};
