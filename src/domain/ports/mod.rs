//! Port trait definitions (Hexagonal Architecture)
//!
//! - TemplateRegistry: read access to registered phase templates
//!
//! The validation services only depend on these traits, so templates can come
//! from the built-in catalog, YAML files, or a caller-provided store.

pub mod template_registry;

pub use template_registry::TemplateRegistry;
