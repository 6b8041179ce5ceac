//! CLI command implementations.

pub mod project;
pub mod suggest;
pub mod template;
