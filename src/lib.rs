//! Phasegate - construction phase dependency validation and sequencing
//!
//! Phasegate decides, for a building project, which construction phases may
//! start, which are blocked, whether a phase may be marked complete, and
//! whether a proposed re-sequencing respects the dependency rules between
//! trades.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the template registry port
//! - **Service Layer** (`services`): phase catalog, scope filter, validation
//!   engine, state tracker and progress aggregation
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   template files
//! - **CLI Layer** (`cli`): command-line interface over a JSON project record
//!
//! # Example
//!
//! ```
//! use phasegate::{InMemoryTemplateRegistry, ProjectConfig, ProjectPlan};
//!
//! let registry = InMemoryTemplateRegistry::with_builtin().unwrap();
//! let config = ProjectConfig {
//!     rooms: vec!["bathroom".to_string()],
//!     ..Default::default()
//! };
//! let plan = ProjectPlan::apply(&registry, "bathroom_remodel", config).unwrap();
//! assert!(plan.ready_phases().iter().any(|p| p.id == "demolition"));
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DependencyConstraint, DependencyKind, Issue, IssueKind, LocationScope,
    PhaseCategory, PhaseDefinition, PhaseProgress, PhaseStatus, PhaseTemplate,
    ProjectAttributes, ProjectConfig, ProjectPhaseState, ValidationReport,
};
pub use domain::ports::TemplateRegistry;
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    InMemoryTemplateRegistry, ProgressAggregator, ProjectPlan, ProjectRecord, ScopeFilter,
    StateTracker, TemplateSuggester, ValidationEngine,
};
