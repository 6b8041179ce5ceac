pub mod config;
pub mod issue;
pub mod phase;
pub mod progress;
pub mod project;
pub mod state;
pub mod template;

pub use config::{Config, LoggingConfig, ProjectRecordConfig, TemplatesConfig};
pub use issue::{Issue, IssueKind, UnmetDependency, ValidationReport};
pub use phase::{DependencyConstraint, DependencyKind, LocationScope, PhaseCategory, PhaseDefinition};
pub use progress::PhaseProgress;
pub use project::{ProjectAttributes, ProjectConfig};
pub use state::{OverrideAction, PhaseStatus, ProjectPhaseState, SoftOverride};
pub use template::PhaseTemplate;
