pub mod dependency_graph;
pub mod phase_catalog;
pub mod progress;
pub mod project_plan;
pub mod scope_filter;
pub mod state_tracker;
pub mod template_registry;
pub mod template_suggester;
pub mod validation_engine;

pub use dependency_graph::DependencyGraph;
pub use progress::ProgressAggregator;
pub use project_plan::{ProjectPlan, ProjectRecord};
pub use scope_filter::ScopeFilter;
pub use state_tracker::StateTracker;
pub use template_registry::InMemoryTemplateRegistry;
pub use template_suggester::TemplateSuggester;
pub use validation_engine::ValidationEngine;
