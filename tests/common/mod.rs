//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

#![allow(dead_code)]

use std::path::PathBuf;

use phasegate::{
    DependencyConstraint, PhaseDefinition, PhaseStatus, ProjectConfig, ProjectPhaseState,
};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A (no deps), B (hard on A), C (soft on B)
pub fn abc_phases() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::new("a", "Alpha"),
        PhaseDefinition::new("b", "Bravo")
            .with_dependency(DependencyConstraint::hard("a", "B sits on A")),
        PhaseDefinition::new("c", "Charlie")
            .with_dependency(DependencyConstraint::soft("b", "C is easier after B")),
    ]
}

/// States in the given order with the given statuses
pub fn states(entries: &[(&str, PhaseStatus)]) -> Vec<ProjectPhaseState> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (id, status))| ProjectPhaseState::pending(*id, i).with_status(*status))
        .collect()
}

/// Two storey house with a basement, kitchen, bathroom, exterior and garage
pub fn full_house() -> ProjectConfig {
    ProjectConfig {
        storeys: 2,
        has_basement: true,
        rooms: vec!["kitchen".to_string(), "bathroom".to_string()],
        zones: vec!["exterior".to_string(), "garage".to_string()],
        project_type: Some("new_build".to_string()),
    }
}

/// Write a file under `dir` and return its path
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}
