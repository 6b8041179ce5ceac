//! Phase domain model.
//!
//! A phase is a discrete unit of construction work ("Foundation Pour",
//! "Rough Electrical"). Phases declare which other phases must come first
//! and which part of the building they apply to.

use serde::{Deserialize, Serialize};

/// Grouping category for a phase. Never used to infer dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCategory {
    Structural,
    Envelope,
    RoughIn,
    Finish,
    #[default]
    Other,
}

impl PhaseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Envelope => "envelope",
            Self::RoughIn => "rough_in",
            Self::Finish => "finish",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PhaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a dependency between two phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Structurally or code mandatory. Can never be violated.
    Hard,
    /// Best practice. Can be violated with an explicit override.
    Soft,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prerequisite declared by a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConstraint {
    /// Id of the phase that must come first.
    pub requires_phase_id: String,
    pub kind: DependencyKind,
    /// Human-readable justification, surfaced in violation messages.
    #[serde(default)]
    pub reason: String,
}

impl DependencyConstraint {
    pub fn hard(requires_phase_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            requires_phase_id: requires_phase_id.into(),
            kind: DependencyKind::Hard,
            reason: reason.into(),
        }
    }

    pub fn soft(requires_phase_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            requires_phase_id: requires_phase_id.into(),
            kind: DependencyKind::Soft,
            reason: reason.into(),
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self.kind, DependencyKind::Hard)
    }
}

/// The part of a building a phase applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationScope {
    /// Applies to every project.
    #[default]
    All,
    /// Applies when at least one of the listed levels exists.
    Floors { floors: Vec<String> },
    /// Applies when at least one of the listed room types exists.
    Rooms {
        #[serde(rename = "roomTypes", alias = "room_types")]
        room_types: Vec<String>,
    },
    /// Applies when at least one of the listed zones is present.
    Zones { zones: Vec<String> },
}

/// Static definition of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    /// Stable identifier, shared across templates.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub category: PhaseCategory,
    #[serde(default)]
    pub trade_codes: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyConstraint>,
    #[serde(default)]
    pub location_scope: LocationScope,
}

impl PhaseDefinition {
    /// Create a phase that applies everywhere and has no dependencies.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            short_name: name.clone(),
            name,
            category: PhaseCategory::default(),
            trade_codes: Vec::new(),
            dependencies: Vec::new(),
            location_scope: LocationScope::All,
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_category(mut self, category: PhaseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_trades(mut self, trades: &[&str]) -> Self {
        self.trade_codes = trades.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_dependency(mut self, dependency: DependencyConstraint) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_scope(mut self, scope: LocationScope) -> Self {
        self.location_scope = scope;
        self
    }

    pub fn hard_dependencies(&self) -> impl Iterator<Item = &DependencyConstraint> {
        self.dependencies.iter().filter(|d| d.is_hard())
    }

    pub fn soft_dependencies(&self) -> impl Iterator<Item = &DependencyConstraint> {
        self.dependencies.iter().filter(|d| !d.is_hard())
    }

    /// Whether this phase declares any dependency on `phase_id`.
    pub fn depends_on(&self, phase_id: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.requires_phase_id == phase_id)
    }
}
