//! Project description values consumed by the scope filter and the suggester.

use serde::{Deserialize, Serialize};

/// Level id used for a basement.
pub const BASEMENT_LEVEL: &str = "basement";

/// Physical configuration of the building a project targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Number of above-grade storeys.
    #[serde(default = "default_storeys")]
    pub storeys: u32,
    #[serde(default)]
    pub has_basement: bool,
    /// Room types present in the project (e.g., "kitchen", "bathroom").
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Zones present in the project (e.g., "exterior", "garage").
    #[serde(default)]
    pub zones: Vec<String>,
    /// Declared project type, used for template suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}

const fn default_storeys() -> u32 {
    1
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            storeys: default_storeys(),
            has_basement: false,
            rooms: Vec::new(),
            zones: Vec::new(),
            project_type: None,
        }
    }
}

impl ProjectConfig {
    /// Level ids present in the building: `basement` first when present, then
    /// `level_1` through `level_N` for `N` storeys.
    pub fn levels(&self) -> Vec<String> {
        let mut levels = Vec::with_capacity(self.storeys as usize + 1);
        if self.has_basement {
            levels.push(BASEMENT_LEVEL.to_string());
        }
        levels.extend((1..=self.storeys).map(|n| format!("level_{n}")));
        levels
    }

    pub fn has_level(&self, level: &str) -> bool {
        if level == BASEMENT_LEVEL {
            return self.has_basement;
        }
        level
            .strip_prefix("level_")
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|n| n >= 1 && n <= self.storeys)
    }

    pub fn has_room(&self, room_type: &str) -> bool {
        self.rooms.iter().any(|r| r == room_type)
    }

    pub fn has_zone(&self, zone: &str) -> bool {
        self.zones.iter().any(|z| z == zone)
    }

    /// Attributes used by the template suggester, if a type was declared.
    pub fn attributes(&self) -> Option<ProjectAttributes> {
        self.project_type
            .as_ref()
            .map(|t| ProjectAttributes::new(t.clone()))
    }
}

/// Project attributes the template suggester matches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAttributes {
    pub project_type: String,
}

impl ProjectAttributes {
    pub fn new(project_type: impl Into<String>) -> Self {
        Self {
            project_type: project_type.into(),
        }
    }
}
