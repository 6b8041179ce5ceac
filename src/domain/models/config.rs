use serde::{Deserialize, Serialize};

/// Main configuration structure for phasegate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Template sources
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Project record settings
    #[serde(default)]
    pub project: ProjectRecordConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files. Logs only go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Where templates are loaded from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplatesConfig {
    /// Directory of custom `*.yaml` templates, registered after the built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Whether the built-in templates are registered
    #[serde(default = "default_true")]
    pub include_builtin: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            include_builtin: default_true(),
        }
    }
}

/// Project record settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectRecordConfig {
    /// Path of the project record file used when `--file` is not given
    #[serde(default = "default_record_path")]
    pub record_path: String,
}

fn default_record_path() -> String {
    ".phasegate/project.json".to_string()
}

impl Default for ProjectRecordConfig {
    fn default() -> Self {
        Self {
            record_path: default_record_path(),
        }
    }
}
