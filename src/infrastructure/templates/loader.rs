//! Phase template loader from YAML files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::models::{PhaseTemplate, TemplatesConfig};
use crate::services::InMemoryTemplateRegistry;

/// Loader for phase templates stored one per YAML file
pub struct TemplateLoader {
    template_dir: PathBuf,
}

impl TemplateLoader {
    pub fn new<P: AsRef<Path>>(template_dir: P) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a template from a file relative to the template directory
    pub fn load_from_file<P: AsRef<Path>>(&self, filename: P) -> Result<PhaseTemplate> {
        let path = self.template_dir.join(filename);
        debug!("Loading phase template from: {}", path.display());

        let content = std::fs::read_to_string(&path)
            .context(format!("Failed to read template file: {}", path.display()))?;

        Self::load_from_yaml(&content)
            .context(format!("Invalid template file: {}", path.display()))
    }

    /// Parse a template from a YAML string
    pub fn load_from_yaml(yaml: &str) -> Result<PhaseTemplate> {
        let template: PhaseTemplate =
            serde_yaml::from_str(yaml).context("Failed to parse YAML template")?;
        template.validate()?;
        Ok(template)
    }

    /// `*.yaml` / `*.yml` files in the directory, sorted by file name
    pub fn template_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.template_dir).context(format!(
            "Failed to read template directory: {}",
            self.template_dir.display()
        ))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml");
            if path.is_file() && is_yaml {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every template file in the directory, in file-name order
    pub fn load_all(&self) -> Result<Vec<PhaseTemplate>> {
        let files = self.template_files()?;
        let mut templates = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_name()
                .map(PathBuf::from)
                .context("Template path has no file name")?;
            templates.push(self.load_from_file(name)?);
        }

        info!(
            directory = %self.template_dir.display(),
            count = templates.len(),
            "Loaded phase templates"
        );
        Ok(templates)
    }
}

/// Build the template registry described by the configuration.
///
/// Built-in templates come first (when enabled), then the directory's
/// templates in file-name order. Any invalid template aborts the build.
pub fn build_registry(config: &TemplatesConfig) -> Result<InMemoryTemplateRegistry> {
    let mut registry = if config.include_builtin {
        InMemoryTemplateRegistry::with_builtin().context("Built-in templates are invalid")?
    } else {
        InMemoryTemplateRegistry::new()
    };

    if let Some(dir) = &config.directory {
        for template in TemplateLoader::new(dir).load_all()? {
            let id = template.id.clone();
            registry
                .register(template)
                .context(format!("Failed to register template '{id}'"))?;
        }
    }

    Ok(registry)
}
