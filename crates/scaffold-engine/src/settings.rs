//! Engine settings: template source, cache policy and debounce windows
//!
//! Read from an optional YAML file. `SCAFFOLD_TEMPLATE_DIR` overrides the
//! template directory from the file.

use crate::composer::PlanComposer;
use crate::preview::PreviewService;
use crate::selection::DebounceSettings;
use crate::templates::{
    CachePolicy, DirectoryTemplateStore, EmbeddedTemplateStore, OverlayTemplateStore,
    TemplateCache, TemplateStore,
};
use crate::ui_kit::UiKitRegistry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const TEMPLATE_DIR_ENV: &str = "SCAFFOLD_TEMPLATE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: u64,
    pub time_to_idle_secs: u64,
    pub time_to_live_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let policy = CachePolicy::default();
        Self {
            max_capacity: policy.max_capacity,
            time_to_idle_secs: policy.time_to_idle.as_secs(),
            time_to_live_secs: policy.time_to_live.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceWindows {
    pub tree_ms: u64,
    pub preview_ms: u64,
}

impl Default for DebounceWindows {
    fn default() -> Self {
        let debounce = DebounceSettings::default();
        Self {
            tree_ms: debounce.tree.as_millis() as u64,
            preview_ms: debounce.preview.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Local templates overriding the built-in ones
    pub template_dir: Option<PathBuf>,
    pub cache: CacheSettings,
    pub debounce: DebounceWindows,
}

impl EngineSettings {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse engine settings")
    }

    /// Load `path` if given (defaults otherwise), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))?;
                Self::from_yaml_str(&content)
                    .with_context(|| format!("Invalid settings in {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(TEMPLATE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.template_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_capacity: self.cache.max_capacity,
            time_to_idle: Duration::from_secs(self.cache.time_to_idle_secs),
            time_to_live: Duration::from_secs(self.cache.time_to_live_secs),
        }
    }

    pub fn debounce(&self) -> DebounceSettings {
        DebounceSettings {
            tree: Duration::from_millis(self.debounce.tree_ms),
            preview: Duration::from_millis(self.debounce.preview_ms),
        }
    }

    /// Built-in templates, overlaid by `template_dir` when set
    pub fn template_store(&self) -> Result<Arc<dyn TemplateStore>> {
        let builtin: Arc<dyn TemplateStore> = Arc::new(EmbeddedTemplateStore);
        let Some(dir) = &self.template_dir else {
            return Ok(builtin);
        };
        if !dir.is_dir() {
            anyhow::bail!("Template directory {} does not exist", dir.display());
        }
        let local = Arc::new(DirectoryTemplateStore::new(dir.clone()));
        Ok(Arc::new(OverlayTemplateStore::new(local, builtin)))
    }

    /// Preview service with the default modules and UI kits
    pub fn preview_service(&self) -> Result<PreviewService> {
        let templates = TemplateCache::new(self.template_store()?, self.cache_policy());
        Ok(PreviewService::new(
            PlanComposer::with_default_modules(UiKitRegistry::with_defaults()),
            Arc::new(templates),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.cache_policy(), CachePolicy::default());
        assert_eq!(settings.debounce(), DebounceSettings::default());
        assert!(settings.template_dir.is_none());
    }

    #[test]
    fn test_partial_yaml() {
        let settings = EngineSettings::from_yaml_str("debounce:\n  tree_ms: 500\ncache:\n  max_capacity: 16\n").unwrap();
        assert_eq!(settings.debounce().tree, Duration::from_millis(500));
        assert_eq!(settings.debounce().preview, Duration::from_millis(200));
        assert_eq!(settings.cache_policy().max_capacity, 16);
        assert_eq!(settings.cache.time_to_idle_secs, 1800);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "cache:\n  time_to_live_secs: 60\n").unwrap();

        let settings = EngineSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.cache_policy().time_to_live, Duration::from_secs(60));
        assert!(EngineSettings::load(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_missing_template_dir_rejected() {
        let settings = EngineSettings {
            template_dir: Some(PathBuf::from("/definitely/not/here")),
            ..Default::default()
        };
        assert!(settings.template_store().is_err());
    }

    #[test]
    fn test_local_template_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md.jinja"), "custom {{ project_name }}\n").unwrap();
        let settings = EngineSettings {
            template_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let store = settings.template_store().unwrap();
        assert_eq!(store.template_body("README.md.jinja").unwrap(), "custom {{ project_name }}\n");
        assert!(store.template_body("backend/Program.cs.jinja").is_ok());
    }
}
