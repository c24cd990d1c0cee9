//! Template bodies and the parsed-template cache
//!
//! A [`TemplateStore`] resolves a template identifier (a '/'-separated
//! relative path such as `backend/Program.cs.jinja`) to its raw body. The
//! [`TemplateCache`] sits in front of a store and keeps parsed templates.

mod builtin;
mod cache;

pub use builtin::EmbeddedTemplateStore;
pub use cache::{CachePolicy, TemplateCache};

use crate::error::{Result, ScaffoldError};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Source of raw template bodies
pub trait TemplateStore: Send + Sync {
    /// Raw body of `template_id`, or [`ScaffoldError::TemplateNotFound`]
    fn template_body(&self, template_id: &str) -> Result<String>;

    /// Every identifier the store can serve, sorted
    fn template_ids(&self) -> Result<Vec<String>>;
}

fn not_found(template_id: &str) -> ScaffoldError {
    ScaffoldError::TemplateNotFound {
        template_id: template_id.to_string(),
    }
}

/// In-memory bodies, for tests and embedding callers
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    bodies: BTreeMap<String, String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template_id: impl Into<String>, body: impl Into<String>) {
        self.bodies.insert(template_id.into(), body.into());
    }

    pub fn with(mut self, template_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(template_id, body);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn template_body(&self, template_id: &str) -> Result<String> {
        self.bodies
            .get(template_id)
            .cloned()
            .ok_or_else(|| not_found(template_id))
    }

    fn template_ids(&self) -> Result<Vec<String>> {
        Ok(self.bodies.keys().cloned().collect())
    }
}

/// Reads `<root>/<template_id>` from disk
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    root: PathBuf,
}

impl DirectoryTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers may not climb out of the root
    fn resolve(&self, template_id: &str) -> Option<PathBuf> {
        let relative = Path::new(template_id);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        contained.then(|| self.root.join(relative))
    }
}

impl TemplateStore for DirectoryTemplateStore {
    fn template_body(&self, template_id: &str) -> Result<String> {
        let path = self.resolve(template_id).ok_or_else(|| not_found(template_id))?;
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(template_id)),
            Err(e) => Err(e.into()),
        }
    }

    fn template_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| {
                std::io::Error::other(format!("walking {}: {}", self.root.display(), e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let id: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                ids.push(id.join("/"));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Serves from `primary`, falling back to `fallback` for unknown identifiers.
///
/// Used to let a local template directory override individual built-ins.
#[derive(Clone)]
pub struct OverlayTemplateStore {
    primary: Arc<dyn TemplateStore>,
    fallback: Arc<dyn TemplateStore>,
}

impl OverlayTemplateStore {
    pub fn new(primary: Arc<dyn TemplateStore>, fallback: Arc<dyn TemplateStore>) -> Self {
        Self { primary, fallback }
    }
}

impl TemplateStore for OverlayTemplateStore {
    fn template_body(&self, template_id: &str) -> Result<String> {
        match self.primary.template_body(template_id) {
            Err(ScaffoldError::TemplateNotFound { .. }) => self.fallback.template_body(template_id),
            other => other,
        }
    }

    fn template_ids(&self) -> Result<Vec<String>> {
        let mut ids = self.primary.template_ids()?;
        ids.extend(self.fallback.template_ids()?);
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
