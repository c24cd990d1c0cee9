//! Preview API: file content and tree for a configuration
//!
//! Every call recomposes the plan from scratch; only parsed templates are
//! cached between calls.

mod language;

pub use language::language_for_path;

use crate::composer::PlanComposer;
use crate::config::Configuration;
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use crate::render::{render_plan, RenderedOutput};
use crate::templates::TemplateCache;
use crate::tree::{build_tree, TreeNode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Content of one planned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewedFile {
    /// Canonical output path as planned (original casing)
    pub output_path: String,
    pub content: String,
    pub language: String,
    pub is_template: bool,
}

/// Outcome of proposing a user dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyProposal {
    /// The configuration now includes the package
    Accepted(Configuration),
    Rejected { warning: String },
}

#[derive(Clone)]
pub struct PreviewService {
    composer: PlanComposer,
    templates: Arc<TemplateCache>,
}

impl PreviewService {
    pub fn new(composer: PlanComposer, templates: Arc<TemplateCache>) -> Self {
        Self {
            composer,
            templates,
        }
    }

    pub fn templates(&self) -> &Arc<TemplateCache> {
        &self.templates
    }

    pub fn compose(&self, config: &Configuration) -> Result<Plan> {
        self.composer.compose(config)
    }

    /// Full output for `config`
    pub fn render(&self, config: &Configuration) -> Result<RenderedOutput> {
        let plan = self.compose(config)?;
        render_plan(&plan, &self.templates)
    }

    /// Content of the planned file matching `path` case-insensitively.
    ///
    /// `Ok(None)` when no planned file matches. The whole output is rendered
    /// first, so a broken template anywhere fails the preview.
    pub fn preview_file(&self, config: &Configuration, path: &str) -> Result<Option<PreviewedFile>> {
        let plan = self.compose(config)?;
        let mut output = render_plan(&plan, &self.templates)?;

        let Some(descriptor) = plan.find_file(path) else {
            debug!(path, "Preview path not planned");
            return Ok(None);
        };
        let content = output.remove(&descriptor.output_path).unwrap_or_default();
        Ok(Some(PreviewedFile {
            output_path: descriptor.output_path.clone(),
            content,
            language: language_for_path(&descriptor.output_path).to_string(),
            is_template: descriptor.is_template(),
        }))
    }

    pub fn preview_tree(&self, config: &Configuration) -> Result<Vec<TreeNode>> {
        let plan = self.compose(config)?;
        Ok(build_tree(plan.output_paths()))
    }

    /// Whether a module contributes `name` for `config` (case-insensitive)
    pub fn is_system_dependency(
        &self,
        config: &Configuration,
        ecosystem: Ecosystem,
        name: &str,
    ) -> Result<bool> {
        let plan = self.compose(config)?;
        Ok(plan.dependencies(ecosystem).is_system(name))
    }

    /// Add a user dependency to a copy of `config` unless its name is already
    /// provided by a module or already chosen by the user.
    pub fn propose_dependency(
        &self,
        config: &Configuration,
        ecosystem: Ecosystem,
        reference: PackageReference,
    ) -> Result<DependencyProposal> {
        if self.is_system_dependency(config, ecosystem, &reference.name)? {
            return Ok(DependencyProposal::Rejected {
                warning: format!(
                    "{} is already provided by the scaffold and cannot be added again",
                    reference.name
                ),
            });
        }
        let already_chosen = config
            .user_packages(ecosystem)
            .iter()
            .any(|existing| existing.name.to_lowercase() == reference.name.to_lowercase());
        if already_chosen {
            return Ok(DependencyProposal::Rejected {
                warning: format!("{} has already been added", reference.name),
            });
        }

        let mut updated = config.clone();
        updated.user_packages_mut(ecosystem).push(reference);
        Ok(DependencyProposal::Accepted(updated))
    }
}
