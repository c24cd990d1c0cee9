//! Render pipeline: resolve every planned file to its final content

use crate::error::Result;
use crate::plan::{FileSource, Plan};
use crate::templates::TemplateCache;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Output path → content, ordered by path
pub type RenderedOutput = BTreeMap<String, String>;

/// Render `plan` against `templates`.
///
/// Literal files pass through untouched. The first failing template aborts
/// the whole pass; no partial output is returned.
pub fn render_plan(plan: &Plan, templates: &TemplateCache) -> Result<RenderedOutput> {
    let mut output = RenderedOutput::new();
    for descriptor in plan.files() {
        let content = match &descriptor.source {
            FileSource::Literal(content) => content.clone(),
            FileSource::Template { template_id, model } => templates.render(template_id, model)?,
        };
        if output.insert(descriptor.output_path.clone(), content).is_some() {
            warn!(path = %descriptor.output_path, "Duplicate output path, later content kept");
        }
    }
    debug!(files = output.len(), "Rendered plan");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use crate::templates::{CachePolicy, MemoryTemplateStore};
    use serde_json::json;
    use std::sync::Arc;

    fn cache(store: MemoryTemplateStore) -> TemplateCache {
        TemplateCache::new(Arc::new(store), CachePolicy::default())
    }

    #[test]
    fn test_literal_and_template_files() {
        let templates = cache(MemoryTemplateStore::new().with("hello.jinja", "Hello {{ name }}"));
        let mut plan = Plan::new();
        plan.add_file("z.txt", "literal {{ not rendered }}");
        plan.add_template("hello.jinja", "a.txt", json!({ "name": "Shop" }));

        let output = render_plan(&plan, &templates).unwrap();
        let paths: Vec<_> = output.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["a.txt", "z.txt"]);
        assert_eq!(output["a.txt"], "Hello Shop");
        assert_eq!(output["z.txt"], "literal {{ not rendered }}");
    }

    #[test]
    fn test_missing_template_aborts() {
        let templates = cache(MemoryTemplateStore::new());
        let mut plan = Plan::new();
        plan.add_file("ok.txt", "fine");
        plan.add_template("missing.jinja", "bad.txt", json!({}));

        match render_plan(&plan, &templates) {
            Err(ScaffoldError::TemplateNotFound { template_id }) => {
                assert_eq!(template_id, "missing.jinja")
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
