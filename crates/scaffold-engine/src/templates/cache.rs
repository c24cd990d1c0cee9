use super::TemplateStore;
use crate::error::{Result, ScaffoldError};
use minijinja::{AutoEscape, Environment};
use moka::sync::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Expiry and size bounds for parsed templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_capacity: u64,
    /// Evict entries not rendered for this long
    pub time_to_idle: Duration,
    /// Evict entries this long after insertion regardless of use
    pub time_to_live: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_capacity: 512,
            time_to_idle: Duration::from_secs(30 * 60),
            time_to_live: Duration::from_secs(2 * 60 * 60),
        }
    }
}

/// One parsed template, owned by its own environment
struct ParsedTemplate {
    env: Environment<'static>,
}

impl ParsedTemplate {
    fn parse(template_id: &str, body: String) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        // Output is source code, not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template_owned(template_id.to_string(), body)
            .map_err(|e| ScaffoldError::TemplateParse {
                template_id: template_id.to_string(),
                diagnostics: format!("{:#}", e),
            })?;
        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, template_id: &str, model: S) -> Result<String> {
        let render_error = |e: minijinja::Error| ScaffoldError::TemplateRender {
            template_id: template_id.to_string(),
            diagnostics: format!("{:#}", e),
        };
        self.env
            .get_template(template_id)
            .map_err(render_error)?
            .render(model)
            .map_err(render_error)
    }
}

/// Process-wide cache of parsed templates keyed by template identifier.
///
/// Concurrent misses on the same identifier may each parse the body; the
/// last insert wins and the results are identical.
pub struct TemplateCache {
    store: Arc<dyn TemplateStore>,
    parsed: Cache<String, Arc<ParsedTemplate>>,
}

impl TemplateCache {
    pub fn new(store: Arc<dyn TemplateStore>, policy: CachePolicy) -> Self {
        let parsed = Cache::builder()
            .max_capacity(policy.max_capacity)
            .time_to_idle(policy.time_to_idle)
            .time_to_live(policy.time_to_live)
            .build();
        Self { store, parsed }
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }

    /// Render `template_id` with `model`, parsing the body on first use
    pub fn render<S: Serialize>(&self, template_id: &str, model: S) -> Result<String> {
        self.parsed(template_id)?.render(template_id, model)
    }

    fn parsed(&self, template_id: &str) -> Result<Arc<ParsedTemplate>> {
        if let Some(parsed) = self.parsed.get(template_id) {
            trace!(template_id, "Template cache hit");
            return Ok(parsed);
        }

        debug!(template_id, "Template cache miss, parsing");
        let body = self.store.template_body(template_id)?;
        let parsed = Arc::new(ParsedTemplate::parse(template_id, body)?);
        self.parsed.insert(template_id.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn contains(&self, template_id: &str) -> bool {
        self.parsed.contains_key(template_id)
    }

    /// Drop every parsed template, e.g. after the template directory changed
    pub fn invalidate_all(&self) {
        self.parsed.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::MemoryTemplateStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts body fetches to observe parse reuse
    struct CountingStore {
        inner: MemoryTemplateStore,
        fetches: AtomicUsize,
    }

    impl TemplateStore for CountingStore {
        fn template_body(&self, template_id: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.template_body(template_id)
        }

        fn template_ids(&self) -> Result<Vec<String>> {
            self.inner.template_ids()
        }
    }

    fn counting(inner: MemoryTemplateStore) -> Arc<CountingStore> {
        Arc::new(CountingStore {
            inner,
            fetches: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_parse_reused_across_models() {
        let store = counting(MemoryTemplateStore::new().with("hello.jinja", "Hello {{ name }}!"));
        let cache = TemplateCache::new(store.clone(), CachePolicy::default());

        assert_eq!(cache.render("hello.jinja", json!({ "name": "Ada" })).unwrap(), "Hello Ada!");
        assert_eq!(cache.render("hello.jinja", json!({ "name": "Bob" })).unwrap(), "Hello Bob!");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
        assert!(cache.contains("hello.jinja"));
    }

    #[test]
    fn test_not_found_is_distinct_from_parse_error() {
        let store = MemoryTemplateStore::new().with("broken.jinja", "{% if x %}never closed");
        let cache = TemplateCache::new(Arc::new(store), CachePolicy::default());

        assert!(matches!(
            cache.render("missing.jinja", json!({})),
            Err(ScaffoldError::TemplateNotFound { .. })
        ));
        match cache.render("broken.jinja", json!({})) {
            Err(ScaffoldError::TemplateParse { template_id, .. }) => {
                assert_eq!(template_id, "broken.jinja")
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(!cache.contains("broken.jinja"));
    }

    #[test]
    fn test_no_html_escaping() {
        let store = MemoryTemplateStore::new().with("index.html.jinja", "<title>{{ title }}</title>");
        let cache = TemplateCache::new(Arc::new(store), CachePolicy::default());
        let html = cache
            .render("index.html.jinja", json!({ "title": "A & B <app>" }))
            .unwrap();
        assert_eq!(html, "<title>A & B <app></title>");
    }

    #[test]
    fn test_block_whitespace_trimmed() {
        let body = "items:\n{% for i in items %}\n  - {{ i }}\n{% endfor %}\n";
        let store = MemoryTemplateStore::new().with("list.jinja", body);
        let cache = TemplateCache::new(Arc::new(store), CachePolicy::default());
        let out = cache.render("list.jinja", json!({ "items": ["a", "b"] })).unwrap();
        assert_eq!(out, "items:\n  - a\n  - b\n");
    }

    #[test]
    fn test_invalidate_forces_reparse() {
        let store = counting(MemoryTemplateStore::new().with("t", "x"));
        let cache = TemplateCache::new(store.clone(), CachePolicy::default());
        cache.render("t", json!({})).unwrap();
        cache.invalidate_all();
        cache.render("t", json!({})).unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
    }
}
