//! Built-in templates compiled into the binary

use super::{not_found, TemplateStore};
use crate::error::Result;

macro_rules! builtin {
    ($id:literal) => {
        ($id, include_str!(concat!("../../templates/", $id)))
    };
}

/// Template identifiers and bodies, sorted by identifier
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    builtin!("README.md.jinja"),
    builtin!("backend/Api.csproj.jinja"),
    builtin!("backend/Directory.Build.props.jinja"),
    builtin!("backend/Directory.Packages.props.jinja"),
    builtin!("backend/Program.cs.jinja"),
    builtin!("backend/Solution.slnx.jinja"),
    builtin!("backend/SwaggerSetup.cs.jinja"),
    builtin!("backend/appsettings.json.jinja"),
    builtin!("backend/architecture/clean/Application.csproj.jinja"),
    builtin!("backend/architecture/clean/Domain.csproj.jinja"),
    builtin!("backend/architecture/clean/Infrastructure.csproj.jinja"),
    builtin!("backend/architecture/modular-monolith/Module.csproj.jinja"),
    builtin!("backend/architecture/vertical-slice/ExampleFeature.cs.jinja"),
    builtin!("backend/auth/JwtOptions.cs.jinja"),
    builtin!("backend/auth/JwtSetup.cs.jinja"),
    builtin!("backend/cache/MemoryCacheSetup.cs.jinja"),
    builtin!("backend/cache/RedisSetup.cs.jinja"),
    builtin!("backend/orm/dapper/DapperSetup.cs.jinja"),
    builtin!("backend/orm/efcore/DbContext.cs.jinja"),
    builtin!("backend/orm/efcore/EFCoreSetup.cs.jinja"),
    builtin!("backend/orm/freesql/FreeSqlSetup.cs.jinja"),
    builtin!("backend/orm/sqlsugar/SqlSugarSetup.cs.jinja"),
    builtin!("backend/tests/integration/xunit/IntegrationTests.csproj.jinja"),
    builtin!("backend/tests/unit/mstest/UnitTests.csproj.jinja"),
    builtin!("backend/tests/unit/nunit/UnitTests.csproj.jinja"),
    builtin!("backend/tests/unit/xunit/UnitTests.csproj.jinja"),
    builtin!("frontend/App.vue.jinja"),
    builtin!("frontend/api/request.ts.jinja"),
    builtin!("frontend/index.html.jinja"),
    builtin!("frontend/main.ts.jinja"),
    builtin!("frontend/mock/index.ts.jinja"),
    builtin!("frontend/package.json.jinja"),
    builtin!("frontend/router/index.ts.jinja"),
    builtin!("frontend/stores/app.ts.jinja"),
    builtin!("frontend/tests/cypress.config.ts.jinja"),
    builtin!("frontend/tests/playwright.config.ts.jinja"),
    builtin!("frontend/tests/vitest.config.ts.jinja"),
    builtin!("frontend/tsconfig.json.jinja"),
    builtin!("frontend/ui/antd/main.ts.jinja"),
    builtin!("frontend/ui/matechat/ChatLayout.vue.jinja"),
    builtin!("frontend/ui/matechat/main.ts.jinja"),
    builtin!("frontend/ui/naive/main.ts.jinja"),
    builtin!("frontend/ui/shadcn/components.json.jinja"),
    builtin!("frontend/ui/shadcn/main.ts.jinja"),
    builtin!("frontend/ui/tailwind/main.ts.jinja"),
    builtin!("frontend/ui/tailwind/postcss.config.js.jinja"),
    builtin!("frontend/ui/tailwind/style.css.jinja"),
    builtin!("frontend/ui/tailwind/tailwind.config.js.jinja"),
    builtin!("frontend/views/HomeView.vue.jinja"),
    builtin!("frontend/vite.config.ts.jinja"),
];

/// Serves the templates shipped with the engine
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplateStore;

impl EmbeddedTemplateStore {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateStore for EmbeddedTemplateStore {
    fn template_body(&self, template_id: &str) -> Result<String> {
        BUILTIN_TEMPLATES
            .binary_search_by(|(id, _)| (*id).cmp(template_id))
            .map(|idx| BUILTIN_TEMPLATES[idx].1.to_string())
            .map_err(|_| not_found(template_id))
    }

    fn template_ids(&self) -> Result<Vec<String>> {
        Ok(BUILTIN_TEMPLATES.iter().map(|(id, _)| id.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{CachePolicy, TemplateCache};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_builtin_ids_sorted_and_unique() {
        let ids: Vec<_> = BUILTIN_TEMPLATES.iter().map(|(id, _)| *id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_lookup() {
        let store = EmbeddedTemplateStore::new();
        assert!(store.template_body("backend/Program.cs.jinja").unwrap().contains("WebApplication"));
        assert!(store.template_body("backend/Nope.cs.jinja").is_err());
    }

    #[test]
    fn test_every_builtin_parses() {
        let cache = TemplateCache::new(Arc::new(EmbeddedTemplateStore), CachePolicy::default());
        for (id, _) in BUILTIN_TEMPLATES {
            cache
                .render(id, json!({ "project_name": "Shop", "namespace": "Shop" }))
                .unwrap_or_else(|e| panic!("{}: {}", id, e));
        }
    }
}
