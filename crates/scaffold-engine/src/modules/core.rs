use super::{identity_model, model_with, ContributionModule};
use crate::config::{CacheProvider, Configuration};
use crate::error::Result;
use crate::plan::Plan;
use serde_json::json;

const GITIGNORE: &str = "bin/
obj/
node_modules/
dist/
*.db
.vs/
.idea/
*.user
";

/// Project identity files every scaffold gets
pub struct CoreModule;

impl ContributionModule for CoreModule {
    fn name(&self) -> &'static str {
        "core"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let api = config.api_root();
        let backend = &config.backend;

        let program_model = model_with(
            config,
            json!({
                "orm": backend.orm.name(),
                "cache": backend.cache.name(),
                "enable_jwt_auth": backend.jwt_auth,
                "enable_swagger": backend.swagger,
            }),
        );
        plan.add_template(
            "backend/Program.cs.jinja",
            format!("{}/Program.cs", api),
            program_model,
        );

        let settings_model = model_with(
            config,
            json!({
                "database": backend.database.name(),
                "connection_string": backend.database.connection_string(config.project_name()),
                "use_redis": backend.cache == CacheProvider::Redis,
                "enable_jwt_auth": backend.jwt_auth,
            }),
        );
        plan.add_template(
            "backend/appsettings.json.jinja",
            format!("{}/appsettings.json", api),
            settings_model,
        );

        plan.add_template(
            "backend/Directory.Build.props.jinja",
            "Directory.Build.props",
            identity_model(config),
        );

        let readme_model = model_with(
            config,
            json!({
                "architecture": backend.architecture.name(),
                "orm": backend.orm.name(),
                "database": backend.database.name(),
                "cache": backend.cache.name(),
                "router_mode": config.frontend.router_mode.name(),
            }),
        );
        plan.add_template("README.md.jinja", "README.md", readme_model);
        plan.add_file(".gitignore", GITIGNORE);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{paths, run_module};

    #[test]
    fn test_core_files_under_project_root() {
        let config = Configuration::minimal("Shop");
        let plan = run_module(&CoreModule, &config);
        assert_eq!(
            paths(&plan),
            vec![
                "src/Shop.Api/Program.cs",
                "src/Shop.Api/appsettings.json",
                "Directory.Build.props",
                "README.md",
                ".gitignore",
            ]
        );
        assert!(plan.dependencies(crate::plan::Ecosystem::NuGet).is_empty());
    }

    #[test]
    fn test_gitignore_is_literal() {
        let plan = run_module(&CoreModule, &Configuration::default());
        let gitignore = plan.find_file(".gitignore").unwrap();
        assert!(!gitignore.is_template());
    }
}
