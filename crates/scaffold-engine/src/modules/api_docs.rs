use super::{model_with, ContributionModule};
use crate::config::Configuration;
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use serde_json::json;

pub const SWASHBUCKLE_PACKAGE: &str = "Swashbuckle.AspNetCore";

/// Swagger/OpenAPI document generation
pub struct ApiDocsModule;

impl ContributionModule for ApiDocsModule {
    fn name(&self) -> &'static str {
        "api-docs"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.backend.swagger
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        // The bearer security scheme follows the config flag, not the plan, so
        // this module does not depend on auth having run.
        plan.add_template(
            "backend/SwaggerSetup.cs.jinja",
            format!("{}/Extensions/SwaggerSetup.cs", config.api_root()),
            model_with(config, json!({ "enable_jwt_auth": config.backend.jwt_auth })),
        );
        plan.add_dependency(
            Ecosystem::NuGet,
            PackageReference::new(SWASHBUCKLE_PACKAGE, "7.2.0"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{paths, run_module};

    #[test]
    fn test_swagger_setup() {
        let plan = run_module(&ApiDocsModule, &Configuration::default());
        assert_eq!(paths(&plan), vec!["src/MyApp.Api/Extensions/SwaggerSetup.cs"]);
        assert!(plan.has_dependency(Ecosystem::NuGet, "swashbuckle.aspnetcore"));
    }
}
