use super::{identity_model, model_with, ContributionModule};
use crate::config::Configuration;
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use serde_json::json;

/// NuGet package whose presence tells downstream modules that JWT auth is on
pub const JWT_BEARER_PACKAGE: &str = "Microsoft.AspNetCore.Authentication.JwtBearer";

pub struct AuthModule;

impl ContributionModule for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.backend.jwt_auth
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let api = config.api_root();
        plan.add_template(
            "backend/auth/JwtSetup.cs.jinja",
            format!("{}/Extensions/JwtSetup.cs", api),
            identity_model(config),
        );
        plan.add_template(
            "backend/auth/JwtOptions.cs.jinja",
            format!("{}/Options/JwtOptions.cs", api),
            model_with(config, json!({ "expires_minutes": 120 })),
        );
        plan.add_dependency(
            Ecosystem::NuGet,
            PackageReference::new(JWT_BEARER_PACKAGE, "9.0.0"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::run_module;

    #[test]
    fn test_gated_by_flag() {
        let mut config = Configuration::minimal("Shop");
        assert!(!AuthModule.is_enabled(&config));
        config.backend.jwt_auth = true;
        assert!(AuthModule.is_enabled(&config));
    }

    #[test]
    fn test_registers_bearer_package() {
        let plan = run_module(&AuthModule, &Configuration::default());
        assert_eq!(plan.files().len(), 2);
        assert!(plan.has_dependency(Ecosystem::NuGet, JWT_BEARER_PACKAGE));
    }
}
