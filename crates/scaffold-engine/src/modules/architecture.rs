use super::{identity_model, model_with, orm_packages, ContributionModule};
use crate::config::{ArchitectureStyle, Configuration};
use crate::error::Result;
use crate::plan::Plan;
use serde_json::json;

/// Solution layout scaffolding. `Simple` keeps everything in the API project
/// and contributes nothing.
pub struct ArchitectureModule;

impl ContributionModule for ArchitectureModule {
    fn name(&self) -> &'static str {
        "architecture"
    }

    fn priority(&self) -> i32 {
        5
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let p = config.project_name();
        match config.backend.architecture {
            ArchitectureStyle::Simple => {}
            ArchitectureStyle::CleanArchitecture => {
                plan.add_template(
                    "backend/architecture/clean/Domain.csproj.jinja",
                    format!("src/{p}.Domain/{p}.Domain.csproj"),
                    identity_model(config),
                );
                plan.add_template(
                    "backend/architecture/clean/Application.csproj.jinja",
                    format!("src/{p}.Application/{p}.Application.csproj"),
                    identity_model(config),
                );
                // Infrastructure references the data-access packages directly
                let packages: Vec<_> = orm_packages(config)
                    .into_iter()
                    .map(|reference| reference.name)
                    .collect();
                plan.add_template(
                    "backend/architecture/clean/Infrastructure.csproj.jinja",
                    format!("src/{p}.Infrastructure/{p}.Infrastructure.csproj"),
                    model_with(config, json!({ "packages": packages })),
                );
            }
            ArchitectureStyle::VerticalSlice => {
                plan.add_template(
                    "backend/architecture/vertical-slice/ExampleFeature.cs.jinja",
                    format!("{}/Features/Example/ExampleFeature.cs", config.api_root()),
                    identity_model(config),
                );
            }
            ArchitectureStyle::ModularMonolith => {
                plan.add_template(
                    "backend/architecture/modular-monolith/Module.csproj.jinja",
                    format!("src/Modules/{p}.Core/{p}.Core.csproj"),
                    model_with(config, json!({ "module_name": "Core" })),
                );
            }
        }
        Ok(())
    }
}
