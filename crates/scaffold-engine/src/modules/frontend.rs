use super::api_docs::SWASHBUCKLE_PACKAGE;
use super::auth::JWT_BEARER_PACKAGE;
use super::{model_with, ContributionModule};
use crate::config::{Configuration, RouterMode};
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use crate::ui_kit::UiKitRegistry;
use serde_json::json;

/// Web project files rendered with the shared frontend model
const WEB_TEMPLATES: &[(&str, &str)] = &[
    ("frontend/index.html.jinja", "index.html"),
    ("frontend/vite.config.ts.jinja", "vite.config.ts"),
    ("frontend/tsconfig.json.jinja", "tsconfig.json"),
    ("frontend/App.vue.jinja", "src/App.vue"),
    ("frontend/router/index.ts.jinja", "src/router/index.ts"),
    ("frontend/stores/app.ts.jinja", "src/stores/app.ts"),
    ("frontend/api/request.ts.jinja", "src/api/request.ts"),
    ("frontend/views/HomeView.vue.jinja", "src/views/HomeView.vue"),
];

fn base_packages() -> Vec<PackageReference> {
    vec![
        PackageReference::new("vue", "^3.5.0"),
        PackageReference::new("vue-router", "^4.4.0"),
        PackageReference::new("pinia", "^2.2.0"),
        PackageReference::new("axios", "^1.7.0"),
        PackageReference::new("vite", "^6.0.0").dev(),
        PackageReference::new("@vitejs/plugin-vue", "^5.2.0").dev(),
        PackageReference::new("typescript", "~5.6.0").dev(),
        PackageReference::new("vue-tsc", "^2.1.0").dev(),
    ]
}

/// Vite + Vue web project, wired to the configured UI kit.
///
/// Upstream facts: the JWT bearer package (auth) switches on the token
/// interceptor and login route; the Swashbuckle package (api-docs) adds a
/// `/swagger` dev-server proxy.
pub struct FrontendModule {
    ui_kits: UiKitRegistry,
}

impl FrontendModule {
    pub fn new(ui_kits: UiKitRegistry) -> Self {
        Self { ui_kits }
    }
}

impl ContributionModule for FrontendModule {
    fn name(&self) -> &'static str {
        "frontend"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let kit = self.ui_kits.lookup(config.frontend.ui_library)?;
        let web = config.web_root();

        let model = model_with(
            config,
            json!({
                "ui_library": kit.library().name(),
                "router_history": config.frontend.router_mode == RouterMode::History,
                "mock_data": config.frontend.mock_data,
                "auth_enabled": plan.observe_dependency(Ecosystem::NuGet, JWT_BEARER_PACKAGE),
                "api_docs_enabled": plan.observe_dependency(Ecosystem::NuGet, SWASHBUCKLE_PACKAGE),
            }),
        );

        for (template_id, relative) in WEB_TEMPLATES {
            plan.add_template(*template_id, format!("{}/{}", web, relative), model.clone());
        }
        plan.add_template(
            kit.entry_template_id(),
            format!("{}/src/main.ts", web),
            model.clone(),
        );
        for extra in kit.extra_templates() {
            plan.add_template(
                extra.template_id,
                format!("{}/{}", web, extra.output_path),
                model.clone(),
            );
        }
        if config.frontend.mock_data {
            plan.add_template("frontend/mock/index.ts.jinja", format!("{}/src/mock/index.ts", web), model);
        }

        for reference in base_packages().into_iter().chain(kit.dependencies()) {
            plan.add_dependency(Ecosystem::Npm, reference);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiLibrary;
    use crate::error::ScaffoldError;
    use crate::modules::test_support::{paths, run_module};
    use crate::plan::FileSource;

    fn entry_model(plan: &Plan) -> serde_json::Value {
        match &plan.find_file("src/MyApp.Web/src/main.ts").unwrap().source {
            FileSource::Template { model, .. } => model.clone(),
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_element_plus_project() {
        let module = FrontendModule::new(UiKitRegistry::with_defaults());
        let plan = run_module(&module, &Configuration::default());

        let files = paths(&plan);
        assert!(files.contains(&"src/MyApp.Web/src/main.ts".to_string()));
        assert!(files.contains(&"src/MyApp.Web/vite.config.ts".to_string()));
        assert!(!files.iter().any(|p| p.ends_with("tailwind.config.js")));
        assert!(plan.has_dependency(Ecosystem::Npm, "element-plus"));
        assert!(plan.has_dependency(Ecosystem::Npm, "pinia"));
    }

    #[test]
    fn test_shadcn_extras_under_web_root() {
        let mut config = Configuration::default();
        config.frontend.ui_library = UiLibrary::ShadcnVue;
        let module = FrontendModule::new(UiKitRegistry::with_defaults());
        let plan = run_module(&module, &config);

        assert!(plan.find_file("src/MyApp.Web/components.json").is_some());
        assert!(plan.find_file("src/MyApp.Web/postcss.config.js").is_some());
        let tailwind = plan.dependencies(Ecosystem::Npm).get("tailwindcss").unwrap();
        assert!(tailwind.reference.dev);
    }

    #[test]
    fn test_unregistered_kit_fails() {
        let module = FrontendModule::new(UiKitRegistry::new());
        let mut plan = Plan::new();
        let err = module
            .contribute(&mut plan, &Configuration::default())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsupportedUiKit(UiLibrary::ElementPlus)));
    }

    #[test]
    fn test_reads_upstream_auth_and_docs() {
        let module = FrontendModule::new(UiKitRegistry::with_defaults());
        let config = Configuration::default();

        let mut plan = Plan::new();
        plan.enter_stage("auth", 30);
        plan.add_dependency(Ecosystem::NuGet, PackageReference::new(JWT_BEARER_PACKAGE, "9.0.0"));
        plan.enter_stage(module.name(), module.priority());
        module.contribute(&mut plan, &config).unwrap();

        let model = entry_model(&plan);
        assert_eq!(model["auth_enabled"], true);
        assert_eq!(model["api_docs_enabled"], false);
    }

    #[test]
    fn test_mock_data_module() {
        let mut config = Configuration::default();
        config.frontend.mock_data = true;
        let plan = run_module(&FrontendModule::new(UiKitRegistry::with_defaults()), &config);
        assert!(plan.find_file("src/MyApp.Web/src/mock/index.ts").is_some());
    }
}
