//! Plan composition: run enabled modules in priority order against one plan

use crate::config::Configuration;
use crate::error::{Result, ScaffoldError};
use crate::modules::{default_modules, ContributionModule};
use crate::plan::Plan;
use crate::ui_kit::UiKitRegistry;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, debug_span, error};

/// Case-insensitive record of claimed output paths and the directories they imply
#[derive(Default)]
struct PathClaims {
    files: HashMap<String, &'static str>,
    directories: HashMap<String, &'static str>,
}

impl PathClaims {
    fn claim(&mut self, path: &str, module: &'static str) -> Result<()> {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();
        let key = segments.join("/");

        let collision = |first: &str| ScaffoldError::PathCollision {
            path: path.to_string(),
            first: first.to_string(),
            second: module.to_string(),
        };

        if let Some(first) = self.files.get(&key).or_else(|| self.directories.get(&key)) {
            return Err(collision(*first));
        }
        for depth in 1..segments.len() {
            let prefix = segments[..depth].join("/");
            if let Some(first) = self.files.get(&prefix) {
                return Err(collision(*first));
            }
        }

        for depth in 1..segments.len() {
            self.directories
                .entry(segments[..depth].join("/"))
                .or_insert(module);
        }
        self.files.insert(key, module);
        Ok(())
    }
}

fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "module panicked".to_string()
    }
}

/// Runs a fixed, caller-supplied module list
#[derive(Clone)]
pub struct PlanComposer {
    modules: Vec<Arc<dyn ContributionModule>>,
}

impl PlanComposer {
    pub fn new(modules: Vec<Arc<dyn ContributionModule>>) -> Self {
        Self { modules }
    }

    pub fn with_default_modules(ui_kits: UiKitRegistry) -> Self {
        Self::new(default_modules(ui_kits))
    }

    pub fn modules(&self) -> &[Arc<dyn ContributionModule>] {
        &self.modules
    }

    /// Compose a plan for `config`.
    ///
    /// Enabled modules run sequentially in ascending priority; ties keep list
    /// order. Any module error, panic or output-path collision aborts the run.
    pub fn compose(&self, config: &Configuration) -> Result<Plan> {
        let mut enabled: Vec<&Arc<dyn ContributionModule>> = self
            .modules
            .iter()
            .filter(|m| m.is_enabled(config))
            .collect();
        enabled.sort_by_key(|m| m.priority());

        let mut plan = Plan::new();
        let mut claims = PathClaims::default();

        for module in enabled {
            let name = module.name();
            let _span = debug_span!("contribute", module = name, priority = module.priority()).entered();
            plan.enter_stage(name, module.priority());
            let first_new = plan.files().len();

            match catch_unwind(AssertUnwindSafe(|| module.contribute(&mut plan, config))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "Module contribution failed");
                    return Err(e);
                }
                Err(payload) => {
                    let reason = panic_reason(payload);
                    error!(%reason, "Module panicked during contribution");
                    return Err(ScaffoldError::ModuleContribution {
                        module: name.to_string(),
                        reason,
                    });
                }
            }

            for descriptor in &plan.files()[first_new..] {
                if let Err(e) = claims.claim(&descriptor.output_path, name) {
                    error!(error = %e, "Output path collision");
                    return Err(e);
                }
            }
            debug!(files = plan.files().len() - first_new, "Module contributed");
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheProvider, UiLibrary};
    use crate::plan::Ecosystem;

    struct FixedFile {
        name: &'static str,
        priority: i32,
        path: &'static str,
    }

    impl ContributionModule for FixedFile {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_enabled(&self, _config: &Configuration) -> bool {
            true
        }

        fn contribute(&self, plan: &mut Plan, _config: &Configuration) -> Result<()> {
            plan.add_file(self.path, self.name);
            Ok(())
        }
    }

    struct Panicking;

    impl ContributionModule for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn priority(&self) -> i32 {
            0
        }

        fn is_enabled(&self, _config: &Configuration) -> bool {
            true
        }

        fn contribute(&self, _plan: &mut Plan, _config: &Configuration) -> Result<()> {
            panic!("boom")
        }
    }

    fn fixed(name: &'static str, priority: i32, path: &'static str) -> Arc<dyn ContributionModule> {
        Arc::new(FixedFile {
            name,
            priority,
            path,
        })
    }

    #[test]
    fn test_sorted_by_priority_stable_on_ties() {
        let composer = PlanComposer::new(vec![
            fixed("late", 50, "c.txt"),
            fixed("tie-first", 10, "a.txt"),
            fixed("tie-second", 10, "b.txt"),
        ]);
        let plan = composer.compose(&Configuration::default()).unwrap();
        let paths: Vec<_> = plan.output_paths().collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_case_insensitive_collision() {
        let composer = PlanComposer::new(vec![
            fixed("core", 0, "README.md"),
            fixed("docs", 10, "readme.md"),
        ]);
        match composer.compose(&Configuration::default()) {
            Err(ScaffoldError::PathCollision { first, second, .. }) => {
                assert_eq!(first, "core");
                assert_eq!(second, "docs");
            }
            other => panic!("expected collision, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_file_directory_prefix_collision() {
        let file_then_dir = PlanComposer::new(vec![
            fixed("a", 0, "src/App"),
            fixed("b", 1, "src/app/Program.cs"),
        ]);
        assert!(file_then_dir.compose(&Configuration::default()).is_err());

        let dir_then_file = PlanComposer::new(vec![
            fixed("a", 0, "src/App/Program.cs"),
            fixed("b", 1, "src/APP"),
        ]);
        assert!(dir_then_file.compose(&Configuration::default()).is_err());
    }

    #[test]
    fn test_siblings_do_not_collide() {
        let composer = PlanComposer::new(vec![
            fixed("a", 0, "src/App/Program.cs"),
            fixed("b", 1, "src/App/appsettings.json"),
        ]);
        assert_eq!(composer.compose(&Configuration::default()).unwrap().files().len(), 2);
    }

    #[test]
    fn test_panic_becomes_module_failure() {
        let composer = PlanComposer::new(vec![Arc::new(Panicking)]);
        let err = composer.compose(&Configuration::default()).unwrap_err();
        assert!(err.is_module_failure());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_unsupported_kit_aborts_composition() {
        let composer = PlanComposer::with_default_modules(UiKitRegistry::new());
        let err = composer.compose(&Configuration::default()).unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsupportedUiKit(UiLibrary::ElementPlus)));
    }

    #[test]
    fn test_default_modules_compose_without_collisions() {
        let composer = PlanComposer::with_default_modules(UiKitRegistry::with_defaults());
        for preset in crate::config::presets::all() {
            let plan = composer.compose(&preset.config).unwrap();
            assert!(plan.find_file("README.md").is_some(), "{}", preset.id);
        }
    }

    #[test]
    fn test_frontend_sees_auth_package() {
        let composer = PlanComposer::with_default_modules(UiKitRegistry::with_defaults());
        let mut config = Configuration::default();
        config.backend.cache = CacheProvider::Redis;
        let plan = composer.compose(&config).unwrap();
        assert!(plan.has_dependency(Ecosystem::NuGet, "StackExchange.Redis"));

        let main = plan.find_file("src/MyApp.Web/src/main.ts").unwrap();
        match &main.source {
            crate::plan::FileSource::Template { model, .. } => assert_eq!(model["auth_enabled"], true),
            other => panic!("unexpected source {:?}", other),
        }
    }
}
