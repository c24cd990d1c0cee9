//! Contribution modules: independent units that add files and dependencies to a plan
//!
//! Each module declares a priority (ascending = earlier) and a pure enablement
//! predicate. Modules are stateless; everything they produce goes into the
//! [`Plan`] handed to them by the composer.
//!
//! A module may only read facts registered by modules with a strictly lower
//! priority, and only through the `Plan::observe_*` methods. The upstream facts
//! each module consumes are listed in its own docs.

mod api_docs;
mod architecture;
mod auth;
mod cache;
mod core;
mod frontend;
mod manifests;
mod storage;
mod testing;
mod user_deps;

pub use api_docs::ApiDocsModule;
pub use architecture::ArchitectureModule;
pub use auth::AuthModule;
pub use cache::CacheModule;
pub use self::core::CoreModule;
pub use frontend::FrontendModule;
pub use manifests::ManifestModule;
pub use storage::{orm_packages, StorageModule};
pub use testing::{
    BackendIntegrationTestModule, BackendUnitTestModule, FrontendE2eTestModule,
    FrontendUnitTestModule,
};
pub use user_deps::UserDependencyModule;

use crate::config::Configuration;
use crate::error::Result;
use crate::plan::Plan;
use crate::ui_kit::UiKitRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

/// A unit that conditionally contributes files and dependencies to a plan
pub trait ContributionModule: Send + Sync {
    /// Diagnostic name used in logs and collision errors
    fn name(&self) -> &'static str;

    /// Execution order; lower runs first
    fn priority(&self) -> i32;

    /// Pure predicate deciding whether the module runs for `config`
    fn is_enabled(&self, config: &Configuration) -> bool;

    /// Append files and dependencies to `plan`. An error aborts the whole composition.
    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()>;
}

/// The standard module set, in no particular order (the composer sorts by priority)
pub fn default_modules(ui_kits: UiKitRegistry) -> Vec<Arc<dyn ContributionModule>> {
    vec![
        Arc::new(CoreModule),
        Arc::new(ArchitectureModule),
        Arc::new(StorageModule),
        Arc::new(CacheModule),
        Arc::new(AuthModule),
        Arc::new(ApiDocsModule),
        Arc::new(BackendUnitTestModule),
        Arc::new(BackendIntegrationTestModule),
        Arc::new(FrontendModule::new(ui_kits)),
        Arc::new(FrontendUnitTestModule),
        Arc::new(FrontendE2eTestModule),
        Arc::new(UserDependencyModule),
        Arc::new(ManifestModule),
    ]
}

/// Render model fields shared by every template
pub(crate) fn identity_model(config: &Configuration) -> Value {
    json!({
        "project_name": config.basic.project_name,
        "namespace": config.basic.namespace,
    })
}

/// `identity_model` extended with module-specific fields
pub(crate) fn model_with(config: &Configuration, extra: Value) -> Value {
    let mut model = identity_model(config);
    if let (Value::Object(base), Value::Object(extra)) = (&mut model, extra) {
        base.extend(extra);
    }
    model
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_module_names_unique() {
        let modules = default_modules(UiKitRegistry::with_defaults());
        let names: HashSet<_> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), modules.len());
    }

    #[test]
    fn test_model_with_merges_identity() {
        let config = Configuration::minimal("Shop");
        let model = model_with(&config, json!({ "use_redis": true }));
        assert_eq!(model["project_name"], "Shop");
        assert_eq!(model["use_redis"], true);
    }
}
