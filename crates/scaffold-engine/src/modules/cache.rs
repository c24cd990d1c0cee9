use super::{model_with, ContributionModule};
use crate::config::{CacheProvider, Configuration};
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use serde_json::json;

/// Cache setup: in-process memory cache or a Redis client
pub struct CacheModule;

impl ContributionModule for CacheModule {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.backend.cache != CacheProvider::None
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let api = config.api_root();
        match config.backend.cache {
            CacheProvider::None => {}
            CacheProvider::MemoryCache => {
                plan.add_template(
                    "backend/cache/MemoryCacheSetup.cs.jinja",
                    format!("{}/Extensions/MemoryCacheSetup.cs", api),
                    model_with(config, json!({})),
                );
            }
            CacheProvider::Redis => {
                plan.add_template(
                    "backend/cache/RedisSetup.cs.jinja",
                    format!("{}/Extensions/RedisSetup.cs", api),
                    model_with(config, json!({ "instance_name": format!("{}:", config.project_name()) })),
                );
                plan.add_dependency(
                    Ecosystem::NuGet,
                    PackageReference::new("StackExchange.Redis", "2.8.16"),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{paths, run_module};

    #[test]
    fn test_disabled_without_cache() {
        assert!(!CacheModule.is_enabled(&Configuration::minimal("Shop")));
    }

    #[test]
    fn test_memory_cache_adds_no_packages() {
        let mut config = Configuration::minimal("Shop");
        config.backend.cache = CacheProvider::MemoryCache;
        let plan = run_module(&CacheModule, &config);
        assert_eq!(paths(&plan), vec!["src/Shop.Api/Extensions/MemoryCacheSetup.cs"]);
        assert!(plan.dependencies(Ecosystem::NuGet).is_empty());
    }

    #[test]
    fn test_redis_adds_client() {
        let mut config = Configuration::minimal("Shop");
        config.backend.cache = CacheProvider::Redis;
        let plan = run_module(&CacheModule, &config);
        assert_eq!(paths(&plan), vec!["src/Shop.Api/Extensions/RedisSetup.cs"]);
        assert!(plan.has_dependency(Ecosystem::NuGet, "StackExchange.Redis"));
    }
}
