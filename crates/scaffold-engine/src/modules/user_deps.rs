use super::ContributionModule;
use crate::config::Configuration;
use crate::error::Result;
use crate::plan::{Ecosystem, Plan};
use tracing::warn;

/// Extra packages picked by the user.
///
/// Runs after every module that contributes system dependencies, so a user
/// entry can never shadow one of them; colliding names are dropped.
pub struct UserDependencyModule;

impl ContributionModule for UserDependencyModule {
    fn name(&self) -> &'static str {
        "user-dependencies"
    }

    fn priority(&self) -> i32 {
        900
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        for ecosystem in [Ecosystem::NuGet, Ecosystem::Npm] {
            for reference in config.user_packages(ecosystem) {
                if !plan.add_user_dependency(ecosystem, reference.clone()) {
                    warn!(
                        %ecosystem,
                        package = %reference.name,
                        "Dropping user dependency that duplicates an existing entry"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{OriginKind, PackageReference};

    #[test]
    fn test_duplicates_dropped() {
        let mut config = Configuration::minimal("Shop");
        config.frontend.npm_packages = vec![
            PackageReference::new("vue", "^2.7.0"),
            PackageReference::new("dayjs", "^1.11.0"),
            PackageReference::new("DayJS", "^1.0.0"),
        ];

        let mut plan = Plan::new();
        plan.enter_stage("frontend", 70);
        plan.add_dependency(Ecosystem::Npm, PackageReference::new("vue", "^3.5.0"));
        plan.enter_stage(UserDependencyModule.name(), UserDependencyModule.priority());
        UserDependencyModule.contribute(&mut plan, &config).unwrap();

        let npm = plan.dependencies(Ecosystem::Npm);
        assert_eq!(npm.len(), 2);
        assert_eq!(npm.get("vue").unwrap().reference.version, "^3.5.0");
        let dayjs = npm.get("dayjs").unwrap();
        assert_eq!(dayjs.reference.version, "^1.11.0");
        assert_eq!(dayjs.origin.kind, OriginKind::User);
    }
}
