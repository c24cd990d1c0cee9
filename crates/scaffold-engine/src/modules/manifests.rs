use super::{model_with, ContributionModule};
use crate::config::Configuration;
use crate::error::Result;
use crate::plan::{DependencyEntry, Ecosystem, Plan};
use serde_json::{json, Value};

fn package_list<'a>(entries: impl Iterator<Item = &'a DependencyEntry>) -> Vec<Value> {
    entries
        .map(|e| json!({ "name": e.reference.name, "version": e.reference.version }))
        .collect()
}

/// Path of `project` relative to the API project directory, MSBuild style
fn relative_to_api(project: &str) -> String {
    let rest = project.strip_prefix("src/").unwrap_or(project);
    format!("..\\{}", rest.replace('/', "\\"))
}

/// npm package names are lowercase and may not contain dots
fn npm_package_name(project_name: &str) -> String {
    project_name.to_lowercase().replace(['.', ' '], "-")
}

/// Build manifests: the package and project lists every earlier module fed.
///
/// Upstream facts: all NuGet and npm dependencies, and every `.csproj`
/// descriptor. Runs last so the manifests are complete.
pub struct ManifestModule;

impl ContributionModule for ManifestModule {
    fn name(&self) -> &'static str {
        "manifests"
    }

    fn priority(&self) -> i32 {
        1000
    }

    fn is_enabled(&self, _config: &Configuration) -> bool {
        true
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let p = config.project_name();
        let api_project = format!("{}/{}.Api.csproj", config.api_root(), p);

        let nuget = plan.observe_dependencies(Ecosystem::NuGet);
        let npm = plan.observe_dependencies(Ecosystem::Npm);
        let projects: Vec<String> = plan
            .observe_files()
            .filter(|f| f.output_path.to_lowercase().ends_with(".csproj"))
            .map(|f| f.output_path.clone())
            .collect();

        let central_versions = package_list(nuget.iter().copied());
        let api_packages: Vec<_> = nuget
            .iter()
            .filter(|e| !e.reference.dev)
            .map(|e| e.reference.name.clone())
            .collect();
        let project_references: Vec<_> = projects
            .iter()
            .filter(|path| path.starts_with("src/"))
            .map(|path| relative_to_api(path))
            .collect();
        let npm_runtime = package_list(npm.iter().copied().filter(|e| !e.reference.dev));
        let npm_dev = package_list(npm.iter().copied().filter(|e| e.reference.dev));
        let observes = |name: &str| npm.iter().any(|e| e.reference.name.eq_ignore_ascii_case(name));
        let package_model = model_with(
            config,
            json!({
                "package_name": npm_package_name(p),
                "dependencies": npm_runtime,
                "dev_dependencies": npm_dev,
                "has_vitest": observes("vitest"),
                "has_playwright": observes("@playwright/test"),
                "has_cypress": observes("cypress"),
            }),
        );

        let mut solution_projects = vec![api_project.clone()];
        solution_projects.extend(projects);

        plan.add_template(
            "backend/Directory.Packages.props.jinja",
            "Directory.Packages.props",
            model_with(config, json!({ "packages": central_versions })),
        );
        plan.add_template(
            "backend/Api.csproj.jinja",
            api_project,
            model_with(
                config,
                json!({
                    "packages": api_packages,
                    "project_references": project_references,
                }),
            ),
        );
        plan.add_template(
            "frontend/package.json.jinja",
            format!("{}/package.json", config.web_root()),
            package_model,
        );
        plan.add_template(
            "backend/Solution.slnx.jinja",
            format!("{}.slnx", p),
            model_with(config, json!({ "projects": solution_projects })),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{FileSource, PackageReference};

    fn model_of<'a>(plan: &'a Plan, path: &str) -> &'a Value {
        match &plan.find_file(path).unwrap().source {
            FileSource::Template { model, .. } => model,
            other => panic!("unexpected source {:?}", other),
        }
    }

    fn staged_plan() -> Plan {
        let mut plan = Plan::new();
        plan.enter_stage("storage", 10);
        plan.add_dependency(Ecosystem::NuGet, PackageReference::new("Dapper", "2.1.35"));
        plan.enter_stage("architecture", 5);
        plan.add_template("x", "src/Shop.Domain/Shop.Domain.csproj", json!({}));
        plan.enter_stage("backend-unit-tests", 60);
        plan.add_dependency(Ecosystem::NuGet, PackageReference::new("xunit", "2.9.2").dev());
        plan.add_template("x", "tests/Shop.UnitTests/Shop.UnitTests.csproj", json!({}));
        plan.enter_stage("frontend", 70);
        plan.add_dependency(Ecosystem::Npm, PackageReference::new("vue", "^3.5.0"));
        plan.add_dependency(Ecosystem::Npm, PackageReference::new("vite", "^6.0.0").dev());
        plan.enter_stage(ManifestModule.name(), ManifestModule.priority());
        plan
    }

    #[test]
    fn test_dev_packages_stay_out_of_api_project() {
        let mut plan = staged_plan();
        ManifestModule
            .contribute(&mut plan, &Configuration::minimal("Shop"))
            .unwrap();

        let api = model_of(&plan, "src/Shop.Api/Shop.Api.csproj");
        assert_eq!(api["packages"], json!(["Dapper"]));
        assert_eq!(api["project_references"], json!(["..\\Shop.Domain\\Shop.Domain.csproj"]));

        let props = model_of(&plan, "Directory.Packages.props");
        assert_eq!(props["packages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_package_json_split() {
        let mut plan = staged_plan();
        ManifestModule
            .contribute(&mut plan, &Configuration::minimal("Shop.Web"))
            .unwrap();
        let package = model_of(&plan, "src/Shop.Web.Web/package.json");
        assert_eq!(package["package_name"], "shop-web");
        assert_eq!(package["dependencies"][0]["name"], "vue");
        assert_eq!(package["dev_dependencies"][0]["name"], "vite");
        assert_eq!(package["has_vitest"], false);
    }

    #[test]
    fn test_solution_lists_every_project() {
        let mut plan = staged_plan();
        ManifestModule
            .contribute(&mut plan, &Configuration::minimal("Shop"))
            .unwrap();
        let solution = model_of(&plan, "Shop.slnx");
        assert_eq!(
            solution["projects"],
            json!([
                "src/Shop.Api/Shop.Api.csproj",
                "src/Shop.Domain/Shop.Domain.csproj",
                "tests/Shop.UnitTests/Shop.UnitTests.csproj",
            ])
        );
    }
}
