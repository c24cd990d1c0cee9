//! Test-project scaffolding, one module per test layer
//!
//! Test tooling is registered as development dependencies: it lands in
//! `Directory.Packages.props` / `devDependencies` but never in the API project.

use super::{model_with, ContributionModule};
use crate::config::{
    BackendIntegrationTestFramework, BackendUnitTestFramework, Configuration,
    FrontendE2eFramework, FrontendUnitTestFramework,
};
use crate::error::Result;
use crate::plan::{Ecosystem, PackageReference, Plan};
use serde_json::json;

const TEST_SDK: (&str, &str) = ("Microsoft.NET.Test.Sdk", "17.12.0");

fn dev_packages(packages: &[(&str, &str)]) -> Vec<PackageReference> {
    packages
        .iter()
        .map(|(name, version)| PackageReference::new(*name, *version).dev())
        .collect()
}

/// Register `packages` and render a test project that lists them by name
fn add_test_project(
    plan: &mut Plan,
    config: &Configuration,
    template_id: &str,
    project_suffix: &str,
    packages: Vec<PackageReference>,
) {
    let p = config.project_name();
    let names: Vec<_> = packages.iter().map(|r| r.name.clone()).collect();
    plan.add_template(
        template_id,
        format!("tests/{p}.{project_suffix}/{p}.{project_suffix}.csproj"),
        model_with(config, json!({ "packages": names })),
    );
    for reference in packages {
        plan.add_dependency(Ecosystem::NuGet, reference);
    }
}

pub struct BackendUnitTestModule;

impl ContributionModule for BackendUnitTestModule {
    fn name(&self) -> &'static str {
        "backend-unit-tests"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.backend.unit_test_framework != BackendUnitTestFramework::None
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let (template_id, packages) = match config.backend.unit_test_framework {
            BackendUnitTestFramework::None => return Ok(()),
            BackendUnitTestFramework::XUnit => (
                "backend/tests/unit/xunit/UnitTests.csproj.jinja",
                dev_packages(&[
                    TEST_SDK,
                    ("xunit", "2.9.2"),
                    ("xunit.runner.visualstudio", "2.8.2"),
                ]),
            ),
            BackendUnitTestFramework::NUnit => (
                "backend/tests/unit/nunit/UnitTests.csproj.jinja",
                dev_packages(&[TEST_SDK, ("NUnit", "4.2.2"), ("NUnit3TestAdapter", "4.6.0")]),
            ),
            BackendUnitTestFramework::MsTest => (
                "backend/tests/unit/mstest/UnitTests.csproj.jinja",
                dev_packages(&[
                    TEST_SDK,
                    ("MSTest.TestFramework", "3.6.4"),
                    ("MSTest.TestAdapter", "3.6.4"),
                ]),
            ),
        };
        add_test_project(plan, config, template_id, "UnitTests", packages);
        Ok(())
    }
}

pub struct BackendIntegrationTestModule;

impl ContributionModule for BackendIntegrationTestModule {
    fn name(&self) -> &'static str {
        "backend-integration-tests"
    }

    fn priority(&self) -> i32 {
        65
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.backend.integration_test_framework != BackendIntegrationTestFramework::None
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        if config.backend.integration_test_framework == BackendIntegrationTestFramework::XUnit {
            let packages = dev_packages(&[
                TEST_SDK,
                ("xunit", "2.9.2"),
                ("xunit.runner.visualstudio", "2.8.2"),
                ("Microsoft.AspNetCore.Mvc.Testing", "9.0.0"),
            ]);
            add_test_project(
                plan,
                config,
                "backend/tests/integration/xunit/IntegrationTests.csproj.jinja",
                "IntegrationTests",
                packages,
            );
        }
        Ok(())
    }
}

pub struct FrontendUnitTestModule;

impl ContributionModule for FrontendUnitTestModule {
    fn name(&self) -> &'static str {
        "frontend-unit-tests"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.frontend.unit_test_framework != FrontendUnitTestFramework::None
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        if config.frontend.unit_test_framework != FrontendUnitTestFramework::Vitest {
            return Ok(());
        }
        plan.add_template(
            "frontend/tests/vitest.config.ts.jinja",
            format!("{}/vitest.config.ts", config.web_root()),
            model_with(config, json!({})),
        );
        for reference in dev_packages(&[
            ("vitest", "^3.0.0"),
            ("@vue/test-utils", "^2.4.0"),
            ("jsdom", "^25.0.0"),
            ("@vitest/coverage-v8", "^3.0.0"),
        ]) {
            plan.add_dependency(Ecosystem::Npm, reference);
        }
        Ok(())
    }
}

pub struct FrontendE2eTestModule;

impl ContributionModule for FrontendE2eTestModule {
    fn name(&self) -> &'static str {
        "frontend-e2e-tests"
    }

    fn priority(&self) -> i32 {
        95
    }

    fn is_enabled(&self, config: &Configuration) -> bool {
        config.frontend.e2e_framework != FrontendE2eFramework::None
    }

    fn contribute(&self, plan: &mut Plan, config: &Configuration) -> Result<()> {
        let web = config.web_root();
        let (template_id, file_name, package) = match config.frontend.e2e_framework {
            FrontendE2eFramework::None => return Ok(()),
            FrontendE2eFramework::Playwright => (
                "frontend/tests/playwright.config.ts.jinja",
                "playwright.config.ts",
                ("@playwright/test", "^1.49.0"),
            ),
            FrontendE2eFramework::Cypress => (
                "frontend/tests/cypress.config.ts.jinja",
                "cypress.config.ts",
                ("cypress", "^13.0.0"),
            ),
        };
        plan.add_template(
            template_id,
            format!("{}/{}", web, file_name),
            model_with(config, json!({ "base_url": "http://localhost:5173" })),
        );
        plan.add_dependency(
            Ecosystem::Npm,
            PackageReference::new(package.0, package.1).dev(),
        );
        Ok(())
    }
}
