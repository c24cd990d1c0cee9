//! Scaffold configuration: the validated description of a target stack
//!
//! The wire shape mirrors what the configurator UI sends: three option groups
//! (`basic`, `backend`, `frontend`), camelCase keys and enum values spelled as
//! their display names (`"EFCore"`, `"SQLite"`, `"xUnit"`).

pub mod presets;

use crate::plan::{Ecosystem, PackageReference};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend architecture layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArchitectureStyle {
    #[default]
    Simple,
    CleanArchitecture,
    VerticalSlice,
    ModularMonolith,
}

/// Storage-access strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrmProvider {
    #[default]
    SqlSugar,
    #[serde(rename = "EFCore")]
    EfCore,
    Dapper,
    FreeSql,
}

/// Storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DatabaseProvider {
    #[default]
    #[serde(rename = "SQLite")]
    Sqlite,
    #[serde(rename = "MySQL")]
    MySql,
    #[serde(rename = "SQLServer")]
    SqlServer,
}

/// Cache strategy: none, in-process, or remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CacheProvider {
    #[default]
    None,
    MemoryCache,
    Redis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendUnitTestFramework {
    #[default]
    None,
    #[serde(rename = "xUnit")]
    XUnit,
    NUnit,
    #[serde(rename = "MSTest")]
    MsTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendIntegrationTestFramework {
    #[default]
    None,
    #[serde(rename = "xUnit")]
    XUnit,
}

/// Frontend component library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UiLibrary {
    #[default]
    ElementPlus,
    AntDesignVue,
    #[serde(rename = "NaiveUI")]
    NaiveUi,
    TailwindHeadless,
    ShadcnVue,
    MateChat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RouterMode {
    #[default]
    Hash,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrontendUnitTestFramework {
    #[default]
    None,
    Vitest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrontendE2eFramework {
    #[default]
    None,
    Playwright,
    Cypress,
}

impl ArchitectureStyle {
    pub fn name(&self) -> &'static str {
        match self {
            ArchitectureStyle::Simple => "Simple",
            ArchitectureStyle::CleanArchitecture => "CleanArchitecture",
            ArchitectureStyle::VerticalSlice => "VerticalSlice",
            ArchitectureStyle::ModularMonolith => "ModularMonolith",
        }
    }
}

impl UiLibrary {
    pub fn name(&self) -> &'static str {
        match self {
            UiLibrary::ElementPlus => "ElementPlus",
            UiLibrary::AntDesignVue => "AntDesignVue",
            UiLibrary::NaiveUi => "NaiveUI",
            UiLibrary::TailwindHeadless => "TailwindHeadless",
            UiLibrary::ShadcnVue => "ShadcnVue",
            UiLibrary::MateChat => "MateChat",
        }
    }
}

impl DatabaseProvider {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseProvider::Sqlite => "SQLite",
            DatabaseProvider::MySql => "MySQL",
            DatabaseProvider::SqlServer => "SQLServer",
        }
    }

    /// Development connection string for the generated appsettings
    pub fn connection_string(&self, project_name: &str) -> String {
        match self {
            DatabaseProvider::Sqlite => format!("Data Source={}.db", project_name),
            DatabaseProvider::MySql => format!(
                "Server=localhost;Database={};User=root;Password=;",
                project_name
            ),
            DatabaseProvider::SqlServer => format!(
                "Server=localhost;Database={};Trusted_Connection=True;TrustServerCertificate=True;",
                project_name
            ),
        }
    }
}

impl OrmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            OrmProvider::SqlSugar => "SqlSugar",
            OrmProvider::EfCore => "EFCore",
            OrmProvider::Dapper => "Dapper",
            OrmProvider::FreeSql => "FreeSql",
        }
    }
}

impl CacheProvider {
    pub fn name(&self) -> &'static str {
        match self {
            CacheProvider::None => "None",
            CacheProvider::MemoryCache => "MemoryCache",
            CacheProvider::Redis => "Redis",
        }
    }
}

impl RouterMode {
    pub fn name(&self) -> &'static str {
        match self {
            RouterMode::Hash => "Hash",
            RouterMode::History => "History",
        }
    }
}

/// Project identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicOptions {
    pub project_name: String,
    pub namespace: String,
}

impl Default for BasicOptions {
    fn default() -> Self {
        Self {
            project_name: "MyApp".to_string(),
            namespace: "MyApp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendOptions {
    pub architecture: ArchitectureStyle,
    pub orm: OrmProvider,
    pub database: DatabaseProvider,
    pub cache: CacheProvider,
    pub swagger: bool,
    pub jwt_auth: bool,
    pub unit_test_framework: BackendUnitTestFramework,
    pub integration_test_framework: BackendIntegrationTestFramework,
    /// Extra NuGet packages chosen by the user
    pub nuget_packages: Vec<PackageReference>,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            architecture: ArchitectureStyle::default(),
            orm: OrmProvider::default(),
            database: DatabaseProvider::default(),
            cache: CacheProvider::default(),
            swagger: true,
            jwt_auth: true,
            unit_test_framework: BackendUnitTestFramework::default(),
            integration_test_framework: BackendIntegrationTestFramework::default(),
            nuget_packages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrontendOptions {
    pub ui_library: UiLibrary,
    pub router_mode: RouterMode,
    pub mock_data: bool,
    pub unit_test_framework: FrontendUnitTestFramework,
    #[serde(rename = "e2eFramework")]
    pub e2e_framework: FrontendE2eFramework,
    /// Extra npm packages chosen by the user
    pub npm_packages: Vec<PackageReference>,
}

/// Full scaffold configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub basic: BasicOptions,
    #[serde(default)]
    pub backend: BackendOptions,
    #[serde(default)]
    pub frontend: FrontendOptions,
}

impl Configuration {
    /// Configuration with every optional feature switched off
    pub fn minimal(project_name: &str) -> Self {
        Self {
            basic: BasicOptions {
                project_name: project_name.to_string(),
                namespace: project_name.to_string(),
            },
            backend: BackendOptions {
                swagger: false,
                jwt_auth: false,
                ..Default::default()
            },
            frontend: FrontendOptions::default(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.basic.project_name
    }

    /// Root of the generated API project, e.g. `src/MyApp.Api`
    pub fn api_root(&self) -> String {
        format!("src/{}.Api", self.basic.project_name)
    }

    /// Root of the generated web project, e.g. `src/MyApp.Web`
    pub fn web_root(&self) -> String {
        format!("src/{}.Web", self.basic.project_name)
    }

    /// User-chosen packages for an ecosystem
    pub fn user_packages(&self, ecosystem: Ecosystem) -> &[PackageReference] {
        match ecosystem {
            Ecosystem::NuGet => &self.backend.nuget_packages,
            Ecosystem::Npm => &self.frontend.npm_packages,
        }
    }

    pub fn user_packages_mut(&mut self, ecosystem: Ecosystem) -> &mut Vec<PackageReference> {
        match ecosystem {
            Ecosystem::NuGet => &mut self.backend.nuget_packages,
            Ecosystem::Npm => &mut self.frontend.npm_packages,
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse configuration YAML")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse configuration JSON")
    }

    /// Load a configuration file; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("Invalid configuration in {}", path.display()))
    }
}
