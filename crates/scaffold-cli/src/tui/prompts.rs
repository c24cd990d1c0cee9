//! Charm-style configuration prompts using cliclack

use crate::commands::save_config;
use crate::InitArgs;
use anyhow::Result;
use scaffold_engine::config::{
    ArchitectureStyle, BackendIntegrationTestFramework, BackendOptions, BackendUnitTestFramework,
    BasicOptions, CacheProvider, DatabaseProvider, FrontendE2eFramework, FrontendOptions,
    FrontendUnitTestFramework, OrmProvider, RouterMode, UiLibrary,
};
use scaffold_engine::tree::flatten;
use scaffold_engine::{presets, Configuration, PreviewService};
use std::path::Path;

/// Run the wizard and write the resulting configuration to `args.output`
pub fn run(service: &PreviewService, args: &InitArgs) -> Result<()> {
    cliclack::intro("scaffold")?;

    // Step 1: Start from a preset
    let mut config = select_preset()?;

    // Step 2: Project identity
    config.basic = prompt_identity()?;

    // Step 3: Per-option choices
    if args.yes {
        cliclack::log::info("Using preset values for every option")?;
    } else {
        prompt_backend(&mut config.backend)?;
        prompt_frontend(&mut config.frontend)?;
    }

    // Step 4: Compose once so a broken combination fails here, not at generate time
    summarize(service, &config)?;

    // Step 5: Write
    write_config(&config, &args.output, args.yes)?;

    print_next_steps(&args.output)?;
    Ok(())
}

fn select_preset() -> Result<Configuration> {
    let all = presets::all();
    let default_idx = all.iter().position(|p| p.is_default).unwrap_or(0);

    // use indices to avoid borrow issues
    let mut select = cliclack::select("Start from a preset");
    for (idx, preset) in all.iter().enumerate() {
        select = select.item(idx, preset.name, preset.description);
    }
    let selected_idx: usize = select.initial_value(default_idx).interact()?;

    Ok(all
        .into_iter()
        .nth(selected_idx)
        .map(|preset| preset.config)
        .unwrap_or_default())
}

fn validate_identifier(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("A name is required")
    } else if !input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
    {
        Err("Use letters, digits, dots and underscores only")
    } else {
        Ok(())
    }
}

fn prompt_identity() -> Result<BasicOptions> {
    let defaults = BasicOptions::default();
    let project_name: String = cliclack::input("Project name")
        .placeholder(&defaults.project_name)
        .default_input(&defaults.project_name)
        .validate(|input: &String| validate_identifier(input))
        .interact()?;
    let namespace: String = cliclack::input("Root namespace")
        .default_input(&project_name)
        .validate(|input: &String| validate_identifier(input))
        .interact()?;
    Ok(BasicOptions {
        project_name,
        namespace,
    })
}

fn prompt_backend(backend: &mut BackendOptions) -> Result<()> {
    backend.architecture = cliclack::select("Backend architecture")
        .item(ArchitectureStyle::Simple, "Simple", "single API project")
        .item(
            ArchitectureStyle::CleanArchitecture,
            "Clean Architecture",
            "Domain, Application and Infrastructure projects",
        )
        .item(ArchitectureStyle::VerticalSlice, "Vertical Slice", "feature folders")
        .item(ArchitectureStyle::ModularMonolith, "Modular Monolith", "module projects")
        .initial_value(backend.architecture)
        .interact()?;

    backend.orm = cliclack::select("Data access")
        .item(OrmProvider::SqlSugar, "SqlSugar", "")
        .item(OrmProvider::EfCore, "EF Core", "")
        .item(OrmProvider::Dapper, "Dapper", "")
        .item(OrmProvider::FreeSql, "FreeSql", "")
        .initial_value(backend.orm)
        .interact()?;

    backend.database = cliclack::select("Database")
        .item(DatabaseProvider::Sqlite, "SQLite", "")
        .item(DatabaseProvider::MySql, "MySQL", "")
        .item(DatabaseProvider::SqlServer, "SQL Server", "")
        .initial_value(backend.database)
        .interact()?;

    backend.cache = cliclack::select("Cache")
        .item(CacheProvider::None, "None", "")
        .item(CacheProvider::MemoryCache, "In-memory", "IMemoryCache")
        .item(CacheProvider::Redis, "Redis", "StackExchange.Redis")
        .initial_value(backend.cache)
        .interact()?;

    backend.jwt_auth = cliclack::confirm("Enable JWT authentication?")
        .initial_value(backend.jwt_auth)
        .interact()?;
    backend.swagger = cliclack::confirm("Enable Swagger API docs?")
        .initial_value(backend.swagger)
        .interact()?;

    backend.unit_test_framework = cliclack::select("Backend unit tests")
        .item(BackendUnitTestFramework::None, "None", "")
        .item(BackendUnitTestFramework::XUnit, "xUnit", "")
        .item(BackendUnitTestFramework::NUnit, "NUnit", "")
        .item(BackendUnitTestFramework::MsTest, "MSTest", "")
        .initial_value(backend.unit_test_framework)
        .interact()?;

    let integration: bool = cliclack::confirm("Add an integration test project?")
        .initial_value(backend.integration_test_framework != BackendIntegrationTestFramework::None)
        .interact()?;
    backend.integration_test_framework = if integration {
        BackendIntegrationTestFramework::XUnit
    } else {
        BackendIntegrationTestFramework::None
    };
    Ok(())
}

fn prompt_frontend(frontend: &mut FrontendOptions) -> Result<()> {
    frontend.ui_library = cliclack::select("UI library")
        .item(UiLibrary::ElementPlus, "Element Plus", "")
        .item(UiLibrary::AntDesignVue, "Ant Design Vue", "")
        .item(UiLibrary::NaiveUi, "Naive UI", "")
        .item(UiLibrary::TailwindHeadless, "Tailwind + Headless UI", "")
        .item(UiLibrary::ShadcnVue, "shadcn-vue", "")
        .item(UiLibrary::MateChat, "MateChat", "chat layout")
        .initial_value(frontend.ui_library)
        .interact()?;

    frontend.router_mode = cliclack::select("Router history")
        .item(RouterMode::Hash, "Hash", "/#/path")
        .item(RouterMode::History, "History", "needs server fallback")
        .initial_value(frontend.router_mode)
        .interact()?;

    frontend.mock_data = cliclack::confirm("Include mock API data?")
        .initial_value(frontend.mock_data)
        .interact()?;

    let vitest: bool = cliclack::confirm("Add Vitest unit tests?")
        .initial_value(frontend.unit_test_framework == FrontendUnitTestFramework::Vitest)
        .interact()?;
    frontend.unit_test_framework = if vitest {
        FrontendUnitTestFramework::Vitest
    } else {
        FrontendUnitTestFramework::None
    };

    frontend.e2e_framework = cliclack::select("End-to-end tests")
        .item(FrontendE2eFramework::None, "None", "")
        .item(FrontendE2eFramework::Playwright, "Playwright", "")
        .item(FrontendE2eFramework::Cypress, "Cypress", "")
        .initial_value(frontend.e2e_framework)
        .interact()?;
    Ok(())
}

fn summarize(service: &PreviewService, config: &Configuration) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Composing project...");

    match service.preview_tree(config) {
        Ok(tree) => {
            spinner.stop(format!(
                "{} will contain {} files",
                config.project_name(),
                flatten(&tree).len()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Composition failed");
            cliclack::log::error(e.user_message())?;
            Err(e.into())
        }
    }
}

fn write_config(config: &Configuration, path: &Path, yes: bool) -> Result<()> {
    if path.exists() {
        cliclack::log::warning(format!("{} already exists", path.display()))?;

        // Auto-confirm with --yes flag
        let confirm = if yes {
            true
        } else {
            cliclack::confirm("Overwrite it?")
                .initial_value(false)
                .interact()?
        };

        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    save_config(config, path)?;
    cliclack::log::success(format!("Wrote {}", path.display()))?;
    Ok(())
}

fn print_next_steps(path: &Path) -> Result<()> {
    let steps = [
        format!("scaffold tree --config {}", path.display()),
        format!("scaffold watch --config {} --select README.md", path.display()),
        format!("scaffold generate --config {}", path.display()),
    ];

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
