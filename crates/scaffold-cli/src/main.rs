//! scaffold CLI - compose, preview and generate full-stack project scaffolds

mod commands;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use scaffold_engine::logging::{init_logging, LoggingConfig};
use scaffold_engine::{presets, Configuration, Ecosystem, EngineSettings, ScaffoldError};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Compose, preview and generate ASP.NET Core + Vue project scaffolds")]
#[command(version)]
pub struct Args {
    /// Local directory whose templates override the built-in ones
    #[arg(long = "template-dir", global = true)]
    pub template_dir: Option<PathBuf>,

    /// Engine settings file (YAML)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Show debug logs and full error detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the built-in presets
    Presets,
    /// Print the planned file tree
    Tree(TreeArgs),
    /// Print the content of one planned file
    Preview(PreviewArgs),
    /// Write the rendered project to a directory or zip archive
    Generate(GenerateArgs),
    /// Add a package to a configuration file
    Add(AddArgs),
    /// Follow a configuration file and reprint the preview on every change
    Watch(WatchArgs),
    /// Build a configuration file interactively
    Init(InitArgs),
}

/// Where the configuration comes from. Defaults to the default preset.
#[derive(ClapArgs, Debug, Clone)]
pub struct SourceArgs {
    /// Configuration file (.json, or YAML otherwise)
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in preset id
    #[arg(short, long)]
    pub preset: Option<String>,
}

impl SourceArgs {
    pub fn load(&self) -> Result<Configuration> {
        if let Some(path) = &self.config {
            return Configuration::load(path);
        }
        match &self.preset {
            Some(id) => match presets::find(id) {
                Some(preset) => Ok(preset.config),
                None => {
                    let available: Vec<&str> = presets::all().iter().map(|p| p.id).collect();
                    anyhow::bail!(
                        "Preset '{}' not found. Available presets: {}",
                        id,
                        available.join(", ")
                    )
                }
            },
            None => Ok(presets::default_preset().config),
        }
    }
}

#[derive(Parser, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output path of the file (case-insensitive)
    pub path: String,

    /// Print the preview as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Target directory (defaults to ./<project name>)
    #[arg(short, long, conflicts_with = "zip")]
    pub output: Option<PathBuf>,

    /// Write a zip archive instead of a directory
    #[arg(long)]
    pub zip: Option<PathBuf>,

    /// Write into a non-empty directory
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum EcosystemArg {
    Nuget,
    Npm,
}

impl From<EcosystemArg> for Ecosystem {
    fn from(arg: EcosystemArg) -> Self {
        match arg {
            EcosystemArg::Nuget => Ecosystem::NuGet,
            EcosystemArg::Npm => Ecosystem::Npm,
        }
    }
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Configuration file to update
    #[arg(short, long)]
    pub config: PathBuf,

    /// Package ecosystem
    #[arg(value_enum)]
    pub ecosystem: EcosystemArg,

    /// Package name
    pub name: String,

    /// Package version
    #[arg(long = "pkg-version", default_value = scaffold_engine::plan::WILDCARD_VERSION)]
    pub version: String,

    /// Development-only dependency
    #[arg(long)]
    pub dev: bool,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Configuration file to follow
    #[arg(short, long)]
    pub config: PathBuf,

    /// File to keep selected across changes
    #[arg(short, long)]
    pub select: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(short, long, default_value = "scaffold.yaml")]
    pub output: PathBuf,

    /// Accept preset values without prompting for each option
    #[arg(short, long)]
    pub yes: bool,
}

fn load_settings(args: &Args) -> Result<EngineSettings> {
    let mut settings = EngineSettings::load(args.settings.as_deref())?;
    if let Some(dir) = &args.template_dir {
        settings.template_dir = Some(dir.clone());
    }
    Ok(settings)
}

/// End-user text for an error, unless full detail was asked for
fn report(error: &anyhow::Error, verbose: bool) -> String {
    if verbose {
        return format!("{:?}", error);
    }
    match error.chain().find_map(|cause| cause.downcast_ref::<ScaffoldError>()) {
        Some(engine_error) => engine_error.user_message().to_string(),
        None => format!("{:#}", error),
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;

    match args.command {
        Command::Presets => commands::list_presets(),
        Command::Tree(tree_args) => {
            let service = settings.preview_service()?;
            commands::print_tree(&service, &tree_args.source.load()?, tree_args.json)
        }
        Command::Preview(preview_args) => {
            let service = settings.preview_service()?;
            let config = preview_args.source.load()?;
            commands::print_preview(&service, &config, &preview_args.path, preview_args.json)
        }
        Command::Generate(generate_args) => {
            let service = settings.preview_service()?;
            let config = generate_args.source.load()?;
            commands::generate(&service, &config, &generate_args)
        }
        Command::Add(add_args) => {
            let service = settings.preview_service()?;
            commands::add_dependency(&service, &add_args)
        }
        Command::Watch(watch_args) => {
            let service = settings.preview_service()?;
            commands::watch(service, settings.debounce(), &watch_args).await
        }
        #[cfg(feature = "tui")]
        Command::Init(init_args) => {
            let service = settings.preview_service()?;
            let result = tui::run(&service, &init_args);

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        #[cfg(not(feature = "tui"))]
        Command::Init(_) => {
            anyhow::bail!("This build of scaffold has no interactive prompts (feature `tui`)")
        }
    }
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let verbose = args.verbose;
    let logging = if verbose {
        LoggingConfig::with_level(Level::DEBUG)
    } else {
        LoggingConfig::from_env()
    };
    init_logging(logging);

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "error:".red().bold(), report(&e, verbose));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_source_defaults_to_default_preset() {
        let source = SourceArgs {
            config: None,
            preset: None,
        };
        assert_eq!(source.load().unwrap(), presets::default_preset().config);
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let source = SourceArgs {
            config: None,
            preset: Some("huge".to_string()),
        };
        let message = source.load().unwrap_err().to_string();
        assert!(message.contains("huge"));
        assert!(message.contains("minimal"));
    }

    #[test]
    fn test_report_hides_engine_detail() {
        let error = anyhow::Error::new(ScaffoldError::TemplateNotFound {
            template_id: "backend/Program.cs.jinja".to_string(),
        });
        assert!(!report(&error, false).contains("Program.cs"));
        assert!(report(&error, true).contains("Program.cs"));
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        let parsed = Args::try_parse_from(["scaffold", "tree", "--config", "a.yaml", "--preset", "minimal"]);
        assert!(parsed.is_err());
    }
}
