use crate::{AddArgs, GenerateArgs, WatchArgs};
use anyhow::{Context, Result};
use colored::Colorize;
use scaffold_engine::archive::write_zip;
use scaffold_engine::tree::{files_named, find_by_path, flatten};
use scaffold_engine::{
    presets, Configuration, DebounceSettings, DependencyProposal, PackageReference, PreviewService,
    PreviewSession, PreviewedFile, SessionEvent, TreeNode,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const WATCH_INTERVAL: Duration = Duration::from_millis(500);

pub fn list_presets() -> Result<()> {
    for preset in presets::all() {
        let marker = if preset.is_default { " (default)" } else { "" };
        println!(
            "{}{}  {}",
            preset.id.cyan().bold(),
            marker.dimmed(),
            preset.description
        );
        if !preset.tags.is_empty() {
            println!("    {}", preset.tags.join(", ").dimmed());
        }
    }
    Ok(())
}

fn render_tree(nodes: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let name = if node.is_directory {
            node.name.blue().bold().to_string()
        } else {
            node.name.clone()
        };
        lines.push(format!("{}{}{}", prefix, branch, name));
        if node.is_directory {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            render_tree(node.children(), &child_prefix, lines);
        }
    }
}

pub fn print_tree(service: &PreviewService, config: &Configuration, json: bool) -> Result<()> {
    let tree = service.preview_tree(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!("{}", config.project_name().bold());
    let mut lines = Vec::new();
    render_tree(&tree, "", &mut lines);
    for line in lines {
        println!("{}", line);
    }
    println!();
    println!("{} files", flatten(&tree).len());
    Ok(())
}

fn print_file(file: &PreviewedFile) {
    let kind = if file.is_template { "template" } else { "static" };
    println!(
        "{} {}",
        file.output_path.green().bold(),
        format!("({}, {})", file.language, kind).dimmed()
    );
    println!("{}", file.content);
}

pub fn print_preview(
    service: &PreviewService,
    config: &Configuration,
    path: &str,
    json: bool,
) -> Result<()> {
    let Some(file) = service.preview_file(config, path)? else {
        anyhow::bail!("No planned file matches '{}'", path);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        print_file(&file);
    }
    Ok(())
}

fn ensure_writable(dir: &Path, force: bool) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    if entries.next().is_some() && !force {
        anyhow::bail!(
            "Directory {} is not empty. Use --force to write into it.",
            dir.display()
        );
    }
    Ok(())
}

pub fn generate(service: &PreviewService, config: &Configuration, args: &GenerateArgs) -> Result<()> {
    let output = service.render(config)?;

    if let Some(zip_path) = &args.zip {
        let bytes = write_zip(config.project_name(), &output)?;
        std::fs::write(zip_path, &bytes)
            .with_context(|| format!("Failed to write {}", zip_path.display()))?;
        println!(
            "{} {} files into {} ({} bytes)",
            "Packed".green().bold(),
            output.len(),
            zip_path.display(),
            bytes.len()
        );
        return Ok(());
    }

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.project_name()));
    ensure_writable(&target, args.force)?;

    for (path, content) in &output {
        let file_path = target.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&file_path, content)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
        debug!(path = %file_path.display(), "Wrote file");
    }

    println!(
        "{} {} files in {}",
        "Created".green().bold(),
        output.len(),
        target.display()
    );
    Ok(())
}

/// Write `config` back in the format its extension implies
pub fn save_config(config: &Configuration, path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(config)?
    } else {
        serde_yaml::to_string(config)?
    };
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn add_dependency(service: &PreviewService, args: &AddArgs) -> Result<()> {
    let config = Configuration::load(&args.config)?;
    let mut reference = PackageReference::new(&args.name, &args.version);
    if args.dev {
        reference = reference.dev();
    }

    match service.propose_dependency(&config, args.ecosystem.into(), reference)? {
        DependencyProposal::Accepted(updated) => {
            save_config(&updated, &args.config)?;
            println!(
                "{} {} to {}",
                "Added".green().bold(),
                args.name,
                args.config.display()
            );
            Ok(())
        }
        DependencyProposal::Rejected { warning } => {
            println!("{} {}", "warning:".yellow().bold(), warning);
            Ok(())
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Node for `path`: exact path first, then a unique file with that name
fn locate<'a>(tree: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    if let Some(node) = find_by_path(tree, path) {
        return Some(node);
    }
    match files_named(tree, path).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::TreeUpdated(tree) => {
            println!("{} {} files", "tree".cyan().bold(), flatten(tree).len());
        }
        SessionEvent::SelectionMoved { from, to } => {
            println!("{} {} -> {}", "moved".cyan().bold(), from, to);
        }
        SessionEvent::SelectionCleared { previous } => {
            println!("{} {} is no longer planned", "cleared".yellow().bold(), previous);
        }
        SessionEvent::ContentShown(file) => {
            println!();
            print_file(file);
        }
        SessionEvent::ContentCleared => {
            println!("{}", "(no file selected)".dimmed());
        }
        SessionEvent::DependencyAccepted { ecosystem, name } => {
            println!("{} {} package {}", "added".green().bold(), ecosystem, name);
        }
        SessionEvent::DependencyRejected { warning } => {
            println!("{} {}", "warning:".yellow().bold(), warning);
        }
        SessionEvent::Failed { message } => {
            println!("{} {}", "error:".red().bold(), message);
        }
    }
}

/// Follow the configuration file until interrupted or the file is removed
pub async fn watch(service: PreviewService, debounce: DebounceSettings, args: &WatchArgs) -> Result<()> {
    let config = Configuration::load(&args.config)?;
    let (handle, mut events, task) = PreviewSession::spawn(Arc::new(service), config, debounce);

    println!(
        "{} {} (Ctrl+C or delete the file to stop)",
        "Watching".green().bold(),
        args.config.display()
    );

    let mut pending_selection = args.select.clone();
    let mut last_modified = modified_at(&args.config);
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let SessionEvent::TreeUpdated(tree) = &event {
                    if let Some(wanted) = pending_selection.take() {
                        match locate(tree, &wanted) {
                            Some(node) => {
                                handle.select(node.clone());
                            }
                            None => println!("{} '{}' is not a planned file", "warning:".yellow().bold(), wanted),
                        }
                    }
                }
                print_event(&event);
            }
            _ = ticker.tick() => {
                if !args.config.exists() {
                    println!("{} {} was removed", "Stopped".yellow().bold(), args.config.display());
                    break;
                }
                let modified = modified_at(&args.config);
                if modified == last_modified {
                    continue;
                }
                last_modified = modified;
                match Configuration::load(&args.config) {
                    Ok(config) => {
                        debug!("Configuration changed");
                        handle.edit(config);
                    }
                    Err(e) => warn!(error = %format!("{:#}", e), "Ignoring unreadable configuration"),
                }
            }
        }
    }

    // Closing the command channel ends the session
    drop(handle);
    task.await.context("Preview session crashed")?;
    Ok(())
}
