//! Skilltree CLI - infer a skill profile from repository signals

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use skilltree_core::config::Config;
use skilltree_core::profile::SkillProfiler;
use skilltree_core::signal::RepoSignal;
use skilltree_core::skills::SkillMatcher;
use skilltree_core::taxonomy::{BUILTIN_SOURCE, Category, TaxonomyStore};
use skilltree_core::visualization::{NodeStyle, RenderOptions};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "skilltree")]
#[command(author, version, about = "Infer a technology skill tree from repository signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory holding taxonomy sources (overrides taxonomy.dir)
    #[arg(long, global = true)]
    taxonomy_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the full skill profile and its radial layout
    Infer {
        /// Repository JSON file (list of repos, {"repos": [...]}, or a signal object); `-` for stdin
        input: PathBuf,
        /// Taxonomy sources to load, in merge order (defaults to taxonomy.default_sources)
        #[arg(short, long = "source")]
        sources: Vec<String>,
        /// Label of the center node (defaults to profile.center_label)
        #[arg(short, long)]
        center: Option<String>,
        /// Use ASCII tree characters
        #[arg(long)]
        ascii: bool,
    },

    /// Show raw skill matches without hierarchy back-fill
    Match {
        /// Repository JSON file; `-` for stdin
        input: PathBuf,
        /// Taxonomy sources to load, in merge order
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },

    /// Inspect taxonomy sources
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TaxonomyAction {
    /// List available taxonomy sources
    List,
    /// Show the entries of one source
    Show {
        name: String,
        /// Only show entries of this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Merge sources and check every parent chain for cycles
    Check {
        /// Sources to check (defaults to taxonomy.default_sources)
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr
    let level = if cli.quiet { "warn" } else { "info" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["skilltree", "skilltree_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => {
                eprintln!("Error: invalid log directive: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Infer {
            input,
            sources,
            center,
            ascii,
        } => {
            let config = Config::load()?;
            let store = open_store(&config, cli.taxonomy_dir.as_deref())?;
            cmd_infer(&config, &store, &input, &sources, center, ascii, cli.format, cli.quiet).await
        }

        Commands::Match { input, sources } => {
            let config = Config::load()?;
            let store = open_store(&config, cli.taxonomy_dir.as_deref())?;
            cmd_match(&config, &store, &input, &sources, cli.format).await
        }

        Commands::Taxonomy { action } => {
            let config = Config::load()?;
            let store = open_store(&config, cli.taxonomy_dir.as_deref())?;
            cmd_taxonomy(&config, &store, action, cli.format, cli.quiet).await
        }

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

/// Print an error, with its code and a suggestion for core errors
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<skilltree_core::Error>() {
        Some(core) => {
            eprintln!("Error [{}]: {}", core.code(), core);
            if let Some(suggestion) = core.suggestion() {
                eprintln!("  Try: {}", suggestion);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

fn open_store(config: &Config, dir_override: Option<&Path>) -> anyhow::Result<TaxonomyStore> {
    let dir = match dir_override {
        Some(dir) => dir.to_path_buf(),
        None => config.taxonomy_dir()?,
    };
    debug!(dir = %dir.display(), "Using taxonomy directory");
    Ok(TaxonomyStore::from_dir(dir))
}

fn resolve_sources(config: &Config, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        config.taxonomy.default_sources.clone()
    } else {
        requested.to_vec()
    }
}

async fn read_signal(input: &Path) -> anyhow::Result<RepoSignal> {
    let contents = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read repositories from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read repository file: {}", input.display()))?
    };

    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Repository input is not valid JSON: {}", input.display()))?;
    Ok(RepoSignal::from_json(&value)?)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_infer(
    config: &Config,
    store: &TaxonomyStore,
    input: &Path,
    sources: &[String],
    center: Option<String>,
    ascii: bool,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let signal = read_signal(input).await?;
    if signal.is_empty() {
        warn!("Repository signal is empty, producing a minimal profile");
    }

    let sources = resolve_sources(config, sources);
    let mut profiler = SkillProfiler::from_config(config);
    if let Some(center) = center {
        profiler = profiler.with_center_label(center);
    }
    let profile = profiler.profile_from_store(store, &sources, &signal).await?;

    if format == OutputFormat::Json {
        return print_json(&profile);
    }

    let style = if ascii { NodeStyle::Ascii } else { NodeStyle::Unicode };
    let tree = profile.tree(RenderOptions::default().with_style(style));
    if quiet {
        print!("{}", tree.render());
        return Ok(());
    }

    print!("{}", tree.render_with_summary());
    println!();
    println!("By category:");
    for (category, skills) in profile.by_category() {
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        println!("  {:<14} {}", category.display_name(), names.join(", "));
    }
    println!();
    println!(
        "Layout: {} nodes, {} connections, {}x{} canvas",
        profile.layout.nodes.len(),
        profile.layout.connections.len(),
        profile.layout.width,
        profile.layout.height.ceil()
    );
    Ok(())
}

async fn cmd_match(
    config: &Config,
    store: &TaxonomyStore,
    input: &Path,
    sources: &[String],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let signal = read_signal(input).await?;
    let sources = resolve_sources(config, sources);
    let catalog = store.catalog(&sources).await?;
    let detected = SkillMatcher::new().detect(&signal, &catalog);

    if format == OutputFormat::Json {
        let skills: Vec<_> = detected.values().collect();
        return print_json(&skills);
    }

    if detected.is_empty() {
        println!("No skills detected.");
        return Ok(());
    }

    for skill in detected.values() {
        println!(
            "{:<24} {:<14} [{}] repos={}",
            skill.name,
            skill.category.as_str(),
            skill.level_bar('#', '-'),
            skill.repo_count
        );
    }
    Ok(())
}

async fn cmd_taxonomy(
    config: &Config,
    store: &TaxonomyStore,
    action: TaxonomyAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match action {
        TaxonomyAction::List => {
            let names = store.available_sources().await?;
            if format == OutputFormat::Json {
                return print_json(&names);
            }
            for name in names {
                if name == BUILTIN_SOURCE && !quiet {
                    println!("{} (built-in)", name);
                } else {
                    println!("{}", name);
                }
            }
        }
        TaxonomyAction::Show { name, category } => {
            let source = store.source(&name).await?;
            let filter = category.as_deref().map(Category::from_str);

            let mut entries: Vec<_> = source
                .entries
                .iter()
                .filter(|e| filter.is_none_or(|c| e.category == c))
                .collect();
            entries.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.key.cmp(&b.key)));

            if format == OutputFormat::Json {
                return print_json(&entries);
            }

            if !quiet {
                println!("Taxonomy '{}' ({} entries)", source.name, entries.len());
                let breakdown: Vec<_> = source
                    .category_counts()
                    .into_iter()
                    .map(|(category, count)| format!("{} {}", category.as_str(), count))
                    .collect();
                println!("Categories: {}", breakdown.join(", "));
                println!();
            }
            for entry in entries {
                let parent = entry.parent_key.as_deref().unwrap_or("-");
                println!(
                    "{:<20} {:<22} {:<14} {:<12} parent={:<16} weight={}",
                    entry.key,
                    entry.display_name,
                    entry.category.as_str(),
                    entry.metadata.difficulty.as_str(),
                    parent,
                    entry.weight
                );
            }
        }
        TaxonomyAction::Check { names } => {
            let sources = resolve_sources(config, &names);
            let catalog = store.catalog(&sources).await?;
            catalog.validate()?;

            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({
                    "ok": true,
                    "sources": catalog.sources(),
                    "entries": catalog.len(),
                }));
            }
            if !quiet {
                println!(
                    "Taxonomy OK: {} entries from {}",
                    catalog.len(),
                    catalog.sources().join(", ")
                );
            }
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod main_tests;
