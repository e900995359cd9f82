use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigOverrides, SplitConfig, CONFIG_FILE_NAME};
use crate::splitter::{self, PrefixMatch, Splitter, Stats};
use crate::ui::Reporter;

#[derive(Parser, Debug)]
#[command(name = "projsplit")]
#[command(version, about = "Concatenate backend and frontend sources into two text files", long_about = None)]
pub struct Args {
    /// Project root (must contain package.json)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Path prefix routed to the backend output
    #[arg(long, value_name = "PREFIX")]
    pub backend_prefix: Option<String>,

    /// Path prefix routed to the frontend output
    #[arg(long, value_name = "PREFIX")]
    pub frontend_prefix: Option<String>,

    /// Backend output file (default: backend_all.txt)
    #[arg(long, value_name = "FILE")]
    pub backend_output: Option<PathBuf>,

    /// Frontend output file (default: frontend_all.txt)
    #[arg(long, value_name = "FILE")]
    pub frontend_output: Option<PathBuf>,

    /// Directory names never descended into (replaces the defaults)
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// How routing prefixes are matched
    #[arg(long, value_enum)]
    pub prefix_match: Option<PrefixMatch>,

    /// Follow symbolic links to directories
    #[arg(long)]
    pub follow_links: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "PROJSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write run statistics as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Dry run (show what would be done)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (suppress output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Destination (default: ./projsplit.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the project root and show the resolved configuration and routing
    Check,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            exclude_dirs: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            backend_prefix: self.backend_prefix.clone(),
            frontend_prefix: self.frontend_prefix.clone(),
            backend_output: self.backend_output.clone(),
            frontend_output: self.frontend_output.clone(),
            prefix_match: self.prefix_match,
            follow_links: self.follow_links,
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Initialize `env_logger`; `RUST_LOG` takes precedence over the flags.
pub fn init_logging(args: &Args) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();
}

pub fn run(args: Args) -> Result<()> {
    match &args.command {
        Some(Commands::Init { path, force }) => {
            let path = path.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            init_config(&path, *force, args.quiet)
        }
        Some(Commands::Check) => {
            let config = load_config(&args)?;
            check_project(&config, args.quiet)
        }
        None => {
            let config = load_config(&args)?;
            split_project(&config, &args)
        }
    }
}

/// Build the run configuration: validated root, config file, then CLI overrides.
pub fn load_config(args: &Args) -> Result<SplitConfig> {
    // The marker may be overridden by the config file, so validate after loading.
    let mut config = SplitConfig::resolve(&args.root, args.config.as_deref())?;
    config.apply(args.overrides());
    config.root = splitter::validate_root(&config.root, &config.marker_file)?;

    if same_path(&config.backend_output, &config.frontend_output)? {
        bail!(
            "Backend and frontend outputs both resolve to {}",
            config.backend_output.display()
        );
    }
    Ok(config)
}

/// Compare two output paths, resolving relative ones against the working directory.
fn same_path(a: &Path, b: &Path) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| cwd.join(p));
    Ok(resolve(a) == resolve(b))
}

fn init_config(path: &Path, force: bool, quiet: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let content = SplitConfig::default().to_toml()?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if !quiet {
        println!("✓ Wrote default configuration to {}", path.display());
    }
    Ok(())
}

fn check_project(config: &SplitConfig, quiet: bool) -> Result<()> {
    let reporter = Reporter::new(quiet);
    reporter.root(&config.root);

    let stats = Splitter::new(config).dry_run()?;
    if !quiet {
        println!("\nResolved configuration:\n{}", config.to_toml()?);
    }
    reporter.plan(&stats);
    Ok(())
}

fn split_project(config: &SplitConfig, args: &Args) -> Result<()> {
    let reporter = Reporter::new(args.quiet);
    reporter.root(&config.root);

    if args.dry_run {
        let stats = Splitter::new(config).dry_run()?;
        reporter.plan(&stats);
        return write_report(args.report.as_deref(), &stats);
    }

    let spinner = reporter.spinner();
    let result = Splitter::new(config).with_progress(spinner.clone()).run();
    spinner.finish_and_clear();
    let stats = result?;

    info!(
        "Split {} files ({} backend, {} frontend)",
        stats.routed(),
        stats.backend.files,
        stats.frontend.files
    );
    reporter.completed(&config.backend_output, &config.frontend_output);
    reporter.summary(&stats);

    write_report(args.report.as_deref(), &stats)
}

fn write_report(path: Option<&Path>, stats: &Stats) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let json = serde_json::to_string_pretty(stats).context("Failed to serialize statistics")?;
    fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
    info!("Wrote report to {}", path.display());
    Ok(())
}
