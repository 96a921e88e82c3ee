//! Module Bundler CLI
//!
//! Loads a root project, merges every project it depends on into it and
//! saves the self-contained result.
//!
//! ## Configuration
//!
//! Options come from an optional TOML file (`--config` or
//! `MODULE_BUNDLER_CONFIG`), then command-line flags override them.
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: module_bundler=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for humans (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli --bin module-bundler -- app.json bundled.json --use-source true
//! ```
//!
//! Dependency locators resolve relative to the source project's directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use module_bundler::{BundleOptions, JsonFileStore, ModuleBundler, ProjectStore};

#[derive(Parser)]
#[command(name = "module-bundler")]
#[command(about = "Merge a project and all of its project dependencies into one project")]
struct Cli {
    /// Project to pull all references from and merge into
    source: PathBuf,
    /// Path of the bundled result (the directory must exist)
    target: PathBuf,
    /// TOML options file
    #[arg(long, env = "MODULE_BUNDLER_CONFIG")]
    config: Option<PathBuf>,
    /// Follow each dependency's own project references until none are left
    #[arg(long, value_name = "BOOL")]
    recurse: Option<bool>,
    /// Settle every module conflict in favour of the dependency
    #[arg(long, value_name = "BOOL")]
    use_source: Option<bool>,
    /// Only merge dependency modules that some other module mentions
    #[arg(long, value_name = "BOOL")]
    only_merge_used: Option<bool>,
    /// Fail on dependency cycles instead of recursing forever
    #[arg(long)]
    detect_cycles: bool,
    /// Write the bundle manifest here instead of stdout
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Result<BundleOptions> {
        let mut options = match &self.config {
            Some(path) => BundleOptions::load(path)?,
            None => BundleOptions::default(),
        };
        if let Some(recurse) = self.recurse {
            options.recurse_references = recurse;
        }
        if let Some(use_source) = self.use_source {
            options.always_use_source = use_source;
        }
        if let Some(only_merge_used) = self.only_merge_used {
            options.only_merge_used = only_merge_used;
        }
        if self.detect_cycles {
            options.detect_cycles = true;
        }
        Ok(options)
    }
}

/// Initialize the tracing subscriber with JSON or pretty format on stderr.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "module_bundler=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn split_source(source: &Path) -> Result<(PathBuf, String)> {
    let base = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let locator = source
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Source \"{}\" has no usable file name", source.display()))?
        .to_string();
    Ok((base, locator))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.source.to_string_lossy().to_lowercase() == cli.target.to_string_lossy().to_lowercase() {
        bail!("Source and target cannot be the same file");
    }

    let options = cli.options()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %cli.source.display(),
        target = %cli.target.display(),
        options = ?options,
        "Starting bundle"
    );

    let (base_dir, locator) = split_source(&cli.source)?;
    let mut bundler = ModuleBundler::new(JsonFileStore::with_base_dir(base_dir), options);
    let (project, manifest) = bundler
        .bundle_locator(&locator)
        .with_context(|| format!("Failed to bundle \"{}\"", cli.source.display()))?;

    let target = cli.target.to_string_lossy().into_owned();
    JsonFileStore::new().save(&project, &target)?;
    info!(path = %cli.target.display(), "File saved");

    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    match &cli.manifest {
        Some(path) => std::fs::write(path, manifest_json)
            .with_context(|| format!("Failed to write manifest \"{}\"", path.display()))?,
        None => println!("{manifest_json}"),
    }

    Ok(())
}
