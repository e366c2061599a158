// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML region codec CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gdml_regions::cli::{round_trip_file, Reporter};
use gdml_regions::config::CONFIG_FILE;
use gdml_regions::io::{export_into_gdml_file, export_userinfo_file};
use gdml_regions::{import_gdml_file, CodecConfig, StoreManifest};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gdml-regions")]
#[command(about = "Read and write GDML region metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to gdml-regions.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the regions of a GDML file
    Import {
        /// Input GDML file
        input: PathBuf,

        /// Keep reference suffixes on names
        #[arg(long)]
        no_strip: bool,

        /// Write the imported store as a JSON manifest
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Export the regions of a manifest
    Export {
        /// Input manifest (.toml or .json)
        manifest: PathBuf,

        /// Output userinfo fragment
        #[arg(short, long, conflicts_with = "into")]
        output: Option<PathBuf>,

        /// Replace the regions of an existing GDML file
        #[arg(long, value_name = "GDML")]
        into: Option<PathBuf>,

        /// Write names without reference suffixes
        #[arg(long)]
        no_references: bool,
    },

    /// Export then re-import a manifest's regions and compare
    Roundtrip {
        /// Input manifest(s)
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to a file instead
        #[arg(long, value_name = "FILE")]
        write: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Import { input, no_strip, json } => {
            import_command(&input, no_strip, json.as_deref(), config, cli.verbose)
        }
        Commands::Export {
            manifest,
            output,
            into,
            no_references,
        } => export_command(
            &manifest,
            output.as_deref(),
            into.as_deref(),
            no_references,
            config,
        ),
        Commands::Roundtrip { manifests } => roundtrip_command(&manifests, &config, cli.verbose),
        Commands::Config { write } => config_command(&config, write.as_deref()),
        Commands::Version => {
            println!("gdml-regions v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CodecConfig> {
    match path {
        Some(path) => {
            let mut config = CodecConfig::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => CodecConfig::load(),
    }
}

fn import_command(
    input: &Path,
    no_strip: bool,
    json: Option<&Path>,
    mut config: CodecConfig,
    verbose: bool,
) -> Result<()> {
    if no_strip {
        config.strip_names = false;
    }
    if verbose {
        Reporter::progress(&format!("Importing {}", input.display()));
    }

    let (store, report) = import_gdml_file(input, &config)?;
    Reporter::report_import(&input.display().to_string(), &report, &store);

    if let Some(path) = json {
        let manifest = StoreManifest::from_store(&store);
        let content = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        Reporter::success(&format!("Manifest written to {}", path.display()));
    }

    Ok(())
}

fn export_command(
    manifest: &Path,
    output: Option<&Path>,
    into: Option<&Path>,
    no_references: bool,
    mut config: CodecConfig,
) -> Result<()> {
    if no_references {
        config.store_references = false;
    }

    let store = StoreManifest::from_file(manifest)
        .with_context(|| format!("Failed to load manifest: {}", manifest.display()))?
        .build_store()?;

    match (output, into) {
        (_, Some(gdml)) => {
            export_into_gdml_file(&store, gdml, &config)?;
            Reporter::success(&format!(
                "Exported {} region(s) into {}",
                store.regions().len(),
                gdml.display()
            ));
        }
        (Some(path), None) => {
            export_userinfo_file(&store, path, &config)?;
            Reporter::success(&format!(
                "Exported {} region(s) to {}",
                store.regions().len(),
                path.display()
            ));
        }
        (None, None) => {
            let tree = gdml_regions::io::export_region_tree(&store, &config);
            println!("{}", gdml_regions::write_userinfo(&tree, config.pretty_xml)?);
        }
    }

    Ok(())
}

fn roundtrip_command(manifests: &[PathBuf], config: &CodecConfig, verbose: bool) -> Result<()> {
    let mut failed = 0;
    for path in manifests {
        let result = round_trip_file(path, config, verbose)?;
        Reporter::report_round_trip(&path.display().to_string(), &result);
        if !result.passed {
            failed += 1;
        }
    }

    if failed > 0 {
        Reporter::report_warning(&format!("{} of {} manifest(s) failed", failed, manifests.len()));
        std::process::exit(1);
    }
    Ok(())
}

fn config_command(config: &CodecConfig, write: Option<&Path>) -> Result<()> {
    match write {
        Some(path) => {
            config.save(path)?;
            Reporter::success(&format!("Configuration written to {}", path.display()));
        }
        None => {
            Reporter::report_info(&format!("Effective configuration (file: {})", CONFIG_FILE));
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}
