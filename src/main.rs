//! Well-Cluster - spacing / volume clustering for workover candidate selection
//!
//! Loads a well table, classifies every well by drainage-area spacing and
//! cumulative volume per zone, and lets the operator browse or export the
//! resulting clusters.
//!
//! # Usage
//!
//! ```bash
//! # Cluster summary per zone
//! well-cluster --input dfx.csv classify
//!
//! # Clusters of one zone, then the wells of one cluster
//! well-cluster show --zone "Upper Sand"
//! well-cluster show --zone "Upper Sand" --cluster "less than 4 acres & less than 5 MSTB"
//!
//! # One CSV per zone plus a JSON summary
//! well-cluster export --output-dir results
//!
//! # Write the default configuration for editing
//! well-cluster init-config
//! ```
//!
//! # Environment Variables
//!
//! - `WELL_CLUSTER_CONFIG`: Path to the TOML configuration
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use well_cluster::config::{self, ClusterConfig};
use well_cluster::{ClassificationEngine, ClassificationReport, ClusterExporter, WellTable};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "well-cluster")]
#[command(about = "Well spacing and cumulative-volume clustering per zone")]
#[command(version)]
struct CliArgs {
    /// Path to the TOML configuration (overrides WELL_CLUSTER_CONFIG and ./cluster_config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Well table CSV (overrides input.path)
    #[arg(long, short)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Classify all zones and print the cluster summary
    Classify {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse zones, the clusters of a zone, or the wells of a cluster
    Show {
        /// Zone to inspect; lists all zones when omitted
        #[arg(long)]
        zone: Option<String>,

        /// Combined cluster label to list wells for (requires --zone)
        #[arg(long, requires = "zone")]
        cluster: Option<String>,
    },

    /// Write one CSV per zone plus a JSON run summary
    Export {
        /// Output directory (overrides export.output_dir)
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },

    /// Write the default configuration to a TOML file
    InitConfig {
        /// Destination path
        #[arg(long, short, default_value = "cluster_config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if let SubCommand::InitConfig { output, force } = &args.command {
        return init_config(output, *force);
    }

    let mut cfg = match &args.config {
        Some(path) => ClusterConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClusterConfig::load(),
    };
    if let Some(input) = &args.input {
        cfg.input.path.clone_from(input);
    }
    if let SubCommand::Export { output_dir: Some(dir) } = &args.command {
        cfg.export.output_dir.clone_from(dir);
    }
    config::init(cfg);
    let cfg = config::get();

    let table = WellTable::load(&cfg.input.path, &cfg.input)
        .with_context(|| format!("loading well table {}", cfg.input.path.display()))?;
    let engine = ClassificationEngine::from_config(cfg).context("building classification ranges")?;
    let report = engine.run(&table.wells);

    match args.command {
        SubCommand::Classify { json } => print_summary(&report, json),
        SubCommand::Show { zone, cluster } => show(&report, zone.as_deref(), cluster.as_deref()),
        SubCommand::Export { .. } => export(&table, &report),
        SubCommand::InitConfig { .. } => Ok(()),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn init_config(output: &std::path::Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }
    ClusterConfig::default()
        .save_to_file(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}

fn print_summary(report: &ClassificationReport, json: bool) -> Result<()> {
    let summary = report.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Classified {} wells in {} zone(s)", summary.total_wells, summary.zones.len());
    for zone in &summary.zones {
        println!();
        println!("Zone: {} ({} wells)", zone.zone, zone.wells);
        for c in &zone.clusters {
            println!("  {:>5}  {}", c.wells, c.label);
        }
    }
    if !summary.failures.is_empty() {
        println!();
        println!("Failed zones:");
        for f in &summary.failures {
            println!("  {}: {}", f.zone, f.error);
        }
    }
    Ok(())
}

fn show(report: &ClassificationReport, zone: Option<&str>, cluster: Option<&str>) -> Result<()> {
    let Some(zone_name) = zone else {
        for name in report.zone_names() {
            match report.zone(name) {
                Some(z) => println!("{name} ({} wells, {} clusters)", z.len(), z.clusters().len()),
                None => println!("{name} (failed)"),
            }
        }
        return Ok(());
    };

    if let Some(e) = report.errors().find(|e| e.zone == zone_name) {
        bail!("{e}");
    }
    let Some(z) = report.zone(zone_name) else {
        bail!(
            "unknown zone '{zone_name}', available: {}",
            report.zone_names().join(", ")
        );
    };

    let Some(label) = cluster else {
        for (label, count) in z.cluster_counts() {
            println!("{count:>5}  {label}");
        }
        return Ok(());
    };

    let wells: Vec<_> = z.cluster(label).collect();
    if wells.is_empty() {
        bail!("zone '{zone_name}' has no cluster '{label}'");
    }
    println!(
        "{:<16} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Well", "X", "Y", "Cum", "Nearest", "Acres"
    );
    for w in wells {
        println!(
            "{:<16} {:>12.1} {:>12.1} {:>12.2} {:>12.1} {:>10.2}",
            w.well.id, w.well.x, w.well.y, w.well.cum, w.spacing.nearest_distance, w.spacing.drainage_area_acres
        );
    }
    Ok(())
}

fn export(table: &WellTable, report: &ClassificationReport) -> Result<()> {
    let exporter = ClusterExporter::from_config(&config::get().export);
    let paths = exporter
        .export_report(&table.columns, report)
        .context("exporting zones")?;
    let summary_path = exporter
        .write_summary(&report.summary())
        .context("writing run summary")?;
    info!(files = paths.len(), summary = %summary_path.display(), "Export complete");
    if !report.is_complete() {
        warn!("Some zones failed and were not exported");
    }
    for p in &paths {
        println!("{}", p.display());
    }
    Ok(())
}
