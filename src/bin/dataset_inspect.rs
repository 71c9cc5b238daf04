//! Dataset Inspection Tool
//!
//! CLI tool to generate the synthetic trip dataset offline and inspect it:
//! schema-invariant and determinism checks, headline KPIs, summary
//! statistics, sample rows, or a full JSON export.
//!
//! Usage:
//!   cargo run --release --bin dataset_inspect -- --count 50000 --seed 42 verify
//!   cargo run --release --bin dataset_inspect -- kpi
//!   cargo run --release --bin dataset_inspect -- sample --count 5 --status cancelled
//!   cargo run --release --bin dataset_inspect -- export --output trips.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ridepulse_backend::analytics::{self, PageRequest, StatusFilter, TripFilter};
use ridepulse_backend::generator::{invariant_violations, Dataset, GeneratorConfig, TripGenerator};

/// Inspect the synthetic trip dataset without starting the server
#[derive(Parser, Debug)]
#[command(name = "dataset_inspect")]
#[command(about = "Generate and inspect the synthetic ride-hailing trip dataset")]
struct Cli {
    /// Number of trips to generate
    #[arg(long, default_value_t = 50_000)]
    count: usize,

    /// Generator seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check schema invariants and that regeneration is byte-identical
    Verify,

    /// Print the KPI summary as JSON
    Kpi,

    /// Print the summary statistics as JSON
    Stats,

    /// Print the newest trips matching the filters as JSON
    Sample {
        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Exact category name
        #[arg(long)]
        category: Option<String>,

        /// Pickup or dropoff zone
        #[arg(long)]
        zone: Option<String>,

        /// "completed" or "cancelled"
        #[arg(long)]
        status: Option<String>,
    },

    /// Write every trip to a JSON file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GeneratorConfig {
        record_count: cli.count,
        seed: cli.seed,
    };

    eprintln!("Generating {} trips with seed {}...", cli.count, cli.seed);
    let dataset = Dataset::generate(config).context("Failed to generate dataset")?;

    match cli.command {
        Commands::Verify => verify(&dataset, config)?,
        Commands::Kpi => print_json(&analytics::kpi_summary(&dataset))?,
        Commands::Stats => print_json(&analytics::summary_statistics(&dataset))?,
        Commands::Sample {
            count,
            category,
            zone,
            status,
        } => {
            let filter = TripFilter {
                category,
                zone,
                status: status
                    .as_deref()
                    .map(StatusFilter::from_param)
                    .unwrap_or_default(),
            };
            let page = PageRequest::new(Some(1), Some(count))?;
            print_json(&analytics::list_trips(&dataset, &filter, page))?;
        }
        Commands::Export { output } => export(&dataset, &output)?,
    }

    Ok(())
}

fn verify(dataset: &Dataset, config: GeneratorConfig) -> Result<()> {
    println!("=== Schema Invariants ===\n");
    let violations = invariant_violations(dataset.trips());
    for violation in violations.iter().take(20) {
        println!("  ✗ {}", violation);
    }
    if violations.is_empty() {
        println!("  ✓ {} trips checked, no violations", dataset.len());
    }

    println!("\n=== Determinism ===\n");
    let first = serde_json::to_vec(dataset.trips())?;
    let again = TripGenerator::new(config)?.generate();
    let second = serde_json::to_vec(&again)?;
    let deterministic = first == second;
    if deterministic {
        println!("  ✓ regeneration is byte-identical ({} bytes)", first.len());
    } else {
        println!("  ✗ regeneration differs");
    }

    let kpi = analytics::kpi_summary(dataset);
    println!("\n=== Overview ===\n");
    println!("  Trips:          {}", kpi.total_trips);
    println!("  Cancel rate:    {:.2}%", kpi.cancel_rate);
    println!("  Revenue:        ${:.2}", kpi.total_revenue);
    println!("  Surge share:    {:.1}%", kpi.surge_pct);

    if !violations.is_empty() || !deterministic {
        bail!(
            "verification failed: {} invariant violations, deterministic={}",
            violations.len(),
            deterministic
        );
    }
    Ok(())
}

fn export(dataset: &Dataset, output: &Path) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, dataset.trips())?;
    writer.flush()?;
    eprintln!("Wrote {} trips to {:?}", dataset.len(), output);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
