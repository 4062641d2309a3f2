// Command-line front end.
//
// - `serve` runs the JSON API.
// - `report` prints a markdown preview of one domain and exports the full
//   table as CSV plus a JSON summary.
// - `mock` writes a generated dataset as JSON.
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use performance_insights::config::AppConfig;
use performance_insights::logging::LoggingConfig;
use performance_insights::mock::{self, MockGenerator};
use performance_insights::output;
use performance_insights::reports::{self, Datasets, Domain};
use performance_insights::server;
use performance_insights::util;

#[derive(Parser)]
#[command(name = "performance-insights")]
#[command(about = "Player performance reports, mock data and a JSON API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Mock data seed (defaults to one derived from today's date)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print and export a report: load, recovery, physical, priority, injury, travel or biography
    Report {
        domain: Domain,
        /// Input file for the domain (CSV or JSON); mock data is used when absent or unreadable
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Rows shown in the console preview
        #[arg(long, default_value_t = 10)]
        max_rows: usize,
    },
    /// Write a generated dataset as JSON
    Mock {
        #[arg(value_enum)]
        dataset: MockDataset,
        #[arg(long)]
        seed: Option<u64>,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MockDataset {
    SimpleGps,
    Physical,
    Recovery,
    Priority,
    Players,
}

fn run_report(
    config: &AppConfig,
    domain: Domain,
    input: Option<PathBuf>,
    out_dir: PathBuf,
    max_rows: usize,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let mut data = Datasets::mock(today, config.mock_seed);
    if let Some(path) = input.as_deref() {
        data = data.with_input(domain, path);
    }

    println!("Generating {} report...\n", domain);
    let report = reports::build(domain, &data);
    let (csv_path, json_path) = report
        .export(&out_dir)
        .with_context(|| format!("failed to export {} report to {}", domain, out_dir.display()))?;

    report
        .table
        .preview(domain.title(), Some(&report.note), max_rows);
    println!(
        "(Full table exported to {}, {} rows)\n",
        csv_path.display(),
        util::format_int(report.table.len())
    );
    println!("Summary saved to {}", json_path.display());
    Ok(())
}

fn run_mock(
    config: &AppConfig,
    dataset: MockDataset,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut generator = MockGenerator::with_seed(Local::now().date_naive(), config.mock_seed);
    let value = match dataset {
        MockDataset::SimpleGps => serde_json::to_value(generator.simple_gps())?,
        MockDataset::Physical => serde_json::to_value(generator.physical())?,
        MockDataset::Recovery => serde_json::to_value(generator.recovery())?,
        MockDataset::Priority => serde_json::to_value(mock::priority_areas())?,
        MockDataset::Players => serde_json::to_value(mock::players())?,
    };

    match out {
        Some(path) => output::write_json(&path, &value)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    LoggingConfig::from_env()
        .init()
        .context("failed to initialise logging")?;
    let mut config = AppConfig::from_env().context("invalid INSIGHTS_* environment")?;

    match cli.command {
        Commands::Serve { host, port, seed } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            config.mock_seed = seed.or(config.mock_seed);
            server::serve(config).await.context("server failed")?;
        }
        Commands::Report {
            domain,
            input,
            out_dir,
            seed,
            max_rows,
        } => {
            config.mock_seed = seed.or(config.mock_seed);
            run_report(&config, domain, input, out_dir, max_rows)?;
        }
        Commands::Mock { dataset, seed, out } => {
            config.mock_seed = seed.or(config.mock_seed);
            run_mock(&config, dataset, out)?;
        }
    }
    Ok(())
}
