//! # Marine Forecast Entry Point
//!
//! Fetches the configured NOAA Coastal Waters Forecast zones, extracts the
//! current periods and writes the CSV the newsroom graphics import. Meant to
//! be run from cron; every run overwrites the previous file.


use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use marine_forecast_lib::bulletin::{self, FetchError};
use marine_forecast_lib::config::{Config, DEFAULT_CONFIG_FILE};
use marine_forecast_lib::pipeline::{self, RunSummary};
use marine_forecast_lib::{output, Bulletin};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extract wind, seas and small craft flags from NOAA Coastal Waters Forecasts into CSV.
#[derive(Parser, Debug)]
#[command(name = "marine-forecast", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Write the CSV here instead of the configured output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the CSV to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Only process this zone (e.g. AMZ651)
    #[arg(short, long)]
    zone: Option<String>,

    /// Parse a saved product file instead of downloading (requires --zone)
    #[arg(long, requires = "zone")]
    bulletin: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let mut config = Config::load_from_path(&args.config);
    if let Some(id) = &args.zone {
        let zone = config
            .zone(id)
            .cloned()
            .with_context(|| format!("zone {id} is not configured"))?;
        config.zones = vec![zone];
    }

    // One reference time for the whole run keeps zones consistent
    let now = Local::now();

    let summary = match &args.bulletin {
        Some(path) => parse_saved(&config, path, now)?,
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(pipeline::collect(&config, now.naive_local()))?
        }
    };

    for (zone, error) in &summary.failures {
        warn!(%zone, %error, "zone skipped");
    }
    // Leave the last good CSV in place rather than replacing it with a bare header
    if summary.all_failed() {
        bail!("all {} zones failed to fetch, output left untouched", summary.attempted);
    }

    if args.stdout {
        output::write_rows(io::stdout().lock(), &summary.rows)?;
    } else {
        let path = args.output.unwrap_or_else(|| config.output.path());
        output::write_file(&path, &summary.rows)
            .with_context(|| format!("writing {}", path.display()))?;
        output::copy_to_mirrors(&path, &config.output.mirrors);
    }

    info!(rows = summary.rows.len(), failures = summary.failures.len(), "done");
    Ok(())
}

/// Offline mode: run the single selected zone against a file on disk.
///
/// The file may be a full product page or just the zone's own block.
fn parse_saved(config: &Config, path: &Path, now: chrono::DateTime<Local>) -> Result<RunSummary> {
    let zone = config.zones.first().context("no zone selected")?;
    let product =
        fs::read_to_string(path).with_context(|| format!("reading bulletin {}", path.display()))?;

    let bulletin = match bulletin::from_product(zone, &product, now) {
        Ok(bulletin) => bulletin,
        Err(FetchError::ZoneNotFound(_)) => {
            info!(zone = %zone.id, "no zone header in file, treating it as the zone block");
            Bulletin::new(zone.id.clone(), now, bulletin::strip_html(&product))
        }
        Err(e) => return Err(e).with_context(|| format!("parsing bulletin {}", path.display())),
    };

    Ok(RunSummary {
        rows: pipeline::process_bulletin(&bulletin, now.naive_local(), config.forecast.cutover_hour),
        failures: Vec::new(),
        attempted: 1,
    })
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
