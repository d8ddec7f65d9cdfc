//! drtrend CLI - smooth sparse prevalence series into dense trend tables.
//!
//! Reads a JSON array of survey observations tagged with entity and patient
//! group, smooths each (entity, patient-group) cohort independently, and
//! writes the smoothed series as JSON. Logs go to stderr; payloads go to
//! stdout or the output file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use drt_common::{CohortKey, Error, Observation, Result};
use drt_core::config::SmootherConfig;
use drt_core::smoother::smooth_all;

/// drtrend - Bayesian trend smoothing for drug-resistance survey series
#[derive(Parser)]
#[command(name = "drt-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Smooth cohort observation tables into dense trend series
    Smooth(SmoothArgs),
}

#[derive(Args, Debug)]
struct SmoothArgs {
    /// Input JSON file: array of observation records
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Smoother configuration JSON file (built-in defaults when omitted)
    #[arg(short, long, env = "DRT_CONFIG")]
    config: Option<PathBuf>,

    /// First target year (default: earliest observed year)
    #[arg(long)]
    from_year: Option<i32>,

    /// Last target year (default: latest observed year)
    #[arg(long)]
    to_year: Option<i32>,

    /// RNG seed for reproducible output
    #[arg(long, env = "DRT_SEED")]
    seed: Option<u64>,

    /// Monte Carlo sample count override
    #[arg(long)]
    samples: Option<usize>,
}

/// One input row: an observation tagged with its cohort.
#[derive(Debug, Deserialize)]
struct InputRow {
    entity: String,
    patient_group: String,
    #[serde(flatten)]
    observation: Observation,
}

/// One output row: a smoothed estimate tagged with its cohort.
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    entity: &'a str,
    patient_group: &'a str,
    year: i32,
    mean: f64,
    lower: f64,
    upper: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let result = match cli.command {
        Commands::Smooth(args) => run_smooth(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!(code = err.code(), category = %err.category(), "{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(global: &GlobalOpts) {
    let default_level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_smooth(args: SmoothArgs) -> Result<ExitCode> {
    let config = load_config(&args)?;
    config.validate()?;

    let raw = std::fs::read_to_string(&args.input)?;
    let rows: Vec<InputRow> = serde_json::from_str(&raw)?;
    if rows.is_empty() {
        return Err(Error::Config(format!(
            "input file {} contains no observations",
            args.input.display()
        )));
    }

    let target_years = target_years(&rows, &args)?;
    let cohorts = group_cohorts(rows);
    info!(
        cohorts = cohorts.len(),
        years = target_years.len(),
        seed = ?config.seed,
        "smoothing cohorts"
    );

    let batch = smooth_all(&cohorts, &target_years, &config);

    let mut output_rows = Vec::new();
    for (key, series) in &batch.succeeded {
        for point in series.iter() {
            output_rows.push(OutputRow {
                entity: &key.entity,
                patient_group: &key.patient_group,
                year: point.year,
                mean: point.mean,
                lower: point.lower,
                upper: point.upper,
            });
        }
    }
    let payload = serde_json::to_string_pretty(&output_rows)?;
    match &args.output {
        Some(path) => std::fs::write(path, payload)?,
        None => println!("{payload}"),
    }

    if batch.summary.failed > 0 {
        warn!(
            failed = batch.summary.failed,
            total = batch.summary.total,
            "some cohorts were skipped"
        );
    }
    info!(
        succeeded = batch.summary.succeeded,
        failed = batch.summary.failed,
        rows = batch.summary.total,
        "smoothing finished"
    );

    if batch.summary.any_succeeded {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("no cohort could be smoothed");
        Ok(ExitCode::FAILURE)
    }
}

fn load_config(args: &SmoothArgs) -> Result<SmootherConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        }
        None => SmootherConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(samples) = args.samples {
        config.n_samples = samples;
    }
    Ok(config)
}

/// Target years from the CLI range flags, defaulting to the observed span.
fn target_years(rows: &[InputRow], args: &SmoothArgs) -> Result<Vec<i32>> {
    let observed_min = rows.iter().map(|r| r.observation.year).min();
    let observed_max = rows.iter().map(|r| r.observation.year).max();
    let (Some(observed_min), Some(observed_max)) = (observed_min, observed_max) else {
        return Err(Error::Config("no observation years in input".into()));
    };

    let from = args.from_year.unwrap_or(observed_min);
    let to = args.to_year.unwrap_or(observed_max);
    if from > to {
        return Err(Error::Config(format!(
            "target year range is empty: from_year={from} > to_year={to}"
        )));
    }
    Ok((from..=to).collect())
}

/// Group input rows into cohorts, preserving first-seen order.
fn group_cohorts(rows: Vec<InputRow>) -> Vec<(CohortKey, Vec<Observation>)> {
    let mut order: Vec<CohortKey> = Vec::new();
    let mut by_key: HashMap<CohortKey, Vec<Observation>> = HashMap::new();

    for row in rows {
        let key = CohortKey::new(row.entity, row.patient_group);
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.entry(key).or_default().push(row.observation);
    }

    order
        .into_iter()
        .map(|key| {
            let observations = by_key.remove(&key).unwrap_or_default();
            (key, observations)
        })
        .collect()
}
