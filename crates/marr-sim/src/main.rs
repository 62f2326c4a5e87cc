use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use marr_core::errors::ErrorInfo;
use marr_core::{MarrError, SchemaVersion, SessionProvenance};
use marr_engine::{estimate_dissimilarity, hash, Arrangement, Coord, SessionManifest};
use marr_sim::runner::{self, SimRunConfig};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "marr-sim", about = "Multi-arrangement session simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a full session from a configuration file.
    Run(RunArgs),
    /// Recompute the dissimilarity matrix from a recorded arrangement dump.
    Estimate(EstimateArgs),
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// YAML configuration describing the simulated session.
    #[arg(long)]
    config: PathBuf,
    /// Output directory for session artefacts.
    #[arg(long)]
    out: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct EstimateArgs {
    /// JSON dump of per-trial coordinate vectors (`null` for absent items).
    #[arg(long = "in")]
    input: PathBuf,
    /// Output directory for the recomputed matrix.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_simulation(args),
        Command::Estimate(args) => run_estimate(args),
    }
}

fn run_simulation(args: RunArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let raw = fs::read_to_string(&args.config)?;
    let config: SimRunConfig = serde_yaml::from_str(&raw)?;
    let outcome = runner::run_session(&config)?;

    runner::write_rdm_csv(&outcome.result.rdm, &args.out.join("rdm.csv"))?;

    let mut recorder = marr_engine::MetricsRecorder::new();
    for sample in &outcome.result.samples {
        recorder.push_sample(sample.clone());
    }
    recorder.write_csv(args.out.join("metrics.csv"))?;

    let rdm_hash = hash::rdm_hash(&outcome.result.rdm)?;
    let manifest = SessionManifest {
        schema_version: SchemaVersion::default(),
        provenance: SessionProvenance {
            config_hash: hash::stable_hash_string(&config)?,
            seed: Some(config.seed),
            created_at: chrono::Utc::now().to_rfc3339(),
            tool_versions: BTreeMap::from([(
                "marr-sim".to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            )]),
        },
        config: config.session.clone(),
        trial_count: outcome.trials,
        rdm_hash: rdm_hash.clone(),
        metrics_file: Some(PathBuf::from("metrics.csv")),
    };
    manifest.write(&args.out.join("manifest.json"))?;

    println!("{}", json!({ "trials": outcome.trials, "rdm_hash": rdm_hash }));
    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let raw = fs::read_to_string(&args.input)?;
    let dump: Vec<Vec<Option<Coord>>> = serde_json::from_str(&raw)?;
    let arrangements = dump
        .into_iter()
        .map(Arrangement::from_coords)
        .collect::<Result<Vec<_>, _>>()?;
    let Some(first) = arrangements.first() else {
        return Err(Box::new(MarrError::Estimate(ErrorInfo::new(
            "empty-history",
            "the dump contains no arrangements",
        ))));
    };

    let report = estimate_dissimilarity(&arrangements, first.item_count())?;
    runner::write_rdm_csv(&report.rdm, &args.out.join("rdm.csv"))?;
    println!(
        "{}",
        json!({
            "iterations": report.iterations,
            "converged": report.converged,
            "residual": report.residual,
            "rdm_hash": hash::rdm_hash(&report.rdm)?,
        })
    );
    Ok(())
}
