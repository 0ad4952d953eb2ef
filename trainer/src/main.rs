use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use ml_core::UnknownPolicy;

use trainer::{DEFAULT_SEED, DEFAULT_TEST_SIZE, TrainerConfig};

/// Fits the exam score model on a CSV dataset and writes its bundle.
#[derive(Parser)]
#[command(name = "trainer", version)]
struct Cli {
    /// Labelled CSV dataset with a header row
    #[arg(long, env = "SCORE_DATASET", default_value = "StudentsPerformance.csv")]
    dataset: PathBuf,

    /// Where the fitted bundle is written
    #[arg(long, env = "SCORE_BUNDLE", default_value = "score.bundle")]
    bundle: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, env = "SCORE_TEST_SIZE", default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Fit on every row, without a holdout
    #[arg(long, conflicts_with = "test_size")]
    no_holdout: bool,

    /// Seed for the holdout split
    #[arg(long, env = "SCORE_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// What the bundled encoder does with unseen categories (reject or ignore)
    #[arg(long, env = "SCORE_UNKNOWN_POLICY", default_value_t = UnknownPolicy::Reject)]
    unknown_policy: UnknownPolicy,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cfg = TrainerConfig::new(cli.dataset, cli.bundle)
        .with_test_size((!cli.no_holdout).then_some(cli.test_size))
        .with_seed(Some(cli.seed))
        .with_policy(cli.unknown_policy);

    let report = trainer::train(&cfg)?;
    info!("bundle written to {}", cfg.output().display());

    println!(
        "trained on {} rows ({} columns), training R2 {:.4}",
        report.train_samples,
        report.columns,
        report.training.r2()
    );

    match report.holdout {
        Some(stats) => println!(
            "holdout of {} rows: R2 {:.4}, RMSE {:.4}, MAE {:.4}",
            stats.samples(),
            stats.r2(),
            stats.rmse(),
            stats.mae()
        ),
        None => println!("no holdout evaluation"),
    }

    Ok(())
}
