use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use predictor::{Predictor, StudentProfile};

/// Predicts a student's math score from a trained bundle.
#[derive(Parser)]
#[command(name = "predictor", version)]
struct Cli {
    /// Bundle written by the trainer
    #[arg(long, env = "SCORE_BUNDLE", default_value = "score.bundle")]
    bundle: PathBuf,

    /// male or female
    gender: String,

    /// Highest education level of the parents, e.g. "some college"
    parental_education: String,

    /// completed or none
    test_preparation: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let predictor = Predictor::load(&cli.bundle)?;
    let profile =
        StudentProfile::parse(&cli.gender, &cli.parental_education, &cli.test_preparation)?;

    let score = predictor.predict(&profile)?;
    println!("Predicted math score: {score:.2}");

    Ok(())
}
