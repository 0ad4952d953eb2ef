//! Offline training run: a labelled CSV goes in, a score bundle comes out.

mod config;
mod error;

use bundle::{BundleMetadata, ScoreBundle};
use log::{debug, info};
use ml_core::{LabeledTable, LinearRegression, OneHotEncoder, RegressionStats, train_test_split};

pub use config::{DEFAULT_SEED, DEFAULT_TEST_SIZE, TrainerConfig};
pub use error::{Result, TrainErr};

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Rows the model was fitted on.
    pub train_samples: usize,
    /// Rows held out from fitting.
    pub test_samples: usize,
    /// Width of the encoded design matrix.
    pub columns: usize,
    /// Fit statistics over the training rows.
    pub training: RegressionStats,
    /// Statistics over the held out rows, if any were held out.
    pub holdout: Option<RegressionStats>,
}

/// Fits the encoder and the model on `table` and pairs them in a bundle.
///
/// The encoder learns its categories from every row, so a category that only
/// lands in the holdout part still gets its column. The model is fitted on the
/// training part only.
///
/// # Args
/// * `table` - The labelled rows.
/// * `cfg` - The training configuration; its dataset and output paths are
///   not used.
///
/// # Returns
/// The fitted bundle and a report of the run.
///
/// # Errors
/// Returns a `TrainErr` if the configuration is invalid or fitting fails.
pub fn fit_bundle(table: &LabeledTable, cfg: &TrainerConfig) -> Result<(ScoreBundle, TrainReport)> {
    if table.schema() != cfg.schema() {
        return Err(TrainErr::InvalidConfig(
            "the table was not loaded with the configured schema",
        ));
    }

    if cfg.test_size().is_some_and(|t| !(t > 0.0 && t < 1.0)) {
        return Err(TrainErr::InvalidConfig("test size must be within (0, 1)"));
    }

    let encoder = OneHotEncoder::fit(table.schema().features(), table.rows(), cfg.policy())?;
    let x = encoder.transform(table.rows())?;
    let y = table.labels();
    debug!(rows = x.nrows(), columns = x.ncols(); "design matrix built");

    let (model, training, holdout, train_samples, test_samples) = match cfg.test_size() {
        Some(test_size) => {
            let split = train_test_split(x.view(), y, test_size, cfg.seed())?;
            let model = LinearRegression::fit(split.x_train.view(), split.y_train.view())?;
            let training =
                RegressionStats::evaluate(&model, split.x_train.view(), split.y_train.view())?;
            let holdout =
                RegressionStats::evaluate(&model, split.x_test.view(), split.y_test.view())?;

            (model, training, Some(holdout), split.y_train.len(), split.y_test.len())
        }
        None => {
            let model = LinearRegression::fit(x.view(), y)?;
            let training = RegressionStats::evaluate(&model, x.view(), y)?;
            (model, training, None, y.len(), 0)
        }
    };

    info!(
        train = train_samples,
        test = test_samples,
        r2 = training.r2();
        "model fitted"
    );

    let report = TrainReport {
        train_samples,
        test_samples,
        columns: encoder.width(),
        training,
        holdout,
    };

    let metadata = BundleMetadata {
        train_samples,
        test_samples,
        holdout,
    };
    let bundle = ScoreBundle::new(table.schema().clone(), encoder, model, metadata)?;

    Ok((bundle, report))
}

/// Runs a full training: loads the dataset, fits and saves the bundle.
///
/// # Errors
/// Returns a `TrainErr` if the dataset cannot be loaded, fitting fails or the
/// bundle cannot be written.
pub fn train(cfg: &TrainerConfig) -> Result<TrainReport> {
    let table = LabeledTable::from_csv_path(cfg.dataset(), cfg.schema().clone())?;
    info!("dataset loaded with {} rows", table.len());

    let (bundle, report) = fit_bundle(&table, cfg)?;
    bundle.save(cfg.output())?;

    Ok(report)
}
