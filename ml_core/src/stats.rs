use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::{LinearRegression, MlError};

/// Goodness of fit of a regression over a set of labelled samples.
///
/// This type keeps fields private to allow evolving the reported metrics
/// without breaking the public API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionStats {
    samples: usize,
    r2: f64,
    rmse: f64,
    mae: f64,
}

impl RegressionStats {
    /// Compares predictions against the true labels.
    ///
    /// # Args
    /// * `y_true` - The observed labels.
    /// * `y_pred` - The predicted labels, in the same order.
    ///
    /// # Returns
    /// The statistics of the predictions.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if both vectors differ in length and
    /// `MlError::EmptyDataset` if they are empty.
    pub fn from_predictions(
        y_true: ArrayView1<f64>,
        y_pred: ArrayView1<f64>,
    ) -> Result<Self, MlError> {
        let r2 = r_squared(y_true, y_pred)?;
        let n = y_true.len() as f64;

        let residuals = &y_true - &y_pred;
        let rmse = (residuals.mapv(|r| r * r).sum() / n).sqrt();
        let mae = residuals.mapv(f64::abs).sum() / n;

        Ok(Self {
            samples: y_true.len(),
            r2,
            rmse,
            mae,
        })
    }

    /// Predicts every row of `x` with `model` and compares the result with `y`.
    ///
    /// # Errors
    /// Returns an `MlError` if the shapes of `x`, `y` and the model disagree.
    pub fn evaluate(
        model: &LinearRegression,
        x: ndarray::ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<Self, MlError> {
        let y_pred = model.predict(x)?;
        Self::from_predictions(y, y_pred.view())
    }

    /// Returns the amount of samples the statistics were computed over.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the coefficient of determination.
    pub fn r2(&self) -> f64 {
        self.r2
    }

    /// Returns the root mean squared error.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Returns the mean absolute error.
    pub fn mae(&self) -> f64 {
        self.mae
    }
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// When the true labels are constant the ratio is undefined; the score is then
/// 1.0 for a perfect prediction and 0.0 otherwise.
///
/// # Errors
/// Returns `MlError::ShapeMismatch` if both vectors differ in length and
/// `MlError::EmptyDataset` if they are empty.
pub fn r_squared(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64, MlError> {
    if y_true.len() != y_pred.len() {
        return Err(MlError::ShapeMismatch {
            what: "predictions",
            got: y_pred.len(),
            expected: y_true.len(),
        });
    }

    let mean = y_true.mean().ok_or(MlError::EmptyDataset)?;

    let ss_res: f64 = y_true
        .iter()
        .zip(&y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}
