use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::{MlError, solver, stats::r_squared};

/// Ordinary least squares linear regression with an intercept.
///
/// Predicts `x · coefficients + intercept`. Predictions are never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Creates a model from already known parameters.
    ///
    /// # Errors
    /// Returns `MlError::NonFinite` if any parameter is NaN or infinite.
    pub fn from_parts(coefficients: Array1<f64>, intercept: f64) -> Result<Self, MlError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Fits the model minimizing the squared error between `x · w + b` and `y`.
    ///
    /// Both `x` and `y` are centered, so the intercept is `mean(y) - mean(x) · w`.
    /// The weights are the minimum norm least squares solution, which keeps the
    /// fit well defined when columns are collinear or there are fewer samples
    /// than columns.
    ///
    /// # Args
    /// * `x` - The design matrix, one sample per row.
    /// * `y` - One label per sample.
    ///
    /// # Errors
    /// Returns `MlError::EmptyDataset` without samples, `ShapeMismatch` if `y`
    /// and `x` disagree on the amount of samples and `NonFinite` if an input is
    /// NaN or infinite.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self, MlError> {
        let (n, p) = x.dim();
        if n == 0 {
            return Err(MlError::EmptyDataset);
        }

        if y.len() != n {
            return Err(MlError::ShapeMismatch {
                what: "labels",
                got: y.len(),
                expected: n,
            });
        }

        if !x.iter().all(|v| v.is_finite()) {
            return Err(MlError::NonFinite("design matrix"));
        }

        if !y.iter().all(|v| v.is_finite()) {
            return Err(MlError::NonFinite("labels"));
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(MlError::EmptyDataset)?;
        let y_mean = y.mean().ok_or(MlError::EmptyDataset)?;

        let xc = &x - &x_mean;
        let yc = &y - y_mean;

        let gram = xc.t().dot(&xc);
        let rhs = xc.t().dot(&yc);
        let coefficients = solver::min_norm_solve(gram, rhs.view());
        let intercept = y_mean - x_mean.dot(&coefficients);

        debug!(samples = n, features = p; "linear regression fitted");

        Self::from_parts(coefficients, intercept)
    }

    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns the amount of input columns the model expects.
    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Predicts one value per row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong amount of columns.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        self.check_features(x.ncols())?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    /// Predicts the value of a single encoded row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong length.
    pub fn predict_one(&self, x: ArrayView1<f64>) -> Result<f64, MlError> {
        self.check_features(x.len())?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    /// Returns the coefficient of determination (R²) of the predictions for `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` and `y` disagree with each other or
    /// with the model.
    pub fn score(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<f64, MlError> {
        let y_pred = self.predict(x)?;
        r_squared(y, y_pred.view())
    }

    /// Checks every parameter is finite.
    pub fn validate(&self) -> Result<(), MlError> {
        if !self.intercept.is_finite() || !self.coefficients.iter().all(|w| w.is_finite()) {
            return Err(MlError::NonFinite("model parameters"));
        }

        Ok(())
    }

    fn check_features(&self, got: usize) -> Result<(), MlError> {
        if got != self.num_features() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got,
                expected: self.num_features(),
            });
        }

        Ok(())
    }
}
