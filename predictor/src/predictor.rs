use std::{path::Path, sync::Arc};

use bundle::ScoreBundle;
use log::{debug, info, warn};
use ml_core::Schema;

use crate::{
    StudentProfile,
    error::{PredictError, Result},
};

/// Predicts math scores from a loaded bundle.
///
/// The bundle is loaded once and never mutated afterwards, so a `Predictor`
/// is cheap to clone and can be read from any number of threads at once.
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: Arc<ScoreBundle>,
}

impl Predictor {
    /// Loads the bundle at `path`.
    ///
    /// # Errors
    /// Returns `PredictError::Bundle` if the bundle is missing or corrupt and
    /// `PredictError::SchemaMismatch` if it was not trained on student profiles.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bundle = ScoreBundle::load(path)?;
        Self::from_bundle(bundle)
    }

    /// Wraps an already loaded bundle.
    ///
    /// # Errors
    /// Returns `PredictError::SchemaMismatch` if the bundle features are not the
    /// student profile columns.
    pub fn from_bundle(bundle: ScoreBundle) -> Result<Self> {
        let expected = Schema::student_performance();
        if bundle.schema().features() != expected.features() {
            return Err(PredictError::SchemaMismatch {
                found: bundle.schema().features().to_vec(),
            });
        }

        info!(
            "predictor ready, {} columns, trained on {} rows",
            bundle.encoder().width(),
            bundle.metadata().train_samples
        );

        Ok(Self {
            bundle: Arc::new(bundle),
        })
    }

    /// Predicts the math score of `profile`. The result is not clamped.
    ///
    /// # Errors
    /// Returns `PredictError::Ml` if the bundled encoder rejects a category.
    pub fn predict(&self, profile: &StudentProfile) -> Result<f64> {
        self.predict_row(&profile.to_row())
    }

    /// Predicts from raw values in student profile column order.
    ///
    /// # Errors
    /// Returns `PredictError::Ml` if the row has the wrong width or holds a
    /// category the bundled encoder rejects.
    pub fn predict_row<S: AsRef<str>>(&self, row: &[S]) -> Result<f64> {
        match self.bundle.predict(row) {
            Ok(score) => {
                debug!(score = score; "score predicted");
                Ok(score)
            }
            Err(e) => {
                warn!("prediction rejected: {e}");
                Err(e.into())
            }
        }
    }

    pub fn bundle(&self) -> &ScoreBundle {
        &self.bundle
    }
}
