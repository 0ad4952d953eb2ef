use std::{error::Error, fmt};

use bundle::BundleError;
use ml_core::MlError;

use crate::ProfileError;

/// The predictor module's result type.
pub type Result<T> = std::result::Result<T, PredictError>;

#[derive(Debug)]
pub enum PredictError {
    Bundle(BundleError),
    /// The bundle was trained on columns other than the student profile ones.
    SchemaMismatch {
        found: Vec<String>,
    },
    Profile(ProfileError),
    Ml(MlError),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::Bundle(e) => write!(f, "cannot load the score bundle: {e}"),
            PredictError::SchemaMismatch { found } => write!(
                f,
                "the bundle was trained on {found:?}, not on the student profile columns"
            ),
            PredictError::Profile(e) => write!(f, "invalid profile: {e}"),
            PredictError::Ml(e) => write!(f, "prediction failed: {e}"),
        }
    }
}

impl Error for PredictError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PredictError::Bundle(e) => Some(e),
            PredictError::Profile(e) => Some(e),
            PredictError::Ml(e) => Some(e),
            PredictError::SchemaMismatch { .. } => None,
        }
    }
}

impl From<BundleError> for PredictError {
    fn from(value: BundleError) -> Self {
        Self::Bundle(value)
    }
}

impl From<ProfileError> for PredictError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<MlError> for PredictError {
    fn from(value: MlError) -> Self {
        Self::Ml(value)
    }
}
