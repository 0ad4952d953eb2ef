use std::{error::Error, fmt};

use bundle::BundleError;
use ml_core::{DataError, MlError};

/// The trainer module's result type.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// Training run failures.
#[derive(Debug)]
pub enum TrainErr {
    InvalidConfig(&'static str),
    Data(DataError),
    Ml(MlError),
    Bundle(BundleError),
}

impl fmt::Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainErr::InvalidConfig(msg) => write!(f, "invalid training configuration: {msg}"),
            TrainErr::Data(e) => write!(f, "dataset error: {e}"),
            TrainErr::Ml(e) => write!(f, "fitting error: {e}"),
            TrainErr::Bundle(e) => write!(f, "bundle error: {e}"),
        }
    }
}

impl Error for TrainErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainErr::Data(e) => Some(e),
            TrainErr::Ml(e) => Some(e),
            TrainErr::Bundle(e) => Some(e),
            TrainErr::InvalidConfig(_) => None,
        }
    }
}

impl From<DataError> for TrainErr {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

impl From<MlError> for TrainErr {
    fn from(value: MlError) -> Self {
        Self::Ml(value)
    }
}

impl From<BundleError> for TrainErr {
    fn from(value: BundleError) -> Self {
        Self::Bundle(value)
    }
}
