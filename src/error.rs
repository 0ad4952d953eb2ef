use std::{error::Error, fmt};

use predictor::PredictError;

use crate::{DescribeError, IdentificationError, LogError};

/// The intake module's result type.
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Intake flow failures.
#[derive(Debug)]
pub enum IntakeError {
    /// An action that the current state does not accept.
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    Identification(IdentificationError),
    Log(LogError),
    Describe(DescribeError),
    Predict(PredictError),
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::InvalidTransition { state, action } => {
                write!(f, "cannot {action} while {state}")
            }
            IntakeError::Identification(e) => write!(f, "invalid identification: {e}"),
            IntakeError::Log(e) => write!(f, "participant log error: {e}"),
            IntakeError::Describe(e) => write!(f, "image description failed: {e}"),
            IntakeError::Predict(e) => write!(f, "score prediction failed: {e}"),
        }
    }
}

impl Error for IntakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IntakeError::InvalidTransition { .. } => None,
            IntakeError::Identification(e) => Some(e),
            IntakeError::Log(e) => Some(e),
            IntakeError::Describe(e) => Some(e),
            IntakeError::Predict(e) => Some(e),
        }
    }
}

impl From<IdentificationError> for IntakeError {
    fn from(value: IdentificationError) -> Self {
        Self::Identification(value)
    }
}

impl From<LogError> for IntakeError {
    fn from(value: LogError) -> Self {
        Self::Log(value)
    }
}

impl From<DescribeError> for IntakeError {
    fn from(value: DescribeError) -> Self {
        Self::Describe(value)
    }
}

impl From<PredictError> for IntakeError {
    fn from(value: PredictError) -> Self {
        Self::Predict(value)
    }
}
