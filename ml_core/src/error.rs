use std::fmt;

/// Errors produced while fitting or applying the scoring pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "row", "labels").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// A categorical value that was never observed while fitting the encoder.
    UnknownCategory { field: String, value: String },

    /// Fitting was attempted without a single sample.
    EmptyDataset,

    /// A value that must be finite was NaN or infinite.
    NonFinite(&'static str),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::UnknownCategory { field, value } => {
                write!(f, "unknown category '{value}' for field '{field}'")
            }
            MlError::EmptyDataset => write!(f, "cannot fit without any samples"),
            MlError::NonFinite(what) => write!(f, "{what} contains NaN or infinite values"),
        }
    }
}

impl std::error::Error for MlError {}
