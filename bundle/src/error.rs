use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use ml_core::MlError;

/// The result type used in the entire bundle module.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Reasons a bundle cannot be written or trusted.
#[derive(Debug)]
pub enum BundleError {
    Io(io::Error),
    Missing(PathBuf),
    Truncated {
        expected: usize,
        got: usize,
    },
    BadMagic,
    UnsupportedVersion {
        found: u32,
        supported: u32,
    },
    TrailingBytes {
        extra: usize,
    },
    Payload(serde_json::Error),
    IncompatibleEncoder {
        found: u32,
        supported: u32,
    },
    Inconsistent(MlError),
}

impl Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleError::Io(e) => write!(f, "io error: {e}"),
            BundleError::Missing(path) => {
                write!(f, "no bundle found at '{}'", path.display())
            }
            BundleError::Truncated { expected, got } => write!(
                f,
                "the bundle is truncated, expected {expected} bytes and got {got}"
            ),
            BundleError::BadMagic => f.write_str("the file is not a score bundle"),
            BundleError::UnsupportedVersion { found, supported } => write!(
                f,
                "unsupported bundle format version {found}, this build reads version {supported}"
            ),
            BundleError::TrailingBytes { extra } => {
                write!(f, "the bundle has {extra} unexpected trailing bytes")
            }
            BundleError::Payload(e) => write!(f, "malformed bundle payload: {e}"),
            BundleError::IncompatibleEncoder { found, supported } => write!(
                f,
                "the bundle encoder uses layout version {found}, this build reads version {supported}"
            ),
            BundleError::Inconsistent(e) => write!(f, "inconsistent bundle: {e}"),
        }
    }
}

impl Error for BundleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BundleError::Io(e) => Some(e),
            BundleError::Payload(e) => Some(e),
            BundleError::Inconsistent(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BundleError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<MlError> for BundleError {
    fn from(value: MlError) -> Self {
        Self::Inconsistent(value)
    }
}
