mod artifact;
mod error;
pub mod format;

pub use artifact::{BundleMetadata, ScoreBundle};
pub use error::{BundleError, Result};
