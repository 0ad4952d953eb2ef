mod error;
mod predictor;
mod profile;

pub use error::{PredictError, Result};
pub use predictor::Predictor;
pub use profile::{Gender, ParentalEducation, ProfileError, StudentProfile, TestPreparation};
