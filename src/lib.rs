//! Participant intake for the exam score demo: identification, image
//! description and math score prediction, in that order.

mod describe;
mod error;
mod intake;
mod participants;

pub use describe::{DESCRIPTION_PROMPT, DescribeError, ImageDescriber, ImageFormat, ImageUpload};
pub use error::{IntakeError, Result};
pub use intake::{IntakeSession, IntakeState};
pub use participants::{
    Identification, IdentificationError, LogError, MAX_AGE, MIN_AGE, ParticipantLog, Residence,
};
pub use predictor::{Predictor, StudentProfile};
