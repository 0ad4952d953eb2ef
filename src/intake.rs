use log::{info, warn};
use predictor::{Predictor, StudentProfile};

use crate::{
    DescribeError, Identification, ImageDescriber, ImageUpload, ParticipantLog,
    error::{IntakeError, Result},
};

/// Where a participant is in the intake flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IntakeState {
    #[default]
    AwaitingIdentification,
    AwaitingImage {
        participant: Identification,
    },
    Complete {
        participant: Identification,
        description: String,
    },
}

impl IntakeState {
    pub fn name(&self) -> &'static str {
        match self {
            IntakeState::AwaitingIdentification => "awaiting_identification",
            IntakeState::AwaitingImage { .. } => "awaiting_image",
            IntakeState::Complete { .. } => "complete",
        }
    }

    /// Returns the identified participant, if there is one yet.
    pub fn participant(&self) -> Option<&Identification> {
        match self {
            IntakeState::AwaitingIdentification => None,
            IntakeState::AwaitingImage { participant }
            | IntakeState::Complete { participant, .. } => Some(participant),
        }
    }

    /// Returns the image description once the flow is complete.
    pub fn description(&self) -> Option<&str> {
        match self {
            IntakeState::Complete { description, .. } => Some(description),
            _ => None,
        }
    }
}

/// One participant's pass through identification, image description and
/// score prediction.
///
/// Each step is only accepted in the state the previous step leaves behind.
/// A refused step never changes the state.
pub struct IntakeSession<D> {
    describer: D,
    log: ParticipantLog,
    predictor: Predictor,
    state: IntakeState,
}

impl<D: ImageDescriber> IntakeSession<D> {
    /// Creates a new `IntakeSession` awaiting identification.
    ///
    /// # Args
    /// * `describer` - Turns uploaded images into descriptions.
    /// * `log` - Where identified participants are recorded.
    /// * `predictor` - Scores student profiles once the flow is complete.
    pub fn new(describer: D, log: ParticipantLog, predictor: Predictor) -> Self {
        Self {
            describer,
            log,
            predictor,
            state: IntakeState::AwaitingIdentification,
        }
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    /// Records the participant and moves on to the image upload.
    ///
    /// # Errors
    /// Returns `IntakeError::InvalidTransition` unless awaiting identification,
    /// and `IntakeError::Log` if the record cannot be appended.
    pub fn submit_identification(&mut self, participant: Identification) -> Result<()> {
        if self.state != IntakeState::AwaitingIdentification {
            return Err(self.refuse("submit identification"));
        }
        self.log.append(&participant)?;

        info!("participant {} identified", participant.name());
        self.state = IntakeState::AwaitingImage { participant };
        Ok(())
    }

    /// Describes the uploaded image and completes the flow.
    ///
    /// # Returns
    /// The description of the image.
    ///
    /// # Errors
    /// Returns `IntakeError::InvalidTransition` unless awaiting an image and
    /// `IntakeError::Describe` if no description could be obtained, in which
    /// case another image may be submitted.
    pub fn submit_image(&mut self, image: &ImageUpload) -> Result<&str> {
        let IntakeState::AwaitingImage { participant } = &self.state else {
            return Err(self.refuse("submit an image"));
        };

        let description = match self.describer.describe(image) {
            Ok(d) if !d.trim().is_empty() => d.trim().to_string(),
            Ok(_) => return Err(self.describe_failed(DescribeError::EmptyDescription)),
            Err(e) => return Err(self.describe_failed(e)),
        };

        info!("image {} described", image.file_name());
        self.state = IntakeState::Complete {
            participant: participant.clone(),
            description,
        };

        Ok(self.state.description().unwrap_or_default())
    }

    /// Predicts the math score of `profile`.
    ///
    /// # Errors
    /// Returns `IntakeError::InvalidTransition` unless the flow is complete and
    /// `IntakeError::Predict` if the profile cannot be scored.
    pub fn predict(&self, profile: &StudentProfile) -> Result<f64> {
        if !matches!(self.state, IntakeState::Complete { .. }) {
            return Err(self.refuse("predict a score"));
        }
        Ok(self.predictor.predict(profile)?)
    }

    /// Starts over with a new participant.
    pub fn reset(&mut self) {
        info!("intake reset from {}", self.state.name());
        self.state = IntakeState::AwaitingIdentification;
    }

    fn refuse(&self, action: &'static str) -> IntakeError {
        warn!("refused to {action} while {}", self.state.name());
        IntakeError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    fn describe_failed(&self, e: DescribeError) -> IntakeError {
        warn!("image description failed: {e}");
        e.into()
    }
}
