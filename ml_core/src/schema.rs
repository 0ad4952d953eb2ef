use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::MlError;

/// Column holding the student's gender.
pub const GENDER: &str = "gender";

/// Column holding the highest education level reached by the student's parents.
pub const PARENTAL_EDUCATION: &str = "parental level of education";

/// Column telling whether the student completed a test preparation course.
pub const TEST_PREPARATION: &str = "test preparation course";

/// Column holding the label the model learns to predict.
pub const MATH_SCORE: &str = "math score";

/// Ordered categorical feature columns plus the numeric label column.
///
/// The order of `features` is the order in which rows are expected, both at
/// training and at inference time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    features: Vec<String>,
    label: String,
}

impl Schema {
    /// Creates a new `Schema`.
    ///
    /// # Errors
    /// Returns `MlError::InvalidInput` if there are no features, a name is empty,
    /// a feature is repeated or the label is also listed as a feature.
    pub fn new<I, S>(features: I, label: impl Into<String>) -> Result<Self, MlError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let label = label.into();

        if features.is_empty() {
            return Err(MlError::InvalidInput("schema needs at least one feature"));
        }

        if label.is_empty() || features.iter().any(String::is_empty) {
            return Err(MlError::InvalidInput("schema column names must not be empty"));
        }

        let mut seen = HashSet::with_capacity(features.len());
        if !features.iter().all(|f| seen.insert(f.as_str())) {
            return Err(MlError::InvalidInput("schema features must be unique"));
        }

        if seen.contains(label.as_str()) {
            return Err(MlError::InvalidInput("the label cannot also be a feature"));
        }

        Ok(Self { features, label })
    }

    /// The student performance layout: gender, parental education and test
    /// preparation predicting the math score.
    pub fn student_performance() -> Self {
        Self {
            features: vec![
                GENDER.to_string(),
                PARENTAL_EDUCATION.to_string(),
                TEST_PREPARATION.to_string(),
            ],
            label: MATH_SCORE.to_string(),
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the amount of feature columns.
    pub fn width(&self) -> usize {
        self.features.len()
    }

    /// Checks the invariants `new` enforces, for schemas that were deserialized.
    pub fn validate(&self) -> Result<(), MlError> {
        Self::new(self.features.iter().cloned(), self.label.clone()).map(|_| ())
    }
}
