use std::{error::Error, fmt, str::FromStr};

use ml_core::schema::{GENDER, PARENTAL_EDUCATION, TEST_PREPARATION};
use serde::{Deserialize, Serialize};

/// A form value that is not one of the accepted options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    Unrecognized { field: &'static str, value: String },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Unrecognized { field, value } => {
                write!(f, "'{value}' is not a valid {field}")
            }
        }
    }
}

impl Error for ProfileError {}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The value used in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ProfileError::Unrecognized {
                field: GENDER,
                value: s.to_string(),
            }),
        }
    }
}

/// Highest education level reached by the student's parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentalEducation {
    #[serde(rename = "some high school")]
    SomeHighSchool,
    #[serde(rename = "high school")]
    HighSchool,
    #[serde(rename = "some college")]
    SomeCollege,
    #[serde(rename = "associate's degree")]
    Associate,
    #[serde(rename = "bachelor's degree")]
    Bachelor,
    #[serde(rename = "master's degree")]
    Master,
}

impl ParentalEducation {
    pub const ALL: [ParentalEducation; 6] = [
        ParentalEducation::SomeHighSchool,
        ParentalEducation::HighSchool,
        ParentalEducation::SomeCollege,
        ParentalEducation::Associate,
        ParentalEducation::Bachelor,
        ParentalEducation::Master,
    ];

    /// The value used in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentalEducation::SomeHighSchool => "some high school",
            ParentalEducation::HighSchool => "high school",
            ParentalEducation::SomeCollege => "some college",
            ParentalEducation::Associate => "associate's degree",
            ParentalEducation::Bachelor => "bachelor's degree",
            ParentalEducation::Master => "master's degree",
        }
    }
}

impl FromStr for ParentalEducation {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = normalize(s);
        // the intake form spells the dataset's "high school" this way
        if value == "high school (completed)" {
            return Ok(ParentalEducation::HighSchool);
        }

        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or_else(|| ProfileError::Unrecognized {
                field: PARENTAL_EDUCATION,
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPreparation {
    Completed,
    None,
}

impl TestPreparation {
    /// The value used in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestPreparation::Completed => "completed",
            TestPreparation::None => "none",
        }
    }
}

impl FromStr for TestPreparation {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "completed" => Ok(TestPreparation::Completed),
            "none" => Ok(TestPreparation::None),
            _ => Err(ProfileError::Unrecognized {
                field: TEST_PREPARATION,
                value: s.to_string(),
            }),
        }
    }
}

/// The three answers a score prediction is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentProfile {
    pub gender: Gender,
    pub parental_education: ParentalEducation,
    pub test_preparation: TestPreparation,
}

impl StudentProfile {
    pub fn new(
        gender: Gender,
        parental_education: ParentalEducation,
        test_preparation: TestPreparation,
    ) -> Self {
        Self {
            gender,
            parental_education,
            test_preparation,
        }
    }

    /// Parses the raw form answers, case-insensitively.
    ///
    /// # Errors
    /// Returns `ProfileError::Unrecognized` for the first answer that is not an
    /// accepted option.
    pub fn parse(
        gender: &str,
        parental_education: &str,
        test_preparation: &str,
    ) -> Result<Self, ProfileError> {
        Ok(Self::new(
            gender.parse()?,
            parental_education.parse()?,
            test_preparation.parse()?,
        ))
    }

    /// Returns the profile as a row in student performance schema order.
    pub fn to_row(&self) -> [&'static str; 3] {
        [
            self.gender.as_str(),
            self.parental_education.as_str(),
            self.test_preparation.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_values_parse_case_insensitively() {
        let profile = StudentProfile::parse("Male", " Bachelor's Degree ", "Completed").unwrap();

        assert_eq!(
            profile,
            StudentProfile::new(
                Gender::Male,
                ParentalEducation::Bachelor,
                TestPreparation::Completed
            )
        );
        assert_eq!(
            profile.to_row(),
            ["male", "bachelor's degree", "completed"]
        );
    }

    #[test]
    fn completed_high_school_is_high_school() {
        assert_eq!(
            "high school (completed)".parse::<ParentalEducation>(),
            Ok(ParentalEducation::HighSchool)
        );
        assert_eq!(
            "high school".parse::<ParentalEducation>(),
            Ok(ParentalEducation::HighSchool)
        );
    }

    #[test]
    fn every_level_parses_back() {
        for level in ParentalEducation::ALL {
            assert_eq!(level.as_str().parse::<ParentalEducation>(), Ok(level));
        }
    }

    #[test]
    fn serializes_as_dataset_values() {
        for level in ParentalEducation::ALL {
            assert_eq!(serde_json::to_value(level).unwrap(), level.as_str());
        }

        let profile = StudentProfile::new(
            Gender::Female,
            ParentalEducation::SomeHighSchool,
            TestPreparation::None,
        );
        let json = serde_json::to_value(profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "gender": "female",
                "parental_education": "some high school",
                "test_preparation": "none",
            })
        );
        assert_eq!(serde_json::from_value::<StudentProfile>(json).unwrap(), profile);
    }

    #[test]
    fn unknown_answer_names_its_field() {
        let err = StudentProfile::parse("male", "doctorate", "none").unwrap_err();
        assert_eq!(
            err,
            ProfileError::Unrecognized {
                field: PARENTAL_EDUCATION,
                value: "doctorate".to_string()
            }
        );
    }
}
