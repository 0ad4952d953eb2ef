use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Value, ser::PrettyFormatter};

/// Youngest accepted participant.
pub const MIN_AGE: u8 = 15;

/// Oldest accepted participant.
pub const MAX_AGE: u8 = 30;

/// Where a participant lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Residence {
    Ayeduase,
    #[serde(rename = "New Site")]
    NewSite,
    Boadi,
    Appiadu,
    #[serde(rename = "On-campus")]
    OnCampus,
}

impl Residence {
    pub const ALL: [Residence; 5] = [
        Residence::Ayeduase,
        Residence::NewSite,
        Residence::Boadi,
        Residence::Appiadu,
        Residence::OnCampus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Residence::Ayeduase => "Ayeduase",
            Residence::NewSite => "New Site",
            Residence::Boadi => "Boadi",
            Residence::Appiadu => "Appiadu",
            Residence::OnCampus => "On-campus",
        }
    }
}

impl fmt::Display for Residence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Residence {
    type Err = IdentificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| IdentificationError::UnknownResidence(s.to_string()))
    }
}

/// Reasons an identification form is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentificationError {
    EmptyName,
    AgeOutOfRange(u8),
    UnknownResidence(String),
}

impl fmt::Display for IdentificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentificationError::EmptyName => f.write_str("the name must not be empty"),
            IdentificationError::AgeOutOfRange(age) => {
                write!(f, "age {age} is outside {MIN_AGE}..={MAX_AGE}")
            }
            IdentificationError::UnknownResidence(value) => {
                write!(f, "'{value}' is not an accepted residence")
            }
        }
    }
}

impl Error for IdentificationError {}

/// A participant record as stored in the participant log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredIdentification")]
pub struct Identification {
    #[serde(rename = "username")]
    name: String,
    #[serde(rename = "userage")]
    age: u8,
    #[serde(rename = "stay")]
    residence: Residence,
}

impl Identification {
    /// Creates a new `Identification`, trimming the name.
    ///
    /// # Errors
    /// Returns an `IdentificationError` if the name is blank or the age is not
    /// within the accepted range.
    pub fn new(
        name: impl AsRef<str>,
        age: u8,
        residence: Residence,
    ) -> Result<Self, IdentificationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(IdentificationError::EmptyName);
        }

        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(IdentificationError::AgeOutOfRange(age));
        }

        Ok(Self {
            name: name.to_string(),
            age,
            residence,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn residence(&self) -> Residence {
        self.residence
    }
}

#[derive(Deserialize)]
struct StoredIdentification {
    username: String,
    userage: u8,
    stay: Residence,
}

impl TryFrom<StoredIdentification> for Identification {
    type Error = IdentificationError;

    fn try_from(value: StoredIdentification) -> Result<Self, Self::Error> {
        Self::new(value.username, value.userage, value.stay)
    }
}

/// Participant log failures.
#[derive(Debug)]
pub enum LogError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The log file holds valid JSON that is not an array of records.
    NotAnArray,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(e) => write!(f, "io error: {e}"),
            LogError::Json(e) => write!(f, "malformed participant log: {e}"),
            LogError::NotAnArray => f.write_str("the participant log is not a JSON array"),
        }
    }
}

impl Error for LogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LogError::Io(e) => Some(e),
            LogError::Json(e) => Some(e),
            LogError::NotAnArray => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Append-only JSON array of participant records.
#[derive(Debug, Clone)]
pub struct ParticipantLog {
    path: PathBuf,
}

impl ParticipantLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` to the log, creating the file if it is missing or empty.
    ///
    /// # Errors
    /// Returns `LogError::NotAnArray` if the file holds something other than a
    /// JSON array, and leaves it untouched in that case.
    pub fn append(&self, record: &Identification) -> Result<(), LogError> {
        let mut entries = self.read_entries()?;
        entries.push(serde_json::to_value(record)?);

        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        entries.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;

        info!(
            "participant appended to {} ({} records)",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    /// Reads every record back, in insertion order.
    ///
    /// # Errors
    /// Returns a `LogError` if the file cannot be read or an entry is not a
    /// participant record.
    pub fn records(&self) -> Result<Vec<Identification>, LogError> {
        self.read_entries()?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(LogError::from))
            .collect()
    }

    fn read_entries(&self) -> Result<Vec<Value>, LogError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            debug!("participant log at {} is empty", self.path.display());
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&raw)? {
            Value::Array(entries) => Ok(entries),
            _ => Err(LogError::NotAnArray),
        }
    }
}
