use std::{fmt, fs::File, io, path::Path};

use log::{debug, info};
use ndarray::ArrayView1;

use crate::Schema;

/// Errors produced while loading labelled training data.
#[derive(Debug)]
pub enum DataError {
    /// A column required by the schema is not present in the header.
    MissingColumn(String),

    /// A CSV feature cell was empty. `line` counts the header as line 1.
    MissingValue { line: usize, column: String },

    /// A CSV label cell could not be read as a finite number. `line` counts the
    /// header as line 1.
    InvalidLabel { line: usize, value: String },

    /// An in-memory row holds an empty value. `row` is 0-based.
    EmptyCell { row: usize, column: String },

    /// An in-memory label is NaN or infinite. `row` is 0-based.
    NonFiniteLabel { row: usize, value: f64 },

    /// A row does not have as many values as the schema has features.
    RowWidth { row: usize, got: usize, expected: usize },

    /// The rows and labels given have different lengths.
    LabelCount { rows: usize, labels: usize },

    /// There are no data rows at all.
    Empty,

    /// The underlying CSV reader failed.
    Csv(csv::Error),

    /// The dataset could not be opened.
    Io(io::Error),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingColumn(column) => write!(f, "missing column '{column}'"),
            DataError::MissingValue { line, column } => {
                write!(f, "line {line}: empty value for column '{column}'")
            }
            DataError::InvalidLabel { line, value } => {
                write!(f, "line {line}: cannot parse label '{value}' as a finite number")
            }
            DataError::EmptyCell { row, column } => {
                write!(f, "row {row}: empty value for column '{column}'")
            }
            DataError::NonFiniteLabel { row, value } => {
                write!(f, "row {row}: label {value} is not finite")
            }
            DataError::RowWidth { row, got, expected } => {
                write!(f, "row {row}: expected {expected} values, got {got}")
            }
            DataError::LabelCount { rows, labels } => {
                write!(f, "got {rows} rows but {labels} labels")
            }
            DataError::Empty => write!(f, "the dataset has no rows"),
            DataError::Csv(e) => write!(f, "csv error: {e}"),
            DataError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Csv(e) => Some(e),
            DataError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<io::Error> for DataError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Categorical rows paired with their numeric labels.
///
/// Every row holds exactly one value per schema feature, in schema order, and
/// every label is finite.
#[derive(Debug, Clone)]
pub struct LabeledTable {
    schema: Schema,
    rows: Vec<Vec<String>>,
    labels: Vec<f64>,
}

impl LabeledTable {
    /// Creates a table from in-memory rows.
    ///
    /// # Errors
    /// Returns a `DataError` if the table is empty, a row has the wrong width, a
    /// value is empty or a label is not finite.
    pub fn new(schema: Schema, rows: Vec<Vec<String>>, labels: Vec<f64>) -> Result<Self, DataError> {
        if rows.len() != labels.len() {
            return Err(DataError::LabelCount {
                rows: rows.len(),
                labels: labels.len(),
            });
        }

        if rows.is_empty() {
            return Err(DataError::Empty);
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != schema.width() {
                return Err(DataError::RowWidth {
                    row: i,
                    got: row.len(),
                    expected: schema.width(),
                });
            }

            if let Some(col) = row.iter().position(|v| v.trim().is_empty()) {
                return Err(DataError::EmptyCell {
                    row: i,
                    column: schema.features()[col].clone(),
                });
            }
        }

        if let Some((i, label)) = labels.iter().enumerate().find(|(_, l)| !l.is_finite()) {
            return Err(DataError::NonFiniteLabel {
                row: i,
                value: *label,
            });
        }

        Ok(Self {
            schema,
            rows,
            labels,
        })
    }

    /// Loads a table from a CSV file with a header row.
    ///
    /// # Errors
    /// See [`LabeledTable::from_reader`]; opening the file may also fail.
    pub fn from_csv_path(path: impl AsRef<Path>, schema: Schema) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!("loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, schema)
    }

    /// Reads a table from CSV data with a header row.
    ///
    /// Columns are located by name, so extra columns and any column order are
    /// accepted. Reported line numbers count the header as line 1.
    ///
    /// # Errors
    /// Returns a `DataError` if a schema column is missing, a feature value is
    /// empty, a label is not a finite number or there are no data rows.
    pub fn from_reader<R: io::Read>(reader: R, schema: Schema) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let locate = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        let feature_idx = schema
            .features()
            .iter()
            .map(|f| locate(f))
            .collect::<Result<Vec<_>, _>>()?;
        let label_idx = locate(schema.label())?;

        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = i + 2;

            let row = feature_idx
                .iter()
                .zip(schema.features())
                .map(|(&idx, column)| match record.get(idx) {
                    Some(value) if !value.is_empty() => Ok(value.to_string()),
                    _ => Err(DataError::MissingValue {
                        line,
                        column: column.clone(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            let raw = record.get(label_idx).unwrap_or_default();
            let label = raw
                .parse::<f64>()
                .ok()
                .filter(|l| l.is_finite())
                .ok_or_else(|| DataError::InvalidLabel {
                    line,
                    value: raw.to_string(),
                })?;

            rows.push(row);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(DataError::Empty);
        }

        debug!(rows = rows.len(), features = schema.width(); "dataset loaded");

        Ok(Self {
            schema,
            rows,
            labels,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn labels(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.labels[..])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`, tables cannot be built without rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
\"gender\",\"race/ethnicity\",\"parental level of education\",\"lunch\",\"test preparation course\",\"math score\"
\"female\",\"group B\",\"bachelor's degree\",\"standard\",\"none\",\"72\"
\"male\",\"group C\",\"some college\",\"free/reduced\",\"completed\",\"69\"
";

    #[test]
    fn reads_schema_columns_by_name() {
        let table = LabeledTable::from_reader(CSV.as_bytes(), Schema::student_performance()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], ["female", "bachelor's degree", "none"]);
        assert_eq!(table.rows()[1], ["male", "some college", "completed"]);
        assert_eq!(table.labels().to_vec(), vec![72.0, 69.0]);
    }

    #[test]
    fn loads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, CSV).unwrap();

        let table = LabeledTable::from_csv_path(&path, Schema::student_performance()).unwrap();
        assert_eq!(table.len(), 2);

        let err = LabeledTable::from_csv_path(dir.path().join("absent.csv"), Schema::student_performance())
            .unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "gender,math score\nmale,50\n";
        let err = LabeledTable::from_reader(csv.as_bytes(), Schema::student_performance()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "parental level of education"));
    }

    #[test]
    fn non_numeric_label_reports_line() {
        let csv = "\
gender,parental level of education,test preparation course,math score
male,high school,none,50
male,high school,none,fifty
";
        let err = LabeledTable::from_reader(csv.as_bytes(), Schema::student_performance()).unwrap_err();
        assert!(matches!(err, DataError::InvalidLabel { line: 3, ref value } if value == "fifty"));
    }

    #[test]
    fn empty_feature_value_is_rejected() {
        let csv = "\
gender,parental level of education,test preparation course,math score
male,,none,50
";
        let err = LabeledTable::from_reader(csv.as_bytes(), Schema::student_performance()).unwrap_err();
        assert!(matches!(err, DataError::MissingValue { line: 2, .. }));
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "gender,parental level of education,test preparation course,math score\n";
        let err = LabeledTable::from_reader(csv.as_bytes(), Schema::student_performance()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn in_memory_table_checks_shapes() {
        let schema = Schema::new(["a", "b"], "y").unwrap();
        let rows = vec![vec!["x".to_string()]];
        let err = LabeledTable::new(schema.clone(), rows, vec![1.0]).unwrap_err();
        assert!(matches!(err, DataError::RowWidth { row: 0, got: 1, expected: 2 }));

        let rows = vec![vec!["x".to_string(), "z".to_string()]];
        let err = LabeledTable::new(schema.clone(), rows, vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, DataError::NonFiniteLabel { row: 0, .. }));

        let rows = vec![
            vec!["x".to_string(), "z".to_string()],
            vec!["x".to_string(), " ".to_string()],
        ];
        let err = LabeledTable::new(schema, rows, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, DataError::EmptyCell { row: 1, ref column } if column == "b"));
    }
}
