use std::{collections::BTreeSet, fmt, str::FromStr};

use log::debug;
use ndarray::{Array1, Array2, ArrayViewMut1};
use serde::{Deserialize, Serialize};

use crate::MlError;

/// What to do with a categorical value the encoder never saw while fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Fail with `MlError::UnknownCategory`.
    #[default]
    Reject,
    /// Leave every column of that field at zero, the same as the reference level.
    Ignore,
}

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownPolicy::Reject => f.write_str("reject"),
            UnknownPolicy::Ignore => f.write_str("ignore"),
        }
    }
}

impl FromStr for UnknownPolicy {
    type Err = MlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "error" => Ok(UnknownPolicy::Reject),
            "ignore" => Ok(UnknownPolicy::Ignore),
            _ => Err(MlError::InvalidInput(
                "unknown category policy must be 'reject' or 'ignore'",
            )),
        }
    }
}

/// Where a value lands inside the columns of its field.
enum Slot {
    Column(usize),
    Reference,
    Unknown,
}

/// Fitted categories of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FieldEncoding {
    name: String,
    /// Every observed category, sorted and without duplicates.
    categories: Vec<String>,
    /// Index of the dropped category, `None` if the field only has one category.
    reference: Option<usize>,
}

impl FieldEncoding {
    fn fit<'a, I>(name: &str, values: I) -> Result<Self, MlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let observed: BTreeSet<&str> = values.collect();
        if observed.contains("") {
            return Err(MlError::InvalidInput("categorical values must not be empty"));
        }

        let categories: Vec<String> = observed.into_iter().map(str::to_string).collect();
        let reference = (categories.len() > 1).then_some(0);

        Ok(Self {
            name: name.to_string(),
            categories,
            reference,
        })
    }

    fn width(&self) -> usize {
        self.categories.len() - usize::from(self.reference.is_some())
    }

    fn slot(&self, value: &str) -> Slot {
        let Ok(i) = self.categories.binary_search_by(|c| c.as_str().cmp(value)) else {
            return Slot::Unknown;
        };

        match self.reference {
            Some(r) if i == r => Slot::Reference,
            Some(r) if i > r => Slot::Column(i - 1),
            _ => Slot::Column(i),
        }
    }

    fn columns(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.reference)
            .map(|(_, c)| c.as_str())
    }

    fn validate(&self) -> Result<(), MlError> {
        if self.categories.is_empty() {
            return Err(MlError::InvalidInput("an encoded field has no categories"));
        }

        if !self.categories.windows(2).all(|w| w[0] < w[1]) {
            return Err(MlError::InvalidInput(
                "encoded categories must be sorted and unique",
            ));
        }

        if self.reference != (self.categories.len() > 1).then_some(0) {
            return Err(MlError::InvalidInput(
                "the reference category must be the first of a multi-category field",
            ));
        }

        Ok(())
    }
}

/// One-hot encoder that drops the first category of each field.
///
/// Columns are laid out field by field in the order given at fit time, and
/// within each field in sorted category order with the reference category
/// omitted. A field that only had one category while fitting keeps that
/// category as a column, so every field owns at least one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    fields: Vec<FieldEncoding>,
    policy: UnknownPolicy,
}

impl OneHotEncoder {
    /// Version of the column layout produced by this encoder. Persisted
    /// encoders with a different layout version cannot be trusted.
    pub const LAYOUT_VERSION: u32 = 1;

    /// Learns the categories of every field from `rows`.
    ///
    /// # Args
    /// * `fields` - The field names, in the order values appear in each row.
    /// * `rows` - The training rows.
    /// * `policy` - How unseen categories are handled by `transform`.
    ///
    /// # Errors
    /// Returns `MlError::EmptyDataset` if there are no rows, `ShapeMismatch` if a
    /// row does not hold one value per field and `InvalidInput` if there are no
    /// fields or a value is empty.
    pub fn fit<F, R, S>(fields: &[F], rows: &[R], policy: UnknownPolicy) -> Result<Self, MlError>
    where
        F: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        if fields.is_empty() {
            return Err(MlError::InvalidInput("the encoder needs at least one field"));
        }

        if rows.is_empty() {
            return Err(MlError::EmptyDataset);
        }

        for row in rows {
            check_width(row.as_ref().len(), fields.len())?;
        }

        let fields = fields
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values = rows.iter().map(|row| row.as_ref()[i].as_ref());
                FieldEncoding::fit(name.as_ref(), values)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encoder = Self { fields, policy };
        debug!(
            fields = encoder.fields.len(),
            columns = encoder.width();
            "one-hot encoder fitted"
        );

        Ok(encoder)
    }

    /// Returns the same encoder with another unknown-category policy.
    pub fn with_policy(mut self, policy: UnknownPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    /// Returns the amount of columns produced for every row.
    pub fn width(&self) -> usize {
        self.fields.iter().map(FieldEncoding::width).sum()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns every category observed for `field`, reference included.
    pub fn categories(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.categories.as_slice())
    }

    /// Returns the dropped reference category of `field`, if it has one.
    pub fn reference(&self, field: &str) -> Option<&str> {
        let field = self.fields.iter().find(|f| f.name == field)?;
        field.reference.map(|r| field.categories[r].as_str())
    }

    /// Returns one `"{field}_{category}"` name per column, in column order.
    pub fn feature_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|f| f.columns().map(move |c| format!("{}_{c}", f.name)))
            .collect()
    }

    /// Encodes a single row.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the row does not hold one value per
    /// field and `MlError::UnknownCategory` for unseen values under
    /// `UnknownPolicy::Reject`.
    pub fn transform_row<S: AsRef<str>>(&self, row: &[S]) -> Result<Array1<f64>, MlError> {
        let mut out = Array1::zeros(self.width());
        self.encode_into(row, out.view_mut())?;
        Ok(out)
    }

    /// Encodes a batch of rows into a `rows × width` indicator matrix.
    ///
    /// # Errors
    /// Same as [`OneHotEncoder::transform_row`], for the first failing row.
    pub fn transform<R, S>(&self, rows: &[R]) -> Result<Array2<f64>, MlError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut out = Array2::zeros((rows.len(), self.width()));
        for (row, dst) in rows.iter().zip(out.rows_mut()) {
            self.encode_into(row.as_ref(), dst)?;
        }

        Ok(out)
    }

    /// Checks that the column layout is the canonical one `fit` produces.
    pub fn validate(&self) -> Result<(), MlError> {
        if self.fields.is_empty() {
            return Err(MlError::InvalidInput("the encoder needs at least one field"));
        }

        self.fields.iter().try_for_each(FieldEncoding::validate)
    }

    fn encode_into<S: AsRef<str>>(
        &self,
        row: &[S],
        mut dst: ArrayViewMut1<'_, f64>,
    ) -> Result<(), MlError> {
        check_width(row.len(), self.fields.len())?;

        let mut offset = 0;
        for (field, value) in self.fields.iter().zip(row) {
            let value = value.as_ref();
            match field.slot(value) {
                Slot::Column(c) => dst[offset + c] = 1.0,
                Slot::Reference => {}
                Slot::Unknown => match self.policy {
                    UnknownPolicy::Reject => {
                        return Err(MlError::UnknownCategory {
                            field: field.name.clone(),
                            value: value.to_string(),
                        });
                    }
                    UnknownPolicy::Ignore => {
                        debug!(field = field.name.as_str(); "ignoring unknown category");
                    }
                },
            }
            offset += field.width();
        }

        Ok(())
    }
}

fn check_width(got: usize, expected: usize) -> Result<(), MlError> {
    if got != expected {
        return Err(MlError::ShapeMismatch {
            what: "row",
            got,
            expected,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: [&str; 3] = ["gender", "parental level of education", "test preparation course"];

    fn rows() -> Vec<[&'static str; 3]> {
        vec![
            ["male", "bachelor's degree", "completed"],
            ["female", "some college", "none"],
            ["female", "high school", "none"],
        ]
    }

    #[test]
    fn drops_first_sorted_category_of_each_field() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Reject).unwrap();

        assert_eq!(enc.width(), 1 + 2 + 1);
        assert_eq!(
            enc.feature_names(),
            vec![
                "gender_male",
                "parental level of education_high school",
                "parental level of education_some college",
                "test preparation course_none",
            ]
        );
        assert_eq!(enc.reference("gender"), Some("female"));
        assert_eq!(
            enc.reference("parental level of education"),
            Some("bachelor's degree")
        );
    }

    #[test]
    fn transform_sets_one_indicator_per_non_reference_field() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Reject).unwrap();

        let x = enc.transform(&rows()).unwrap();
        assert_eq!(x.row(0).to_vec(), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(x.row(1).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(x.row(2).to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn width_does_not_depend_on_batch_size() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Reject).unwrap();

        let empty: Vec<[&str; 3]> = Vec::new();
        assert_eq!(enc.transform(&empty).unwrap().dim(), (0, enc.width()));
        assert_eq!(enc.transform(&rows()[..1]).unwrap().ncols(), enc.width());
        assert_eq!(enc.transform(&rows()).unwrap().ncols(), enc.width());
        assert_eq!(enc.transform_row(&rows()[2]).unwrap().len(), enc.width());
    }

    #[test]
    fn single_category_field_keeps_its_column() {
        let rows = [["male", "some college"], ["male", "high school"]];
        let enc = OneHotEncoder::fit(&["gender", "education"], &rows, UnknownPolicy::Reject).unwrap();

        assert_eq!(enc.reference("gender"), None);
        assert_eq!(enc.width(), 2);
        assert_eq!(enc.feature_names()[0], "gender_male");
        assert_eq!(enc.transform_row(&rows[0]).unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(enc.transform_row(&rows[1]).unwrap().to_vec(), vec![1.0, 0.0]);
        assert!(enc.validate().is_ok());
    }

    #[test]
    fn unknown_category_is_rejected_by_default() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::default()).unwrap();

        let err = enc
            .transform_row(&["male", "master's degree", "none"])
            .unwrap_err();
        assert_eq!(
            err,
            MlError::UnknownCategory {
                field: "parental level of education".into(),
                value: "master's degree".into(),
            }
        );
    }

    #[test]
    fn unknown_category_is_zeroed_when_ignored() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Ignore).unwrap();

        let x = enc.transform_row(&["male", "master's degree", "none"]).unwrap();
        assert_eq!(x.to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn wrong_row_width_is_a_shape_mismatch() {
        let enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Reject).unwrap();

        let err = enc.transform_row(&["male", "none"]).unwrap_err();
        assert_eq!(
            err,
            MlError::ShapeMismatch {
                what: "row",
                got: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn fit_without_rows_fails() {
        let empty: Vec<[&str; 3]> = Vec::new();
        assert_eq!(
            OneHotEncoder::fit(&FIELDS, &empty, UnknownPolicy::Reject),
            Err(MlError::EmptyDataset)
        );
    }

    #[test]
    fn policy_parses_from_str() {
        assert_eq!("Ignore".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Ignore);
        assert_eq!("reject".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Reject);
        assert!("drop".parse::<UnknownPolicy>().is_err());
    }

    #[test]
    fn validate_detects_tampered_layout() {
        let mut enc = OneHotEncoder::fit(&FIELDS, &rows(), UnknownPolicy::Reject).unwrap();
        enc.fields[1].categories.reverse();
        assert!(enc.validate().is_err());
    }
}
