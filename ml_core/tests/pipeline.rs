use approx::assert_abs_diff_eq;
use ml_core::{LabeledTable, LinearRegression, MlError, OneHotEncoder, Schema, UnknownPolicy};

fn table(rows: &[(&str, &str, &str, f64)]) -> LabeledTable {
    let (rows, labels) = rows
        .iter()
        .map(|&(g, p, t, y)| (vec![g.to_string(), p.to_string(), t.to_string()], y))
        .unzip();

    LabeledTable::new(Schema::student_performance(), rows, labels).unwrap()
}

fn fit(table: &LabeledTable, policy: UnknownPolicy) -> (OneHotEncoder, LinearRegression) {
    let encoder = OneHotEncoder::fit(table.schema().features(), table.rows(), policy).unwrap();
    let x = encoder.transform(table.rows()).unwrap();
    let model = LinearRegression::fit(x.view(), table.labels()).unwrap();
    (encoder, model)
}

fn predict(encoder: &OneHotEncoder, model: &LinearRegression, row: [&str; 3]) -> Result<f64, MlError> {
    let x = encoder.transform_row(&row)?;
    model.predict_one(x.view())
}

#[test]
fn two_rows_reproduce_their_scores() {
    let table = table(&[
        ("male", "bachelor's degree", "completed", 72.0),
        ("female", "some college", "none", 65.0),
    ]);
    let (encoder, model) = fit(&table, UnknownPolicy::Reject);

    let score = predict(&encoder, &model, ["male", "bachelor's degree", "completed"]).unwrap();
    assert_abs_diff_eq!(score, 72.0, epsilon = 1e-9);

    let score = predict(&encoder, &model, ["female", "some college", "none"]).unwrap();
    assert_abs_diff_eq!(score, 65.0, epsilon = 1e-9);
}

#[test]
fn predictions_are_deterministic() {
    let table = table(&[
        ("male", "bachelor's degree", "completed", 72.0),
        ("female", "some college", "none", 65.0),
        ("female", "high school", "completed", 58.0),
        ("male", "master's degree", "none", 81.0),
        ("male", "some high school", "none", 49.0),
        ("female", "associate's degree", "completed", 70.0),
        ("male", "high school", "completed", 66.0),
    ]);

    let (encoder, model) = fit(&table, UnknownPolicy::Reject);
    let (encoder2, model2) = fit(&table, UnknownPolicy::Reject);
    assert_eq!(encoder, encoder2);
    assert_eq!(model, model2);

    let row = ["female", "master's degree", "completed"];
    let first = predict(&encoder, &model, row).unwrap();
    for _ in 0..10 {
        assert_eq!(predict(&encoder, &model, row).unwrap().to_bits(), first.to_bits());
    }
}

#[test]
fn additive_effects_are_recovered() {
    // score = 50 + 10 * male + 5 * completed, education has no effect
    let mut rows = Vec::new();
    for gender in ["female", "male"] {
        for education in ["high school", "some college", "bachelor's degree"] {
            for prep in ["none", "completed"] {
                let y = 50.0
                    + if gender == "male" { 10.0 } else { 0.0 }
                    + if prep == "completed" { 5.0 } else { 0.0 };
                rows.push((gender, education, prep, y));
            }
        }
    }

    let table = table(&rows);
    let (encoder, model) = fit(&table, UnknownPolicy::Reject);

    let names = encoder.feature_names();
    let weight = |name: &str| model.coefficients()[names.iter().position(|n| n == name).unwrap()];

    assert_abs_diff_eq!(model.intercept(), 55.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weight("gender_male"), 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weight("test preparation course_none"), -5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weight("parental level of education_some college"), 0.0, epsilon = 1e-9);
}

#[test]
fn single_category_field_does_not_break_the_fit() {
    let table = table(&[
        ("male", "some college", "none", 60.0),
        ("male", "high school", "none", 55.0),
        ("male", "some college", "completed", 70.0),
    ]);
    let (encoder, model) = fit(&table, UnknownPolicy::Reject);

    assert_eq!(encoder.categories("gender").unwrap(), ["male"]);
    assert_eq!(encoder.width(), 3);
    assert_eq!(model.num_features(), encoder.width());

    let score = predict(&encoder, &model, ["male", "some college", "completed"]).unwrap();
    assert_abs_diff_eq!(score, 70.0, epsilon = 1e-9);
}

#[test]
fn unseen_category_follows_the_policy() {
    let table = table(&[
        ("male", "bachelor's degree", "completed", 72.0),
        ("female", "some college", "none", 65.0),
        ("female", "bachelor's degree", "none", 61.0),
    ]);

    let (encoder, model) = fit(&table, UnknownPolicy::Reject);
    let err = predict(&encoder, &model, ["male", "master's degree", "completed"]).unwrap_err();
    assert!(matches!(err, MlError::UnknownCategory { ref field, .. } if field == "parental level of education"));

    let encoder = encoder.with_policy(UnknownPolicy::Ignore);
    let unseen = predict(&encoder, &model, ["male", "master's degree", "completed"]).unwrap();
    let reference = predict(&encoder, &model, ["male", "bachelor's degree", "completed"]).unwrap();
    assert_eq!(unseen, reference);
}
