use std::fs;

use approx::assert_abs_diff_eq;
use bundle::ScoreBundle;
use ml_core::DataError;
use tempfile::tempdir;
use trainer::{TrainErr, TrainerConfig};

const CSV: &str = "\
gender,race/ethnicity,parental level of education,lunch,test preparation course,math score,reading score,writing score
female,group B,bachelor's degree,standard,none,72,72,74
female,group C,some college,standard,completed,69,90,88
female,group B,master's degree,standard,none,90,95,93
male,group A,associate's degree,free/reduced,none,47,57,44
male,group C,some college,standard,none,76,78,75
female,group B,associate's degree,standard,none,71,83,78
female,group B,some college,standard,completed,88,95,92
male,group B,some college,free/reduced,none,40,43,39
male,group D,high school,free/reduced,completed,64,64,67
female,group B,high school,free/reduced,none,38,60,50
";

#[test]
fn trains_and_writes_a_loadable_bundle() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("students.csv");
    let output = dir.path().join("score.bundle");
    fs::write(&dataset, CSV).unwrap();

    let cfg = TrainerConfig::new(&dataset, &output);
    let report = trainer::train(&cfg).unwrap();

    assert_eq!(report.train_samples + report.test_samples, 10);
    assert_eq!(report.test_samples, 2);

    let bundle = ScoreBundle::load(&output).unwrap();
    assert_eq!(bundle.metadata().train_samples, report.train_samples);
    assert_eq!(bundle.encoder().width(), report.columns);
}

#[test]
fn no_holdout_reproduces_the_mean_effects() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("students.csv");
    let output = dir.path().join("score.bundle");
    fs::write(
        &dataset,
        "\
gender,parental level of education,test preparation course,math score
male,bachelor's degree,completed,72
female,some college,none,65
",
    )
    .unwrap();

    let cfg = TrainerConfig::new(&dataset, &output).with_test_size(None);
    trainer::train(&cfg).unwrap();

    let bundle = ScoreBundle::load(&output).unwrap();
    let score = bundle
        .predict(&["male", "bachelor's degree", "completed"])
        .unwrap();
    assert_abs_diff_eq!(score, 72.0, epsilon = 1e-9);
}

#[test]
fn malformed_label_is_fatal() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("students.csv");
    let output = dir.path().join("score.bundle");
    fs::write(
        &dataset,
        "\
gender,parental level of education,test preparation course,math score
male,bachelor's degree,completed,72
female,some college,none,sixty
",
    )
    .unwrap();

    let err = trainer::train(&TrainerConfig::new(&dataset, &output)).unwrap_err();
    assert!(matches!(
        err,
        TrainErr::Data(DataError::InvalidLabel { line: 3, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn missing_column_is_fatal() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("students.csv");
    fs::write(&dataset, "gender,math score\nmale,70\n").unwrap();

    let err = trainer::train(&TrainerConfig::new(&dataset, dir.path().join("b"))).unwrap_err();
    assert!(matches!(err, TrainErr::Data(DataError::MissingColumn(_))));
}
