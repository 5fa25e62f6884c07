use cardio_classifiers::config::{ModelConfig, PreprocessConfig, SplitConfig};
use cardio_classifiers::error::PipelineError;
use cardio_classifiers::inference::{RawRecord, RawValue};
use cardio_classifiers::io::CsvBytesSource;
use cardio_classifiers::session::Session;
use cardio_classifiers::table::{Column, Table};

const CSV: &str = "\
age,sex,Heart Disease
63,Laki-laki,Presence
41,Perempuan,Absence
57,Laki-laki,Presence
45,Perempuan,Absence
70,Laki-laki,Presence
38,Perempuan,Absence
66,Perempuan,Presence
52,Laki-laki,Absence
59,Laki-laki,Presence
44,Perempuan,Absence
";

fn loaded() -> Session {
    let mut session = Session::new();
    session
        .load_from(&CsvBytesSource::new("heart.csv", CSV.as_bytes().to_vec()))
        .unwrap();
    session
}

fn normalize_age() -> PreprocessConfig {
    PreprocessConfig {
        normalize_columns: vec!["age".to_string()],
        ..PreprocessConfig::default()
    }
}

fn answers(age: f64, sex: &str) -> RawRecord {
    let mut raw = RawRecord::new();
    raw.insert("age".to_string(), RawValue::Number(age));
    raw.insert("sex".to_string(), RawValue::from(sex));
    raw
}

#[test]
fn full_walk_through_the_states() {
    let mut session = Session::new();
    assert_eq!(session.state_name(), "empty");

    session
        .load_from(&CsvBytesSource::new("heart.csv", CSV.as_bytes().to_vec()))
        .unwrap();
    assert_eq!(session.state_name(), "loaded");
    assert_eq!(session.table().unwrap().nrows(), 10);

    session.preprocess(&normalize_age()).unwrap();
    assert_eq!(session.state_name(), "preprocessed");

    let model = session
        .train(&SplitConfig::default(), &ModelConfig::default())
        .unwrap();
    assert_eq!(model.partition.test.len(), 2);
    assert_eq!(session.state_name(), "trained");

    let first = session.predict(&answers(65.0, "Laki-laki")).unwrap();
    assert_eq!(session.state_name(), "predicting");
    let second = session.predict(&answers(65.0, "Laki-laki")).unwrap();
    assert_eq!(first, second);
    assert_eq!(session.state_name(), "predicting");
}

#[test]
fn out_of_order_calls_are_invalid_state() {
    let mut session = Session::new();
    let err = session.preprocess(&PreprocessConfig::default()).unwrap_err();
    assert_eq!(
        err,
        PipelineError::InvalidState {
            action: "preprocess",
            state: "empty"
        }
    );

    let mut session = loaded();
    assert!(matches!(
        session.train(&SplitConfig::default(), &ModelConfig::default()),
        Err(PipelineError::InvalidState { .. })
    ));
    assert!(matches!(
        session.predict(&answers(50.0, "Laki-laki")),
        Err(PipelineError::InvalidState { .. })
    ));
    assert_eq!(session.state_name(), "loaded");
}

#[test]
fn schema_mismatch_keeps_the_model() {
    let mut session = loaded();
    session.preprocess(&normalize_age()).unwrap();
    session
        .train(&SplitConfig::default(), &ModelConfig::default())
        .unwrap();

    let mut partial = RawRecord::new();
    partial.insert("age".to_string(), RawValue::Number(50.0));
    assert!(matches!(
        session.predict(&partial),
        Err(PipelineError::SchemaMismatch { .. })
    ));
    assert_eq!(session.state_name(), "trained");
    assert!(session.predict(&answers(50.0, "Perempuan")).is_ok());
}

#[test]
fn loading_resets_derived_state() {
    let mut session = loaded();
    session.preprocess(&normalize_age()).unwrap();
    session
        .train(&SplitConfig::default(), &ModelConfig::default())
        .unwrap();

    let other = Table::from_columns(vec![
        ("bp", Column::Numeric(vec![Some(120.0), Some(140.0)])),
        ("Heart Disease", Column::Numeric(vec![Some(0.0), Some(1.0)])),
    ])
    .unwrap();
    session.load(other);
    assert_eq!(session.state_name(), "loaded");
    assert!(session.model().is_none());
    assert!(session.preprocessed().is_none());
}

#[test]
fn reprocessing_drops_the_model() {
    let mut session = loaded();
    session.preprocess(&PreprocessConfig::default()).unwrap();
    session
        .train(&SplitConfig::default(), &ModelConfig::default())
        .unwrap();
    session.preprocess(&normalize_age()).unwrap();
    assert_eq!(session.state_name(), "preprocessed");
    assert!(session.model().is_none());
}

#[test]
fn failed_preprocess_leaves_state_unchanged() {
    let mut session = loaded();
    session.preprocess(&PreprocessConfig::default()).unwrap();
    let bad = PreprocessConfig {
        normalize_columns: vec!["weight".to_string()],
        ..PreprocessConfig::default()
    };
    assert!(matches!(
        session.preprocess(&bad),
        Err(PipelineError::UnknownColumn { .. })
    ));
    assert_eq!(session.state_name(), "preprocessed");
    assert!(session
        .preprocessed()
        .unwrap()
        .transforms
        .normalization
        .is_empty());
}

#[test]
fn failed_load_keeps_previous_table() {
    let mut session = loaded();
    let err = session
        .load_from(&CsvBytesSource::new("broken.csv", b"a,b\n1\n".to_vec()))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Acquisition { .. }));
    assert_eq!(session.table().unwrap().nrows(), 10);
}
