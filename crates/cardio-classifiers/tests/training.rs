use cardio_classifiers::config::{ModelConfig, ModelType};
use cardio_classifiers::data_handling::LabelVector;
use cardio_classifiers::error::PipelineError;
use cardio_classifiers::table::{Column, Table};
use cardio_classifiers::trainer::{partition, train, Trainer};

/// 40 rows; the label flips from 0 to 1 once age passes 50.
fn separable() -> (Table, LabelVector) {
    let ages: Vec<Option<f64>> = (0..40).map(|i| Some(30.0 + i as f64)).collect();
    let chol: Vec<Option<f64>> = (0..40).map(|i| Some(150.0 + ((i * 7) % 100) as f64)).collect();
    let labels = ages
        .iter()
        .map(|a| if a.unwrap_or(0.0) > 50.0 { 1.0 } else { 0.0 })
        .collect();
    let features = Table::from_columns(vec![
        ("age", Column::Numeric(ages)),
        ("cholesterol", Column::Numeric(chol)),
    ])
    .unwrap();
    (features, LabelVector::new("Heart Disease", labels))
}

fn small_model() -> ModelConfig {
    ModelConfig::new(
        0.3,
        ModelType::GBDT {
            max_depth: 3,
            num_boost_round: 20,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        },
    )
}

#[test]
fn same_seed_same_partition_and_predictions() {
    let (features, labels) = separable();
    let probe = vec![vec![35.0, 200.0], vec![52.0, 180.0], vec![66.0, 240.0]];

    let a = Trainer::new(small_model()).train(&features, &labels, 0.2, 42).unwrap();
    let b = Trainer::new(small_model()).train(&features, &labels, 0.2, 42).unwrap();

    assert_eq!(a.partition, b.partition);
    assert_eq!(a.partition.test.len(), 8);
    assert_eq!(
        a.predict_vectors(&probe).unwrap(),
        b.predict_vectors(&probe).unwrap()
    );
}

#[test]
fn different_seed_changes_partition() {
    assert_ne!(partition(40, 0.2, 1).unwrap(), partition(40, 0.2, 2).unwrap());
}

#[test]
fn fitted_model_stores_column_order_and_classes() {
    let (features, labels) = separable();
    let model = train(&features, &labels, 0.25, 7).unwrap();
    assert_eq!(
        model.feature_columns,
        vec!["age".to_string(), "cholesterol".to_string()]
    );
    assert_eq!(model.label_column, "Heart Disease");
    assert_eq!(model.classes, vec![0.0, 1.0]);
    assert_eq!(model.model_name(), "gbdt");
}

#[test]
fn predictions_are_label_values() {
    let (features, labels) = separable();
    let model = Trainer::new(small_model()).train(&features, &labels, 0.2, 42).unwrap();
    let predicted = model.predict_rows(&features).unwrap();
    assert_eq!(predicted.len(), 40);
    assert!(predicted.iter().all(|p| *p == 0.0 || *p == 1.0));
}

#[test]
fn missing_feature_value_is_rejected() {
    let features = Table::from_columns(vec![(
        "age",
        Column::Numeric(vec![Some(1.0), None, Some(3.0)]),
    )])
    .unwrap();
    let labels = LabelVector::new("y", vec![0.0, 1.0, 0.0]);
    let err = train(&features, &labels, 0.0, 0).unwrap_err();
    assert_eq!(
        err,
        PipelineError::MissingFeatureValue {
            column: "age".to_string(),
            row: 1
        }
    );
}

#[test]
fn unsupported_loss_is_a_config_error() {
    let (features, labels) = separable();
    let config = ModelConfig::new(
        0.1,
        ModelType::GBDT {
            max_depth: 3,
            num_boost_round: 5,
            debug: false,
            training_optimization_level: 2,
            loss_type: "SquaredError".to_string(),
        },
    );
    let err = Trainer::new(config).train(&features, &labels, 0.2, 42).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn three_classes_predict_known_values() {
    let (features, _) = separable();
    let labels = LabelVector::new(
        "stage",
        (0..40).map(|i| (i / 14) as f64).collect(),
    );
    let model = Trainer::new(small_model()).train(&features, &labels, 0.2, 3).unwrap();
    assert_eq!(model.classes, vec![0.0, 1.0, 2.0]);
    let predicted = model.predict_rows(&features).unwrap();
    assert!(predicted.iter().all(|p| model.classes.contains(p)));
}
