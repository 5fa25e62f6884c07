use anyhow::{Context, Result};

use cardio_classifiers::data_handling::split;
use cardio_classifiers::form::HEART_DISEASE_FORM;
use cardio_classifiers::inference::{align_to_columns, Prediction, RawRecord};
use cardio_classifiers::io::{credentials, CsvFileSource, DatasetSource, KaggleSource};
use cardio_classifiers::session::Session;

use crate::pipeline::input::{DataLocation, RunConfig};

pub fn open_source(config: &RunConfig) -> Result<Box<dyn DatasetSource>> {
    Ok(match config.location()? {
        DataLocation::File(path) => Box::new(CsvFileSource::new(path)),
        DataLocation::Kaggle(dataset) => {
            let provider = credentials::default_provider()
                .context("No Kaggle credentials: set KAGGLE_USERNAME/KAGGLE_KEY or HOME")?;
            Box::new(KaggleSource::new(dataset, provider))
        }
    })
}

fn load(config: &RunConfig) -> Result<Session> {
    let source = open_source(config)?;
    let mut session = Session::new();
    session.load_from(source.as_ref())?;
    Ok(session)
}

pub fn run_preview(config: &RunConfig, rows: usize) -> Result<()> {
    let session = load(config)?;
    let table = session
        .table()
        .context("Session holds no table after loading")?;
    let label = &config.pipeline.preprocess.label_column;

    println!("{} rows x {} columns\n", table.nrows(), table.ncols());
    print!("{}", table.head(rows));

    println!("\ncolumn\trole\tmissing");
    for (name, missing) in table.missing_counts() {
        let role = table
            .column_role(name, label)
            .map(|r| r.to_string())
            .unwrap_or_default();
        println!("{}\t{}\t{}", name, role, missing);
    }
    if !table.contains(label) {
        log::warn!("Label column '{}' is not in the dataset", label);
    }
    Ok(())
}

/// Share of held-out rows predicted correctly, `None` with an empty test side.
pub fn holdout_accuracy(session: &Session) -> Result<Option<f64>> {
    let (Some(preprocessed), Some(model)) = (session.preprocessed(), session.model()) else {
        anyhow::bail!("Session has no trained model");
    };
    let test = &model.partition.test;
    if test.is_empty() {
        return Ok(None);
    }
    let (features, labels) = split(&preprocessed.table, &model.label_column)?;
    let predicted = model.predict_rows(&features.select_rows(test))?;
    let correct = predicted
        .iter()
        .zip(labels.select(test).values)
        .filter(|(p, y)| **p == *y)
        .count();
    Ok(Some(correct as f64 / test.len() as f64))
}

pub fn run_training(config: &RunConfig) -> Result<Session> {
    let mut session = load(config)?;

    let preprocessed = session.preprocess(&config.pipeline.preprocess)?;
    log::info!(
        "Preprocessed table: {} rows kept, {} dropped, {} warnings",
        preprocessed.table.nrows(),
        preprocessed.dropped_rows,
        preprocessed.warnings.len()
    );

    let model = session.train(&config.pipeline.split, &config.pipeline.model)?;
    log::info!(
        "Model {} uses features {:?}",
        model.model_name(),
        model.feature_columns
    );

    match holdout_accuracy(&session)? {
        Some(accuracy) => log::info!("Hold-out accuracy: {:.3}", accuracy),
        None => log::info!("No rows held out; skipping accuracy"),
    }
    Ok(session)
}

/// Train, then predict one record. Answer names are matched to the model's
/// feature columns by canonical name first, so `sex=...` fits a `Sex` column.
pub fn run_prediction(config: &RunConfig, raw: RawRecord) -> Result<Prediction> {
    let mut session = run_training(config)?;
    let model = session
        .model()
        .context("Session has no trained model")?;
    let raw = align_to_columns(model, raw);
    let prediction = session.predict(&raw)?;
    Ok(prediction)
}

pub fn print_form() {
    println!("field\tprompt\tinput");
    for field in HEART_DISEASE_FORM {
        println!("{}\t{}\t{}", field.name, field.prompt, field.kind);
    }
}
