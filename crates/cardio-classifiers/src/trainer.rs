//! Train/test partitioning and model fitting.
//!
//! The partition is a seeded permutation of row indices, so the same
//! `(rows, test_fraction, seed)` always yields the same split. The fitted
//! model keeps the feature column order it was trained with; inference
//! assembles its input vector from that order and nothing else.
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::ModelConfig;
use crate::data_handling::LabelVector;
use crate::error::{PipelineError, Result};
use crate::models::{build_model, ClassifierModel};
use crate::table::{Column, Table};

/// Row indices of the train and test sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Deterministic shuffled split: `ceil(n_rows * test_fraction)` rows go to test.
pub fn partition(n_rows: usize, test_fraction: f64, seed: u64) -> Result<Partition> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(PipelineError::InvalidSplit(format!(
            "test fraction must be in [0, 1), got {}",
            test_fraction
        )));
    }
    let n_test = (n_rows as f64 * test_fraction).ceil() as usize;
    if n_test >= n_rows {
        return Err(PipelineError::InvalidSplit(format!(
            "{} rows leave no training rows at test fraction {}",
            n_rows, test_fraction
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(n_test);

    Ok(Partition {
        train,
        test: indices,
    })
}

/// Classifier plus the exact feature layout and label values it was fit with.
pub struct FittedModel {
    pub feature_columns: Vec<String>,
    pub label_column: String,
    /// Sorted label values; class index `i` predicts `classes[i]`.
    pub classes: Vec<f64>,
    pub partition: Partition,
    model: Box<dyn ClassifierModel>,
}

impl fmt::Debug for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FittedModel")
            .field("model", &self.model.name())
            .field("feature_columns", &self.feature_columns)
            .field("label_column", &self.label_column)
            .field("classes", &self.classes)
            .field("train_rows", &self.partition.train.len())
            .field("test_rows", &self.partition.test.len())
            .finish()
    }
}

impl FittedModel {
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Predict label values for feature vectors already in `feature_columns` order.
    pub fn predict_vectors(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        for row in rows {
            if row.len() != self.feature_columns.len() {
                return Err(PipelineError::InvalidTable(format!(
                    "feature vector has {} values, model expects {}",
                    row.len(),
                    self.feature_columns.len()
                )));
            }
        }
        let x: Vec<Vec<f32>> = rows
            .iter()
            .map(|r| r.iter().map(|&v| v as f32).collect())
            .collect();
        Ok(self
            .model
            .predict(&x)?
            .into_iter()
            .map(|class| self.classes[class])
            .collect())
    }

    /// Predict label values for every row of a feature table. Columns are
    /// looked up by name, so the table's own order does not matter.
    pub fn predict_rows(&self, features: &Table) -> Result<Vec<f64>> {
        let rows = feature_rows(features, &self.feature_columns)?;
        self.predict_vectors(&rows)
    }
}

/// Read `columns` of `features` into row vectors, refusing missing values.
fn feature_rows(features: &Table, columns: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut data = Vec::with_capacity(columns.len());
    for name in columns {
        let column = features
            .column(name)
            .ok_or_else(|| PipelineError::UnknownColumn {
                column: name.clone(),
            })?;
        let Column::Numeric(values) = column else {
            return Err(PipelineError::NotNumeric {
                column: name.clone(),
            });
        };
        data.push(values);
    }

    (0..features.nrows())
        .map(|row| {
            data.iter()
                .zip(columns)
                .map(|(values, name)| {
                    values[row].ok_or_else(|| PipelineError::MissingFeatureValue {
                        column: name.clone(),
                        row,
                    })
                })
                .collect()
        })
        .collect()
}

pub struct Trainer {
    config: ModelConfig,
}

impl Default for Trainer {
    fn default() -> Self {
        Trainer::new(ModelConfig::default())
    }
}

impl Trainer {
    pub fn new(config: ModelConfig) -> Self {
        Trainer { config }
    }

    /// Partition the rows and fit a fresh classifier on the train side only.
    pub fn train(
        &self,
        features: &Table,
        labels: &LabelVector,
        test_fraction: f64,
        seed: u64,
    ) -> Result<FittedModel> {
        if features.nrows() != labels.len() {
            return Err(PipelineError::InvalidTable(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }

        let feature_columns = features.column_names().to_vec();
        let rows = feature_rows(features, &feature_columns)?;
        let classes = labels.classes();
        let partition = partition(rows.len(), test_fraction, seed)?;

        let x: Vec<Vec<f32>> = partition
            .train
            .iter()
            .map(|&i| rows[i].iter().map(|&v| v as f32).collect())
            .collect();
        let y: Vec<usize> = partition
            .train
            .iter()
            .map(|&i| class_index(&classes, labels.values[i]))
            .collect();

        let mut model = build_model(self.config.clone());
        model.fit(&x, &y, classes.len())?;

        log::info!(
            "Trained {} on {} rows ({} held out), {} features, {} classes",
            model.name(),
            partition.train.len(),
            partition.test.len(),
            feature_columns.len(),
            classes.len()
        );

        Ok(FittedModel {
            feature_columns,
            label_column: labels.name.clone(),
            classes,
            partition,
            model,
        })
    }
}

/// `classes` is sorted and built from the same labels, so the value is present.
fn class_index(classes: &[f64], value: f64) -> usize {
    classes
        .binary_search_by(|c| c.total_cmp(&value))
        .unwrap_or_else(|i| i.min(classes.len().saturating_sub(1)))
}

/// Train with the default model configuration.
pub fn train(
    features: &Table,
    labels: &LabelVector,
    test_fraction: f64,
    seed: u64,
) -> Result<FittedModel> {
    Trainer::default().train(features, labels, test_fraction, seed)
}
