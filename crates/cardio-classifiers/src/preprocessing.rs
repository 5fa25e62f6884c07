//! Turns a raw table into a model-ready one.
//!
//! Steps run in a fixed order: label encoding, categorical feature encoding,
//! min-max normalization, then the missing-value policy. The caller's table
//! is never modified; a new one is returned together with the fitted
//! transforms that inference has to replay.
use std::collections::BTreeMap;

use crate::config::{NanPolicy, PreprocessConfig};
use crate::encoding::{EncodingMap, FeatureCodebook};
use crate::error::{PipelineError, Result};
use crate::table::{Column, Table};

/// Frozen min/max of one normalized column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxBounds {
    pub min: f64,
    pub max: f64,
}

impl MinMaxBounds {
    /// Fit over the present values. `DegenerateRange` when every present
    /// value is equal or none is present.
    pub fn fit(column: &str, values: &[Option<f64>]) -> Result<Self> {
        let mut present = values.iter().flatten().copied();
        let Some(first) = present.next() else {
            return Err(PipelineError::DegenerateRange {
                column: column.to_string(),
                value: f64::NAN,
            });
        };
        let (min, max) = present.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if max == min {
            return Err(PipelineError::DegenerateRange {
                column: column.to_string(),
                value: min,
            });
        }
        Ok(MinMaxBounds { min, max })
    }

    /// `(v - min) / (max - min)`; values outside the fitted range are not clamped.
    pub fn apply(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

/// Frozen bounds keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationParams {
    bounds: BTreeMap<String, MinMaxBounds>,
}

impl NormalizationParams {
    pub fn get(&self, column: &str) -> Option<&MinMaxBounds> {
        self.bounds.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.bounds.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.bounds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub(crate) fn insert(&mut self, column: impl Into<String>, bounds: MinMaxBounds) {
        self.bounds.insert(column.into(), bounds);
    }
}

/// Everything fitted on the training table that inference must reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTransforms {
    pub label_column: String,
    /// `None` when the label column was already numeric.
    pub label_encoding: Option<EncodingMap>,
    pub feature_encodings: FeatureCodebook,
    pub normalization: NormalizationParams,
}

impl FittedTransforms {
    /// Human-readable form of a predicted label value.
    pub fn decode_label(&self, value: f64) -> String {
        match &self.label_encoding {
            Some(map) if value >= 0.0 && value.fract() == 0.0 => map
                .decode(value as u32)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }
}

/// Output of [`preprocess`].
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub table: Table,
    pub transforms: FittedTransforms,
    /// Recoverable problems, e.g. `DegenerateRange` for skipped columns.
    pub warnings: Vec<PipelineError>,
    /// Rows removed by [`NanPolicy::DropRows`].
    pub dropped_rows: usize,
}

/// Preprocess with the Heart Disease feature conventions.
pub fn preprocess(table: &Table, config: &PreprocessConfig) -> Result<Preprocessed> {
    preprocess_with_codebook(table, config, FeatureCodebook::heart_disease())
}

/// Preprocess starting from a caller-provided codebook. Categorical feature
/// columns missing from `codebook` are added from its conventions or with
/// first-seen encodings; the returned codebook keeps only those columns.
pub fn preprocess_with_codebook(
    table: &Table,
    config: &PreprocessConfig,
    mut codebook: FeatureCodebook,
) -> Result<Preprocessed> {
    let label = config.label_column.as_str();
    let mut out = table.clone();

    // 1. label
    let label_encoding = match out.column_mut(label) {
        Some(column) => {
            if let Column::Categorical(values) = &*column {
                let map = EncodingMap::fit(values.iter().map(|v| v.as_deref()));
                let encoded = map.encode_column(label, values)?;
                log::info!(
                    "Encoded label '{}' into {} classes: {:?}",
                    label,
                    map.len(),
                    map.classes()
                );
                *column = Column::Numeric(encoded);
                Some(map)
            } else {
                None
            }
        }
        None => {
            log::debug!("Label column '{}' not present; skipping label encoding", label);
            None
        }
    };

    // 2. categorical features
    let categorical: Vec<String> = out
        .columns()
        .filter(|(name, column)| *name != label && !column.is_numeric())
        .map(|(name, _)| name.to_string())
        .collect();
    for name in &categorical {
        let Some(column) = out.column_mut(name) else {
            continue;
        };
        if let Column::Categorical(values) = &*column {
            let map = codebook.get_or_fit(name, values);
            let encoded = map.encode_column(name, values)?;
            log::debug!("Encoded feature '{}' with classes {:?}", name, map.classes());
            *column = Column::Numeric(encoded);
        }
    }
    codebook.retain(&categorical);

    // 3. normalization
    let mut normalization = NormalizationParams::default();
    let mut warnings = Vec::new();
    for name in &config.normalize_columns {
        if name == label {
            return Err(PipelineError::NotNumeric {
                column: name.clone(),
            });
        }
        match table.column(name) {
            None => {
                return Err(PipelineError::UnknownColumn {
                    column: name.clone(),
                })
            }
            Some(original) if !original.is_numeric() => {
                return Err(PipelineError::NotNumeric {
                    column: name.clone(),
                })
            }
            Some(_) => {}
        }
        let Some(Column::Numeric(values)) = out.column_mut(name) else {
            continue;
        };
        match MinMaxBounds::fit(name, values) {
            Ok(bounds) => {
                for v in values.iter_mut().flatten() {
                    *v = bounds.apply(*v);
                }
                log::debug!(
                    "Normalized '{}' with bounds [{}, {}]",
                    name,
                    bounds.min,
                    bounds.max
                );
                normalization.insert(name.clone(), bounds);
            }
            Err(e) => {
                log::warn!("{}", e);
                warnings.push(e);
            }
        }
    }

    // 4. missing values
    let mut dropped_rows = 0;
    match config.nan_policy {
        NanPolicy::DropRows => {
            let missing = out.rows_with_missing();
            if !missing.is_empty() {
                log::warn!(
                    "Table contains missing values; dropping {} of {} rows",
                    missing.len(),
                    out.nrows()
                );
                let keep: Vec<usize> = (0..out.nrows())
                    .filter(|r| missing.binary_search(r).is_err())
                    .collect();
                dropped_rows = missing.len();
                out = out.select_rows(&keep);
            }
        }
        NanPolicy::FillMean => fill_mean(&mut out, label),
    }

    Ok(Preprocessed {
        table: out,
        transforms: FittedTransforms {
            label_column: label.to_string(),
            label_encoding,
            feature_encodings: codebook,
            normalization,
        },
        warnings,
        dropped_rows,
    })
}

/// Mean of the present values, `None` when there are none.
pub fn column_mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn fill_mean(table: &mut Table, label: &str) {
    let names: Vec<String> = table
        .column_names()
        .iter()
        .filter(|n| n.as_str() != label)
        .cloned()
        .collect();
    for name in names {
        let Some(Column::Numeric(values)) = table.column_mut(&name) else {
            continue;
        };
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing == 0 {
            continue;
        }
        match column_mean(values) {
            Some(mean) => {
                log::warn!(
                    "Filling {} missing values in '{}' with mean {}",
                    missing,
                    name,
                    mean
                );
                for v in values.iter_mut().filter(|v| v.is_none()) {
                    *v = Some(mean);
                }
            }
            None => log::warn!("Column '{}' has no values to average; left missing", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_extrapolate_outside_range() {
        let b = MinMaxBounds { min: 40.0, max: 60.0 };
        assert_eq!(b.apply(50.0), 0.5);
        assert_eq!(b.apply(70.0), 1.5);
        assert_eq!(b.apply(30.0), -0.5);
    }

    #[test]
    fn constant_column_is_degenerate() {
        let err = MinMaxBounds::fit("bp", &[Some(120.0), None, Some(120.0)]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::DegenerateRange {
                column: "bp".to_string(),
                value: 120.0
            }
        );
    }

    #[test]
    fn all_missing_column_is_degenerate() {
        assert!(matches!(
            MinMaxBounds::fit("bp", &[None, None]),
            Err(PipelineError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn mean_ignores_missing() {
        assert_eq!(column_mean(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(column_mean(&[None]), None);
    }
}
