//! Single-record prediction from raw form answers.
//!
//! Raw answers are mapped with the exact transforms fitted on the training
//! table: answers for columns that were text through the shared
//! `FeatureCodebook`, answers for numeric columns through the frozen min/max
//! bounds of the columns that were normalized. A text answer for a numeric
//! column is accepted when a codebook convention covers it. The feature
//! vector is assembled in the model's stored column order.
use std::collections::BTreeMap;
use std::fmt;

use crate::encoding::canonical_name;
use crate::error::{PipelineError, Result};
use crate::preprocessing::FittedTransforms;
use crate::trainer::FittedModel;

/// A value as entered in the form: a selected option or a slider position.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// `Number` when the input parses as a float, `Text` otherwise.
    pub fn parse(input: &str) -> RawValue {
        let trimmed = input.trim();
        match trimmed.parse::<f64>() {
            Ok(v) => RawValue::Number(v),
            Err(_) => RawValue::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{}", v),
            RawValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Field name to raw answer.
pub type RawRecord = BTreeMap<String, RawValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted label value as the model sees it (an encoded code for
    /// categorical labels).
    pub value: f64,
    /// Decoded, human-readable label.
    pub label: String,
}

/// Check that `raw` names exactly the model's feature columns.
pub fn check_schema(model: &FittedModel, raw: &RawRecord) -> Result<()> {
    let missing: Vec<String> = model
        .feature_columns
        .iter()
        .filter(|c| !raw.contains_key(c.as_str()))
        .cloned()
        .collect();
    let unexpected: Vec<String> = raw
        .keys()
        .filter(|k| !model.feature_columns.contains(*k))
        .cloned()
        .collect();
    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::SchemaMismatch {
            missing,
            unexpected,
        })
    }
}

fn unknown_category(name: &str, value: &RawValue) -> PipelineError {
    PipelineError::UnknownCategory {
        column: name.to_string(),
        value: value.to_string(),
    }
}

fn encode_field(name: &str, value: &RawValue, transforms: &FittedTransforms) -> Result<f64> {
    let codebook = &transforms.feature_encodings;

    // column was text at training time
    if let Some(map) = codebook.get(name) {
        let code = match value {
            RawValue::Text(s) => map.encode(s),
            RawValue::Number(v) => map
                .encode(&value.to_string())
                .or_else(|| map.encode_number(*v)),
        };
        return code.map(f64::from).ok_or_else(|| unknown_category(name, value));
    }

    // column was numeric; a text answer may still be a conventional option
    let number = match value {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => match codebook.convention(name) {
                Some(map) => map
                    .encode(s.trim())
                    .map(f64::from)
                    .ok_or_else(|| unknown_category(name, value))?,
                None => {
                    return Err(PipelineError::InvalidFieldValue {
                        field: name.to_string(),
                        value: s.clone(),
                    })
                }
            },
        },
    };
    Ok(match transforms.normalization.get(name) {
        Some(bounds) => bounds.apply(number),
        None => number,
    })
}

/// Rename answers onto the model's feature columns by canonical name, so a
/// record keyed `sex` or `Sex` fits a model trained on either spelling.
/// Keys with no single free matching column are left as they are.
pub fn align_to_columns(model: &FittedModel, raw: RawRecord) -> RawRecord {
    let mut aligned = RawRecord::new();
    let given: Vec<String> = raw.keys().cloned().collect();
    for (key, value) in raw {
        let target = if model.feature_columns.contains(&key) {
            key
        } else {
            let wanted = canonical_name(&key);
            let mut matches = model
                .feature_columns
                .iter()
                .filter(|c| canonical_name(c) == wanted && !given.contains(c));
            match (matches.next(), matches.next()) {
                (Some(column), None) => column.clone(),
                _ => key,
            }
        };
        aligned.insert(target, value);
    }
    aligned
}

/// Build the model input vector for one record, in stored column order.
pub fn assemble_features(
    model: &FittedModel,
    raw: &RawRecord,
    transforms: &FittedTransforms,
) -> Result<Vec<f64>> {
    check_schema(model, raw)?;
    model
        .feature_columns
        .iter()
        .map(|name| encode_field(name, &raw[name.as_str()], transforms))
        .collect()
}

/// Predict and decode the label for one record.
pub fn predict_one(
    model: &FittedModel,
    raw: &RawRecord,
    transforms: &FittedTransforms,
) -> Result<Prediction> {
    let vector = assemble_features(model, raw, transforms)?;
    log::debug!("Assembled feature vector {:?}", vector);
    let value = model
        .predict_vectors(&[vector])?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::InvalidTable("model returned no prediction".to_string()))?;
    Ok(Prediction {
        value,
        label: transforms.decode_label(value),
    })
}
