//! Feature/label separation for a preprocessed table.
//!
//! The label column is pulled out as a `LabelVector`, everything else stays a
//! `Table` in its original column order. Rows whose label is missing are
//! removed from both halves so row `i` of the features always pairs with
//! `labels.values[i]`.
use crate::error::{PipelineError, Result};
use crate::table::{Column, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct LabelVector {
    pub name: String,
    pub values: Vec<f64>,
}

impl LabelVector {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        LabelVector {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn select(&self, indices: &[usize]) -> LabelVector {
        LabelVector {
            name: self.name.clone(),
            values: indices.iter().map(|&i| self.values[i]).collect(),
        }
    }

    /// Sorted distinct label values.
    pub fn classes(&self) -> Vec<f64> {
        let mut classes = self.values.clone();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();
        classes
    }
}

/// Split `clean` into features (every column but `label_column`) and labels.
pub fn split(clean: &Table, label_column: &str) -> Result<(Table, LabelVector)> {
    let column = clean
        .column(label_column)
        .ok_or_else(|| PipelineError::MissingLabelColumn {
            column: label_column.to_string(),
        })?;
    let Column::Numeric(values) = column else {
        return Err(PipelineError::NotNumeric {
            column: label_column.to_string(),
        });
    };

    let features = clean.without_column(label_column)?;
    let keep: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    if keep.len() == values.len() {
        let labels = values.iter().flatten().copied().collect();
        return Ok((features, LabelVector::new(label_column, labels)));
    }

    log::warn!(
        "Label '{}' has {} missing values; removing those rows",
        label_column,
        values.len() - keep.len()
    );
    let labels = keep.iter().filter_map(|&i| values[i]).collect();
    Ok((
        features.select_rows(&keep),
        LabelVector::new(label_column, labels),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_sorted_and_unique() {
        let labels = LabelVector::new("y", vec![1.0, 0.0, 1.0, 2.0]);
        assert_eq!(labels.classes(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn categorical_label_is_rejected() {
        let t = Table::from_columns(vec![
            ("age", Column::Numeric(vec![Some(1.0)])),
            ("y", Column::Categorical(vec![Some("Presence".to_string())])),
        ])
        .unwrap();
        assert!(matches!(split(&t, "y"), Err(PipelineError::NotNumeric { .. })));
    }
}
