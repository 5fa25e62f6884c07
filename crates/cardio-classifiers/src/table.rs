//! In-memory rectangular dataset.
//!
//! A `Table` is an ordered list of uniquely named columns of equal length.
//! Cells are `Option`s: `None` marks a missing value. Columns are either
//! numeric (`f64`) or categorical (`String`); boolean-like answers such as
//! `Ya`/`Tidak` stay categorical until the preprocessor encodes them.
use std::collections::HashSet;
use std::fmt;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => v[row].is_none(),
            Column::Categorical(v) => v[row].is_none(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Categorical(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }

    pub fn select(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }

    /// Cell rendered for previews; missing cells print as `NaN`.
    pub fn display_cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => v[row].map_or_else(|| "NaN".to_string(), |x| x.to_string()),
            Column::Categorical(v) => v[row].clone().unwrap_or_else(|| "NaN".to_string()),
        }
    }
}

/// Role of a column, inferred from its name and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Non-label categorical column, carried into the features through the
    /// feature codebook.
    Passthrough,
    NumericFeature,
    CategoricalLabel,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColumnRole::Passthrough => write!(f, "passthrough"),
            ColumnRole::NumericFeature => write!(f, "numeric-feature"),
            ColumnRole::CategoricalLabel => write!(f, "categorical-label"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that names are unique and columns have equal length.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(PipelineError::InvalidTable(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for (name, column) in names.iter().zip(&columns) {
                if column.len() != expected {
                    return Err(PipelineError::InvalidTable(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        column.len(),
                        expected
                    )));
                }
            }
        }
        Ok(Table { names, columns })
    }

    /// Convenience constructor from `(name, column)` pairs.
    pub fn from_columns<S: Into<String>>(pairs: Vec<(S, Column)>) -> Result<Self> {
        let (names, columns) = pairs
            .into_iter()
            .map(|(n, c)| (n.into(), c))
            .unzip();
        Table::new(names, columns)
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.column_index(name).map(move |i| &mut self.columns[i])
    }

    pub fn column_role(&self, name: &str, label_column: &str) -> Option<ColumnRole> {
        let column = self.column(name)?;
        Some(if name == label_column {
            ColumnRole::CategoricalLabel
        } else if column.is_numeric() {
            ColumnRole::NumericFeature
        } else {
            ColumnRole::Passthrough
        })
    }

    /// New table holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
        }
    }

    /// New table without `name`; the remaining columns keep their order.
    pub fn without_column(&self, name: &str) -> Result<Table> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::UnknownColumn {
                column: name.to_string(),
            })?;
        let mut names = self.names.clone();
        let mut columns = self.columns.clone();
        names.remove(idx);
        columns.remove(idx);
        Ok(Table { names, columns })
    }

    /// Indices of rows with at least one missing cell in any column.
    pub fn rows_with_missing(&self) -> Vec<usize> {
        (0..self.nrows())
            .filter(|&r| self.columns.iter().any(|c| c.is_missing(r)))
            .collect()
    }

    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns()
            .map(|(name, column)| (name, column.missing_count()))
            .collect()
    }

    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..self.nrows().min(n)).collect();
        self.select_rows(&indices)
    }

    pub fn row_display(&self, row: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.display_cell(row)).collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.names.join("\t"))?;
        for r in 0..self.nrows() {
            writeln!(f, "{}", self.row_display(r).join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("age", Column::Numeric(vec![Some(50.0), None, Some(60.0)])),
            (
                "sex",
                Column::Categorical(vec![
                    Some("Laki-laki".to_string()),
                    Some("Perempuan".to_string()),
                    None,
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Table::from_columns(vec![
            ("a", Column::Numeric(vec![Some(1.0)])),
            ("a", Column::Numeric(vec![Some(2.0)])),
        ])
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTable(_)));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::from_columns(vec![
            ("a", Column::Numeric(vec![Some(1.0)])),
            ("b", Column::Numeric(vec![Some(2.0), Some(3.0)])),
        ])
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTable(_)));
    }

    #[test]
    fn rows_with_missing_spans_all_columns() {
        assert_eq!(sample().rows_with_missing(), vec![1, 2]);
    }

    #[test]
    fn without_column_keeps_order() {
        let t = sample().without_column("age").unwrap();
        assert_eq!(t.column_names(), &["sex".to_string()]);
        assert_eq!(t.nrows(), 3);
    }

    #[test]
    fn roles_follow_type_and_label() {
        let t = sample();
        assert_eq!(t.column_role("age", "sex"), Some(ColumnRole::NumericFeature));
        assert_eq!(t.column_role("sex", "sex"), Some(ColumnRole::CategoricalLabel));
        assert_eq!(t.column_role("sex", "Heart Disease"), Some(ColumnRole::Passthrough));
        assert_eq!(t.column_role("bp", "sex"), None);
    }
}
