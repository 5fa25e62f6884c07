//! Categorical encodings shared by training and inference.
//!
//! `EncodingMap` assigns contiguous codes starting at 0 in first-seen order.
//! `FeatureCodebook` is the only place categorical feature columns get their
//! numeric codes: the preprocessor writes to it while encoding the training
//! table and the inference adapter reads the very same maps back.
use std::collections::{BTreeMap, HashMap};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingMap {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl EncodingMap {
    /// Build a map from the distinct present values in first-seen order.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut map = EncodingMap::default();
        for value in values.into_iter().flatten() {
            map.insert(value);
        }
        map
    }

    /// Build a map with fixed codes: `classes[i]` receives code `i`.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Self {
        let mut map = EncodingMap::default();
        for class in classes {
            map.insert(class.as_ref());
        }
        map
    }

    fn insert(&mut self, value: &str) -> u32 {
        if let Some(&code) = self.index.get(value) {
            return code;
        }
        let code = self.classes.len() as u32;
        self.classes.push(value.to_string());
        self.index.insert(value.to_string(), code);
        code
    }

    pub fn encode(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Code of the first class whose text parses to `value`, so a numeric
    /// answer `1` finds a class spelled `"1.0"`.
    pub fn encode_number(&self, value: f64) -> Option<u32> {
        self.classes
            .iter()
            .position(|class| class.trim().parse::<f64>().map_or(false, |v| v == value))
            .map(|code| code as u32)
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes ordered by code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode a categorical column; missing cells stay missing.
    pub(crate) fn encode_column(
        &self,
        column: &str,
        values: &[Option<String>],
    ) -> Result<Vec<Option<f64>>> {
        values
            .iter()
            .map(|v| match v {
                None => Ok(None),
                Some(s) => self.encode(s).map(|c| Some(c as f64)).ok_or_else(|| {
                    PipelineError::UnknownCategory {
                        column: column.to_string(),
                        value: s.clone(),
                    }
                }),
            })
            .collect()
    }
}

/// Heart Disease form conventions: the affirmative answer is coded 1.
///
/// Keys are canonical column names (see [`canonical_name`]), so `"Sex"`,
/// `"sex"` and `"SEX"` all pick up the same convention.
pub const HEART_DISEASE_CONVENTIONS: &[(&str, &[&str])] = &[
    ("sex", &["Perempuan", "Laki-laki"]),
    ("fbs_over_120", &["Tidak", "Ya"]),
    ("exercise_angina", &["Tidak", "Ya"]),
];

/// Lowercase `name` and collapse every run of non-alphanumeric characters
/// into a single `_`. `"FBS over 120"` becomes `"fbs_over_120"`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Column name to categorical encoding, for feature columns only.
///
/// `maps` holds exactly the columns that were encoded from text; a column
/// that arrived numeric never has an entry there. `conventions` are fixed
/// answer codings looked up by canonical name, used both when a text column
/// is first encoded and when a text answer is given for a numeric column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCodebook {
    maps: BTreeMap<String, EncodingMap>,
    conventions: BTreeMap<String, EncodingMap>,
}

impl FeatureCodebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codebook seeded with [`HEART_DISEASE_CONVENTIONS`].
    pub fn heart_disease() -> Self {
        let mut book = FeatureCodebook::new();
        for (column, classes) in HEART_DISEASE_CONVENTIONS {
            book.add_convention(*column, EncodingMap::from_classes(*classes));
        }
        book
    }

    /// Register the map for one exact column name.
    pub fn insert(&mut self, column: impl Into<String>, map: EncodingMap) {
        self.maps.insert(column.into(), map);
    }

    /// Register a convention; `column` is canonicalized.
    pub fn add_convention(&mut self, column: &str, map: EncodingMap) {
        self.conventions.insert(canonical_name(column), map);
    }

    /// Map of a column that was encoded from text.
    pub fn get(&self, column: &str) -> Option<&EncodingMap> {
        self.maps.get(column)
    }

    pub fn convention(&self, column: &str) -> Option<&EncodingMap> {
        self.conventions.get(&canonical_name(column))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.maps.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Encode one raw answer for `column`, falling back to its convention.
    pub fn encode(&self, column: &str, value: &str) -> Result<u32> {
        let map = self
            .get(column)
            .or_else(|| self.convention(column))
            .ok_or_else(|| PipelineError::UnknownColumn {
                column: column.to_string(),
            })?;
        map.encode(value).ok_or_else(|| PipelineError::UnknownCategory {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// Return the map for `column`: the registered one, else a copy of its
    /// convention, else a first-seen map derived from `values`.
    pub(crate) fn get_or_fit(&mut self, column: &str, values: &[Option<String>]) -> &EncodingMap {
        if !self.maps.contains_key(column) {
            let map = match self.convention(column) {
                Some(convention) => convention.clone(),
                None => EncodingMap::fit(values.iter().map(|v| v.as_deref())),
            };
            self.maps.insert(column.to_string(), map);
        }
        &self.maps[column]
    }

    /// Drop exact maps for every column not in `columns`.
    pub(crate) fn retain(&mut self, columns: &[String]) {
        self.maps.retain(|name, _| columns.contains(name));
    }
}
