//! The Heart Disease entry form as data.
//!
//! Field names are the Heart Disease dataset headers, in dataset order.
//! [`field`] also finds a field by canonical name, so `sex` finds `Sex`.
//! Slider bounds are display hints for a front end; input values outside
//! them are passed through unchanged.
use std::fmt;

use crate::encoding::canonical_name;
use crate::inference::{RawRecord, RawValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Slider { min: f64, max: f64, default: f64 },
    Choice(&'static [&'static str]),
    Options(&'static [f64]),
}

impl FieldKind {
    /// Value a fresh form shows: the slider default, else the first entry.
    /// `None` for an empty choice list.
    pub fn default_value(&self) -> Option<RawValue> {
        match self {
            FieldKind::Slider { default, .. } => Some(RawValue::Number(*default)),
            FieldKind::Choice(choices) => choices.first().map(|c| RawValue::from(*c)),
            FieldKind::Options(options) => options.first().map(|o| RawValue::Number(*o)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let join = |items: Vec<String>| items.join(" | ");
        match self {
            FieldKind::Slider { min, max, default } => {
                write!(f, "number in [{}, {}], default {}", min, max, default)
            }
            FieldKind::Choice(choices) => {
                write!(f, "one of {}", join(choices.iter().map(|c| c.to_string()).collect()))
            }
            FieldKind::Options(options) => {
                write!(f, "one of {}", join(options.iter().map(|o| o.to_string()).collect()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub prompt: &'static str,
    pub kind: FieldKind,
}

pub const HEART_DISEASE_FORM: &[FormField] = &[
    FormField {
        name: "Age",
        prompt: "Umur",
        kind: FieldKind::Slider { min: 0.0, max: 100.0, default: 50.0 },
    },
    FormField {
        name: "Sex",
        prompt: "Jenis Kelamin",
        kind: FieldKind::Choice(&["Perempuan", "Laki-laki"]),
    },
    FormField {
        name: "Chest pain type",
        prompt: "Tipe Nyeri Dada",
        kind: FieldKind::Options(&[1.0, 2.0, 3.0, 4.0]),
    },
    FormField {
        name: "BP",
        prompt: "Tekanan Darah",
        kind: FieldKind::Slider { min: 50.0, max: 200.0, default: 120.0 },
    },
    FormField {
        name: "Cholesterol",
        prompt: "Kolesterol",
        kind: FieldKind::Slider { min: 100.0, max: 400.0, default: 200.0 },
    },
    FormField {
        name: "FBS over 120",
        prompt: "Gula Darah Puasa > 120",
        kind: FieldKind::Choice(&["Tidak", "Ya"]),
    },
    FormField {
        name: "EKG results",
        prompt: "Hasil EKG",
        kind: FieldKind::Options(&[0.0, 1.0, 2.0]),
    },
    FormField {
        name: "Max HR",
        prompt: "Detak Jantung Maksimal",
        kind: FieldKind::Slider { min: 60.0, max: 200.0, default: 150.0 },
    },
    FormField {
        name: "Exercise angina",
        prompt: "Angina Saat Olahraga",
        kind: FieldKind::Choice(&["Tidak", "Ya"]),
    },
    FormField {
        name: "ST depression",
        prompt: "Depresi ST",
        kind: FieldKind::Slider { min: 0.0, max: 5.0, default: 1.0 },
    },
    FormField {
        name: "Slope of ST",
        prompt: "Kemiringan ST",
        kind: FieldKind::Options(&[1.0, 2.0, 3.0]),
    },
    FormField {
        name: "Number of vessels fluro",
        prompt: "Jumlah Pembuluh Darah Fluro",
        kind: FieldKind::Options(&[0.0, 1.0, 2.0, 3.0]),
    },
    FormField {
        name: "Thallium",
        prompt: "Hasil Tes Thallium",
        kind: FieldKind::Options(&[3.0, 6.0, 7.0]),
    },
];

pub fn field(name: &str) -> Option<&'static FormField> {
    let wanted = canonical_name(name);
    HEART_DISEASE_FORM
        .iter()
        .find(|f| f.name == name)
        .or_else(|| HEART_DISEASE_FORM.iter().find(|f| canonical_name(f.name) == wanted))
}

/// A record holding every field's default value.
pub fn default_record() -> RawRecord {
    HEART_DISEASE_FORM
        .iter()
        .filter_map(|f| Some((f.name.to_string(), f.kind.default_value()?)))
        .collect()
}
