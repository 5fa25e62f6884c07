//! cardio-classifiers: preprocessing, training and single-record prediction
//! for the Heart Disease tabular dataset.
//!
//! The pipeline has four contracts: `preprocessing::preprocess` turns a raw
//! `Table` into a model-ready one plus the fitted transforms,
//! `data_handling::split` separates features from the label,
//! `trainer::Trainer` partitions and fits a GBDT classifier, and
//! `inference::predict_one` maps one raw form record through the frozen
//! transforms into a prediction. `session::Session` sequences them for one
//! interactive user.
//!
//! Remote acquisition (`io::KaggleSource`) sits behind the default `remote`
//! feature so the core builds without an HTTP stack.
pub mod config;
pub mod data_handling;
pub mod encoding;
pub mod error;
pub mod form;
pub mod inference;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod session;
pub mod table;
pub mod trainer;

pub use error::{PipelineError, Result};
pub use session::{Session, SessionState};
pub use table::{Column, Table};
