use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Default name of the target column in the Heart Disease dataset.
pub const DEFAULT_LABEL_COLUMN: &str = "Heart Disease";

/// Central configuration for the classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 6,
            num_boost_round: 50,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::GBDT { .. } => "gbdt",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelType::default()),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}

/// Missing-value resolution strategy.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NanPolicy {
    /// Remove every row holding a missing value in any column.
    #[default]
    DropRows,
    /// Replace missing values with the mean of the column's present values.
    FillMean,
}

impl FromStr for NanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "drop-rows" | "drop" => Ok(NanPolicy::DropRows),
            "fill-mean" | "mean" => Ok(NanPolicy::FillMean),
            _ => Err(format!(
                "Unknown NaN policy: {}. Expected 'drop-rows' or 'fill-mean'",
                s
            )),
        }
    }
}

impl fmt::Display for NanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NanPolicy::DropRows => write!(f, "drop-rows"),
            NanPolicy::FillMean => write!(f, "fill-mean"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    pub label_column: String,
    pub normalize_columns: Vec<String>,
    pub nan_policy: NanPolicy,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            normalize_columns: Vec::new(),
            nan_policy: NanPolicy::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Everything a training run needs besides the data.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub split: SplitConfig,
    pub model: ModelConfig,
}

/// Load a pipeline configuration from a JSON file.
pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(&path).map_err(|e| {
        PipelineError::Config(format!(
            "failed to read {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        PipelineError::Config(format!(
            "failed to parse {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}
