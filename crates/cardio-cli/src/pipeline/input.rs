use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use cardio_classifiers::config::{ModelType, NanPolicy, PipelineConfig};
use cardio_classifiers::inference::RawRecord;

use crate::util::{parse_field, read_fields_json, validate_tsv_or_csv_file};

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLocation {
    File(String),
    Kaggle(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub data: Option<String>,
    pub kaggle_dataset: Option<String>,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

impl RunConfig {
    /// Read the optional JSON config, then apply command-line overrides.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config: RunConfig = match config_path {
            Some(path) => {
                let config_json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                serde_json::from_str(&config_json)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?
            }
            None => RunConfig::default(),
        };

        if let Some(data) = matches.get_one::<String>("data") {
            config.data = Some(data.clone());
            config.kaggle_dataset = None;
        }
        if let Some(dataset) = matches.get_one::<String>("kaggle") {
            config.kaggle_dataset = Some(dataset.clone());
            config.data = None;
        }
        if let Some(label) = matches.get_one::<String>("label") {
            config.pipeline.preprocess.label_column = label.clone();
        }

        // Pipeline overrides only exist on train/predict.
        if let Ok(Some(columns)) = matches.try_get_many::<String>("normalize") {
            config.pipeline.preprocess.normalize_columns = columns
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Ok(Some(policy)) = matches.try_get_one::<String>("nan_policy") {
            config.pipeline.preprocess.nan_policy =
                NanPolicy::from_str(policy).map_err(anyhow::Error::msg)?;
        }
        if let Ok(Some(fraction)) = matches.try_get_one::<f64>("test_fraction") {
            config.pipeline.split.test_fraction = *fraction;
        }
        if let Ok(Some(seed)) = matches.try_get_one::<u64>("seed") {
            config.pipeline.split.seed = *seed;
        }
        if let Ok(Some(model_type)) = matches.try_get_one::<String>("model_type") {
            config.pipeline.model.model_type =
                ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
        }

        Ok(config)
    }

    /// The configured dataset location; a local file must exist.
    pub fn location(&self) -> Result<DataLocation> {
        match (&self.data, &self.kaggle_dataset) {
            (Some(path), _) => {
                validate_tsv_or_csv_file(path)?;
                Ok(DataLocation::File(path.clone()))
            }
            (None, Some(dataset)) => Ok(DataLocation::Kaggle(dataset.clone())),
            (None, None) => anyhow::bail!(
                "No dataset given: pass --data <file> or --kaggle <owner/name>, \
                 or set \"data\" in the configuration file"
            ),
        }
    }
}

/// Collect form answers: the JSON file first, then `--field` pairs on top.
pub fn record_from_arguments(matches: &ArgMatches) -> Result<RawRecord> {
    let mut record = match matches.get_one::<PathBuf>("fields_json") {
        Some(path) => read_fields_json(path)?,
        None => RawRecord::new(),
    };
    if let Some(fields) = matches.get_many::<String>("field") {
        for field in fields {
            let (name, value) = parse_field(field)?;
            record.insert(name, value);
        }
    }
    Ok(record)
}
