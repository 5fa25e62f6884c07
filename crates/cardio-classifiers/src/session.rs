//! Explicit session state for one interactive user.
//!
//! `Empty -> Loaded -> Preprocessed -> Trained -> Predicting`, with
//! `Predicting` looping on itself. Loading a table resets to `Loaded` and
//! drops every derived artifact. Failed operations leave the state untouched.
use crate::config::{ModelConfig, PreprocessConfig, SplitConfig};
use crate::data_handling::split;
use crate::error::{PipelineError, Result};
use crate::inference::{predict_one, Prediction, RawRecord};
use crate::io::DatasetSource;
use crate::preprocessing::{preprocess, Preprocessed};
use crate::table::Table;
use crate::trainer::{FittedModel, Trainer};

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Loaded {
        table: Table,
    },
    Preprocessed {
        table: Table,
        preprocessed: Preprocessed,
    },
    Trained {
        table: Table,
        preprocessed: Preprocessed,
        model: FittedModel,
    },
    Predicting {
        table: Table,
        preprocessed: Preprocessed,
        model: FittedModel,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loaded { .. } => "loaded",
            SessionState::Preprocessed { .. } => "preprocessed",
            SessionState::Trained { .. } => "trained",
            SessionState::Predicting { .. } => "predicting",
        }
    }

    fn into_table(self) -> Option<Table> {
        match self {
            SessionState::Empty => None,
            SessionState::Loaded { table }
            | SessionState::Preprocessed { table, .. }
            | SessionState::Trained { table, .. }
            | SessionState::Predicting { table, .. } => Some(table),
        }
    }

    fn into_prepared(self) -> Option<(Table, Preprocessed)> {
        match self {
            SessionState::Preprocessed {
                table,
                preprocessed,
            }
            | SessionState::Trained {
                table,
                preprocessed,
                ..
            }
            | SessionState::Predicting {
                table,
                preprocessed,
                ..
            } => Some((table, preprocessed)),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// The raw table as loaded.
    pub fn table(&self) -> Option<&Table> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Loaded { table }
            | SessionState::Preprocessed { table, .. }
            | SessionState::Trained { table, .. }
            | SessionState::Predicting { table, .. } => Some(table),
        }
    }

    pub fn preprocessed(&self) -> Option<&Preprocessed> {
        match &self.state {
            SessionState::Preprocessed { preprocessed, .. }
            | SessionState::Trained { preprocessed, .. }
            | SessionState::Predicting { preprocessed, .. } => Some(preprocessed),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&FittedModel> {
        match &self.state {
            SessionState::Trained { model, .. } | SessionState::Predicting { model, .. } => {
                Some(model)
            }
            _ => None,
        }
    }

    /// Replace everything with a freshly loaded table.
    pub fn load(&mut self, table: Table) {
        if !matches!(self.state, SessionState::Empty) {
            log::info!(
                "Loading new dataset; discarding {} session state",
                self.state_name()
            );
        }
        self.state = SessionState::Loaded { table };
    }

    pub fn load_from(&mut self, source: &dyn DatasetSource) -> Result<()> {
        log::info!("Loading dataset from {}", source.describe());
        let table = source.fetch()?;
        log::info!(
            "Loaded {} rows x {} columns",
            table.nrows(),
            table.ncols()
        );
        self.load(table);
        Ok(())
    }

    /// (Re)run preprocessing on the loaded table. Any fitted model is dropped.
    pub fn preprocess(&mut self, config: &PreprocessConfig) -> Result<&Preprocessed> {
        let preprocessed = {
            let table = self.table().ok_or_else(|| self.invalid("preprocess"))?;
            preprocess(table, config)?
        };
        if let Some(table) = std::mem::take(&mut self.state).into_table() {
            self.state = SessionState::Preprocessed {
                table,
                preprocessed,
            };
        }
        self.preprocessed()
            .ok_or_else(|| self.invalid("read preprocessing results"))
    }

    /// Split the preprocessed table and fit a new model, replacing any old one.
    pub fn train(
        &mut self,
        split_config: &SplitConfig,
        model_config: &ModelConfig,
    ) -> Result<&FittedModel> {
        let model = {
            let preprocessed = self.preprocessed().ok_or_else(|| self.invalid("train"))?;
            let (features, labels) = split(
                &preprocessed.table,
                &preprocessed.transforms.label_column,
            )?;
            Trainer::new(model_config.clone()).train(
                &features,
                &labels,
                split_config.test_fraction,
                split_config.seed,
            )?
        };
        if let Some((table, preprocessed)) = std::mem::take(&mut self.state).into_prepared() {
            self.state = SessionState::Trained {
                table,
                preprocessed,
                model,
            };
        }
        self.model().ok_or_else(|| self.invalid("read the fitted model"))
    }

    /// Predict one record. Errors leave the model in place.
    pub fn predict(&mut self, raw: &RawRecord) -> Result<Prediction> {
        let (Some(model), Some(preprocessed)) = (self.model(), self.preprocessed()) else {
            return Err(self.invalid("predict"));
        };
        let prediction = predict_one(model, raw, &preprocessed.transforms)?;
        self.state = match std::mem::take(&mut self.state) {
            SessionState::Trained {
                table,
                preprocessed,
                model,
            } => SessionState::Predicting {
                table,
                preprocessed,
                model,
            },
            other => other,
        };
        Ok(prediction)
    }

    fn invalid(&self, action: &'static str) -> PipelineError {
        PipelineError::InvalidState {
            action,
            state: self.state_name(),
        }
    }
}
