use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::config::{ModelConfig, ModelType};
use crate::error::{PipelineError, Result};
use crate::models::classifier_trait::{ClassifierModel, Rows};

/// Loss accepted by the classifier: gbdt's `LogLikelyhood` takes labels in
/// {-1, 1} and predicts the probability of the positive label.
const LOG_LIKELIHOOD: &str = "LogLikelyhood";

enum Fitted {
    /// Only one class was present in the training rows.
    Constant(usize),
    /// One booster; the positive label is class 1.
    Binary(GBDT),
    /// One booster per class, `None` for classes absent from training.
    OneVsRest(Vec<Option<GBDT>>),
}

/// Gradient Boosting Decision Tree (GBDT) classifier
pub struct GBDTClassifier {
    model: Option<Fitted>,
    n_classes: usize,
    params: ModelConfig,
}

impl GBDTClassifier {
    pub fn new(params: ModelConfig) -> Self {
        GBDTClassifier {
            model: None,
            n_classes: 0,
            params,
        }
    }

    fn booster_config(&self, feature_size: usize) -> Result<Config> {
        let ModelType::GBDT {
            max_depth,
            num_boost_round,
            debug,
            training_optimization_level,
            loss_type,
        } = &self.params.model_type;

        if loss_type != LOG_LIKELIHOOD {
            return Err(PipelineError::Config(format!(
                "unsupported GBDT loss '{}', expected '{}'",
                loss_type, LOG_LIKELIHOOD
            )));
        }

        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(self.params.learning_rate);
        config.set_max_depth(*max_depth);
        config.set_iterations(*num_boost_round as usize);
        config.set_debug(*debug);
        config.set_training_optimization_level(*training_optimization_level);
        config.set_loss(loss_type);
        Ok(config)
    }

    /// Fit one booster separating `positive` from every other class.
    fn fit_booster(&self, x: &Rows, y: &[usize], positive: usize) -> Result<GBDT> {
        let config = self.booster_config(x[0].len())?;
        let mut gbdt = GBDT::new(&config);

        let mut train_x = DataVec::new();
        for (row, &class) in x.iter().zip(y) {
            let label = if class == positive { 1.0 } else { -1.0 };
            train_x.push(Data::new_training_data(row.clone(), 1.0, label, None));
        }

        gbdt.fit(&mut train_x);
        Ok(gbdt)
    }
}

fn positive_probability(gbdt: &GBDT, x: &Rows) -> Vec<f32> {
    let mut test_x = DataVec::new();
    for row in x {
        test_x.push(Data::new_test_data(row.clone(), None));
    }
    gbdt.predict(&test_x)
}

impl ClassifierModel for GBDTClassifier {
    fn fit(&mut self, x: &Rows, y: &[usize], n_classes: usize) -> Result<()> {
        if x.is_empty() || x.len() != y.len() {
            return Err(PipelineError::InvalidSplit(format!(
                "cannot fit on {} rows with {} labels",
                x.len(),
                y.len()
            )));
        }

        let mut present = vec![false; n_classes];
        for &class in y {
            present[class] = true;
        }
        let n_present = present.iter().filter(|&&p| p).count();

        let fitted = if n_present < 2 {
            log::warn!(
                "Training rows hold a single class ({}); predictions will be constant",
                y[0]
            );
            Fitted::Constant(y[0])
        } else if n_classes == 2 {
            Fitted::Binary(self.fit_booster(x, y, 1)?)
        } else {
            let mut boosters = Vec::with_capacity(n_classes);
            for (class, &is_present) in present.iter().enumerate() {
                boosters.push(if is_present {
                    Some(self.fit_booster(x, y, class)?)
                } else {
                    None
                });
            }
            Fitted::OneVsRest(boosters)
        };

        log::debug!(
            "Fitted {} on {} rows x {} features ({} classes)",
            self.name(),
            x.len(),
            x[0].len(),
            n_classes
        );
        self.n_classes = n_classes;
        self.model = Some(fitted);
        Ok(())
    }

    fn predict_proba(&self, x: &Rows) -> Result<Vec<Vec<f32>>> {
        let model = self.model.as_ref().ok_or_else(|| {
            PipelineError::Config("GBDT classifier used before fit".to_string())
        })?;
        if x.is_empty() {
            return Ok(Vec::new());
        }

        let proba = match model {
            Fitted::Constant(class) => {
                let mut one_hot = vec![0.0; self.n_classes];
                one_hot[*class] = 1.0;
                vec![one_hot; x.len()]
            }
            Fitted::Binary(gbdt) => positive_probability(gbdt, x)
                .into_iter()
                .map(|p| vec![1.0 - p, p])
                .collect(),
            Fitted::OneVsRest(boosters) => {
                let per_class: Vec<Vec<f32>> = boosters
                    .iter()
                    .map(|b| match b {
                        Some(gbdt) => positive_probability(gbdt, x),
                        None => vec![0.0; x.len()],
                    })
                    .collect();
                (0..x.len())
                    .map(|row| {
                        let scores: Vec<f32> = per_class.iter().map(|p| p[row]).collect();
                        let total: f32 = scores.iter().sum();
                        if total > 0.0 {
                            scores.iter().map(|s| s / total).collect()
                        } else {
                            scores
                        }
                    })
                    .collect()
            }
        };
        Ok(proba)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
