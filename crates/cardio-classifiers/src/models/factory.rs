use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;

/// Build a boxed classifier model from a `ModelConfig`.
pub fn build_model(params: ModelConfig) -> Box<dyn ClassifierModel> {
    match params.model_type {
        ModelType::GBDT { .. } => Box::new(crate::models::gbdt::GBDTClassifier::new(params)),
    }
}
