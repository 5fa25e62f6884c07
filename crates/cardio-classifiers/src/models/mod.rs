pub mod classifier_trait;
pub mod factory;
pub mod gbdt;

pub use classifier_trait::{ClassifierModel, Rows};
pub use factory::build_model;
pub use gbdt::GBDTClassifier;
