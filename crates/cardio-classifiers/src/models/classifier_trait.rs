use crate::error::Result;

/// Row-major feature rows handed to a classifier.
pub type Rows = [Vec<f32>];

/// Contract between the trainer and a concrete classifier.
///
/// Labels are class indices in `0..n_classes`; mapping them back to label
/// values is the trainer's job.
pub trait ClassifierModel {
    /// Fit the model on `x` with class indices `y`.
    fn fit(&mut self, x: &Rows, y: &[usize], n_classes: usize) -> Result<()>;

    /// Per-row class probabilities, `n_classes` entries each.
    fn predict_proba(&self, x: &Rows) -> Result<Vec<Vec<f32>>>;

    /// Most probable class index per row. Ties go to the lower index.
    fn predict(&self, x: &Rows) -> Result<Vec<usize>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|p| argmax(p))
            .collect())
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

pub(crate) fn argmax(p: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in p.iter().enumerate() {
        if v > p[best] {
            best = i;
        }
    }
    best
}
