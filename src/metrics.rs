//! Offline evaluation statistics for the deployed classifier.

use serde::Serialize;

/// Evaluation statistics measured offline against the held-out test split.
///
/// These are properties of the deployed artifact, frozen at training time;
/// nothing here is recomputed at runtime.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvalReport {
    /// Fraction of test examples labelled correctly.
    pub accuracy: f64,
    /// `TP / (TP + FP)` for the churn class.
    pub precision: f64,
    /// `TP / (TP + FN)` for the churn class.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1_score: f64,
    /// Area under the ROC curve.
    pub roc_auc: f64,
}

impl EvalReport {
    /// Report for the currently deployed artifact.
    pub const fn baseline() -> Self {
        Self {
            accuracy: 0.8432,
            precision: 0.6667,
            recall: 0.78,
            f1_score: 0.7189,
            roc_auc: 0.8127,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_serializes_all_five_statistics() {
        let json = serde_json::to_value(EvalReport::baseline()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(object["accuracy"], 0.8432);
        assert_eq!(object["precision"], 0.6667);
        assert_eq!(object["recall"], 0.78);
        assert_eq!(object["f1_score"], 0.7189);
        assert_eq!(object["roc_auc"], 0.8127);
    }

    #[test]
    fn baseline_is_deterministic() {
        let first = serde_json::to_string(&EvalReport::baseline()).unwrap();
        let second = serde_json::to_string(&EvalReport::baseline()).unwrap();
        assert_eq!(first, second);
    }
}
