//! Gradient-boosted stump classifier loaded from a trained artifact.
//!
//! The artifact is produced offline by the training pipeline and consumed
//! here read-only. It is loaded exactly once at process start; a load
//! failure aborts startup so no endpoint ever serves without a model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{FEATURE_COUNT, FEATURES};

/// Errors that may occur while loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to read the artifact file.
    #[error("Failed to read model artifact {path}: {source}")]
    Read {
        /// Artifact path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse the artifact JSON.
    #[error("Invalid model artifact {path}: {source}")]
    Parse {
        /// Artifact path that failed to parse.
        path: PathBuf,
        /// JSON parse error.
        source: serde_json::Error,
    },
    /// The artifact parsed but violates a structural invariant.
    #[error("Model artifact failed validation: {0}")]
    Invalid(String),
}

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stump {
    /// Feature index used for the split.
    pub feature_index: u16,
    /// Threshold in feature units.
    pub threshold: f32,
    /// Contribution for `feature <= threshold`.
    pub left_value: f32,
    /// Contribution for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    /// Contribution of this stump to the raw score of a feature row.
    pub fn predict(&self, features: &[f32]) -> f32 {
        let index = self.feature_index as usize;
        let value = features.get(index).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Gradient-boosted decision stump model for binary churn classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnModel {
    /// Artifact format version.
    pub model_version: i64,
    /// Ordered feature names the model was trained on.
    pub feature_names: Vec<String>,
    /// Raw score before any boosting rounds (prior log-odds).
    pub base_score: f32,
    /// Learning rate applied to each stump contribution.
    pub learning_rate: f32,
    /// Boosting rounds, applied in order.
    pub stumps: Vec<Stump>,
    /// Probability cutoff separating the churn label from no-churn.
    pub decision_threshold: f32,
}

/// Outcome of scoring one feature row.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    /// 1 for churn, 0 for no churn.
    pub label: u8,
    /// Estimated probability of churn (the positive class), unrounded.
    pub probability: f32,
}

impl ChurnModel {
    /// Load a model artifact from a JSON file and validate it.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Validate structural invariants of the artifact.
    ///
    /// The feature names must match the schema exactly; a mismatch means the
    /// artifact was trained against a different schema revision.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "Expected {FEATURE_COUNT} feature names, got {}",
                self.feature_names.len()
            )));
        }
        for (spec, trained) in FEATURES.iter().zip(&self.feature_names) {
            if spec.name != trained {
                return Err(ModelError::Invalid(format!(
                    "Feature name mismatch: artifact has '{trained}' where the schema expects '{}'",
                    spec.name
                )));
            }
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Invalid("base_score must be finite".to_string()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelError::Invalid(
                "learning_rate must be finite and > 0".to_string(),
            ));
        }
        if !(self.decision_threshold > 0.0 && self.decision_threshold < 1.0) {
            return Err(ModelError::Invalid(
                "decision_threshold must be in (0, 1)".to_string(),
            ));
        }
        if self.stumps.is_empty() {
            return Err(ModelError::Invalid(
                "Model must contain at least one stump".to_string(),
            ));
        }
        for (round, stump) in self.stumps.iter().enumerate() {
            if stump.feature_index as usize >= FEATURE_COUNT {
                return Err(ModelError::Invalid(format!(
                    "Stump {round} splits on feature index {} outside the schema",
                    stump.feature_index
                )));
            }
            if !stump.threshold.is_finite()
                || !stump.left_value.is_finite()
                || !stump.right_value.is_finite()
            {
                return Err(ModelError::Invalid(format!(
                    "Stump {round} contains a non-finite parameter"
                )));
            }
        }
        Ok(())
    }

    /// Raw additive score (log-odds) for a feature row.
    pub fn predict_raw(&self, features: &[f32]) -> f32 {
        let mut raw = self.base_score;
        for stump in &self.stumps {
            raw += self.learning_rate * stump.predict(features);
        }
        raw
    }

    /// Probability of the positive class (churn) for a feature row.
    ///
    /// Never rounded here; rounding happens at the presentation boundary.
    pub fn predict_proba(&self, features: &[f32]) -> f32 {
        sigmoid(self.predict_raw(features))
    }

    /// Score a feature row into a labelled prediction.
    pub fn predict(&self, features: &[f32]) -> Prediction {
        let probability = self.predict_proba(features);
        Prediction {
            label: u8::from(probability >= self.decision_threshold),
            probability,
        }
    }
}

fn sigmoid(raw: f32) -> f32 {
    1.0 / (1.0 + (-raw).exp())
}
