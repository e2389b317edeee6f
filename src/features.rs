//! Conversion of request records into the fixed feature row the model scores.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::{FEATURE_COUNT, FEATURES, FeatureKind, encode};

/// Errors that may occur while assembling a feature row.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A required schema field is absent from the request record.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// A categorical value is outside its training-time vocabulary.
    #[error("Unknown category '{value}' for feature '{field}'")]
    UnknownCategory {
        /// Field whose vocabulary was violated.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A numeric field holds a value that cannot be coerced to a float.
    #[error("Invalid numeric value '{value}' for feature '{field}'")]
    InvalidNumeric {
        /// Field that failed coercion.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Project a request record onto the schema and encode it into a feature row.
///
/// The output always holds [`FEATURE_COUNT`] values in [`FEATURES`] order.
/// Extra keys in the record are ignored; a missing key fails assembly.
pub fn assemble(record: &Map<String, Value>) -> Result<Vec<f32>, AssembleError> {
    let mut row = Vec::with_capacity(FEATURE_COUNT);
    for spec in &FEATURES {
        let value = record
            .get(spec.name)
            .ok_or(AssembleError::MissingField { field: spec.name })?;
        let encoded = match spec.kind {
            FeatureKind::Categorical(vocabulary) => {
                encode_categorical(spec.name, vocabulary, value)?
            }
            FeatureKind::Numeric => coerce_numeric(spec.name, value)?,
        };
        row.push(encoded);
    }
    Ok(row)
}

fn encode_categorical(
    field: &'static str,
    vocabulary: &'static [&'static str],
    value: &Value,
) -> Result<f32, AssembleError> {
    let Some(text) = value.as_str() else {
        // Non-string values can never be in a string vocabulary.
        return Err(AssembleError::UnknownCategory {
            field,
            value: display_value(value),
        });
    };
    encode(vocabulary, text)
        .map(|code| code as f32)
        .ok_or_else(|| AssembleError::UnknownCategory {
            field,
            value: text.to_string(),
        })
}

/// Coerce a JSON value to a float the way the training pipeline did:
/// numbers pass through, numeric strings parse, everything else fails.
fn coerce_numeric(field: &'static str, value: &Value) -> Result<f32, AssembleError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| AssembleError::InvalidNumeric {
                field,
                value: number.to_string(),
            }),
        Value::String(text) => {
            text.trim()
                .parse::<f64>()
                .map(|v| v as f32)
                .map_err(|_| AssembleError::InvalidNumeric {
                    field,
                    value: text.clone(),
                })
        }
        other => Err(AssembleError::InvalidNumeric {
            field,
            value: display_value(other),
        }),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
