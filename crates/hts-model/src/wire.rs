//! Wire types exchanged with the remote scoring endpoint.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::feature::FeatureVector;

/// Key under `result.predictions` holding the positive-class probability.
pub const PROBABILITY_KEY: &str = "probability(1)";

/// Model configuration block of a scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfigs {
    pub model_id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub encounter_date: NaiveDate,
    pub facility_id: String,
    pub debug: bool,
}

/// Request body: `{ "modelConfigs": ..., "variableValues": ... }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest<'a> {
    pub model_configs: ModelConfigs,
    pub variable_values: &'a FeatureVector,
}

/// What the response body says about the prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// `result.predictions["probability(1)"]` was absent.
    Missing,
    /// A numeric probability.
    Probability(f64),
}

/// Parsed response body.
///
/// The body is kept as untyped JSON so that any well-formed document can be
/// inspected; only the prediction path is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResponse {
    body: Value,
}

impl ScoringResponse {
    /// Parses a response body. Fails only when the body is not JSON.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes).map(|body| Self { body })
    }

    #[must_use]
    pub fn from_value(body: Value) -> Self {
        Self { body }
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Extracts the positive-class probability.
    ///
    /// A missing `result`, `predictions` or probability key (or `null`)
    /// yields [`Prediction::Missing`]. A present value that is not a number
    /// is an error.
    pub fn prediction(&self) -> Result<Prediction> {
        let value = self
            .body
            .get("result")
            .and_then(|result| result.get("predictions"))
            .and_then(|predictions| predictions.get(PROBABILITY_KEY));
        match value {
            None | Some(Value::Null) => Ok(Prediction::Missing),
            Some(Value::Number(number)) => number
                .as_f64()
                .map(Prediction::Probability)
                .ok_or_else(|| ModelError::NonNumericProbability(number.to_string())),
            Some(other) => Err(ModelError::NonNumericProbability(other.to_string())),
        }
    }
}
