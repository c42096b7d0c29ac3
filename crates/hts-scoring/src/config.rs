//! Configuration for the scoring client.
//!
//! The endpoint has no built-in default: every deployment names its own
//! scoring service, typically in a TOML file:
//!
//! ```toml
//! endpoint = "https://scoring.example.org/api/hts"
//! model_id = "hts_risk"
//! facility_id = "13939"
//! timeout_secs = 20.5
//!
//! [thresholds]
//! low = 0.002625179
//! medium = 0.010638781
//! high = 0.028924102
//! ```

use std::path::Path;
use std::time::Duration;

use hts_model::RiskThresholds;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Model identifier sent when the config does not name one.
pub const DEFAULT_MODEL_ID: &str = "hts_risk";

/// Deadline applied when the caller does not supply one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

const fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for [`crate::ScoringClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringSettings {
    /// Full URL of the scoring endpoint.
    pub endpoint: String,

    /// Model identifier forwarded in `modelConfigs.modelId`.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Facility identifier forwarded in `modelConfigs.facilityId`.
    #[serde(default)]
    pub facility_id: String,

    /// Ask the endpoint for debug output.
    #[serde(default)]
    pub debug: bool,

    /// Default request deadline in seconds; fractions are allowed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Probability cut-offs for the risk tiers.
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

impl ScoringSettings {
    /// Creates settings for an endpoint with every other field at its default.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model_id: default_model_id(),
            facility_id: String::new(),
            debug: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            thresholds: RiskThresholds::default(),
        }
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a TOML settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded scoring config");
        Self::from_toml_str(&text)
    }

    /// Checks the endpoint URL and deadline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::invalid("endpoint must not be empty"));
        }
        let url = Url::parse(endpoint).map_err(|error| {
            ConfigError::invalid(format!("endpoint {endpoint:?} is not a valid URL: {error}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(format!(
                "endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::invalid(format!(
                "endpoint has no host: {endpoint:?}"
            )));
        }
        match Duration::try_from_secs_f64(self.timeout_secs) {
            Ok(timeout) if !timeout.is_zero() => {}
            _ => {
                return Err(ConfigError::invalid(format!(
                    "timeout_secs must be a positive number of seconds, got {}",
                    self.timeout_secs
                )));
            }
        }
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::invalid("model_id must not be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_facility_id(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = facility_id.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs_f64();
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Default request deadline. Zero when `timeout_secs` is out of range,
    /// which [`Self::validate`] rejects.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let settings = ScoringSettings::from_toml_str(r#"endpoint = "http://10.0.0.5:8080/score""#)
            .unwrap();
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
        assert_eq!(settings.timeout(), Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.thresholds, RiskThresholds::default());
        assert!(!settings.debug);
    }

    #[test]
    fn full_config_parses() {
        let settings = ScoringSettings::from_toml_str(
            r#"
            endpoint = "https://scoring.example.org/api/hts"
            model_id = "hts_xgb"
            facility_id = "13939"
            debug = true
            timeout_secs = 5

            [thresholds]
            low = 0.1
            medium = 0.2
            high = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(settings.facility_id, "13939");
        assert!(settings.debug);
        assert_eq!(settings.thresholds.high(), 0.3);
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let err = ScoringSettings::from_toml_str(r#"model_id = "hts""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let err = ScoringSettings::from_toml_str(
            r#"
            endpoint = "http://localhost/score"
            [thresholds]
            low = 0.3
            medium = 0.2
            high = 0.1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn validation_catches_bad_values() {
        for bad in [
            ScoringSettings::new(""),
            ScoringSettings::new("ftp://host/score"),
            ScoringSettings::new("http://"),
            ScoringSettings::new("http://:8080/score"),
            ScoringSettings::new("http://exa mple.org/score"),
            ScoringSettings::new("http://?x"),
            ScoringSettings::new("localhost:9000/score"),
            ScoringSettings {
                timeout_secs: 0.0,
                ..ScoringSettings::new("http://localhost/score")
            },
            ScoringSettings {
                timeout_secs: -1.0,
                ..ScoringSettings::new("http://localhost/score")
            },
            ScoringSettings {
                timeout_secs: f64::NAN,
                ..ScoringSettings::new("http://localhost/score")
            },
        ] {
            assert!(
                matches!(bad.validate(), Err(ConfigError::Invalid { .. })),
                "{bad:?}"
            );
        }
        assert!(ScoringSettings::new("http://localhost:9000/score").validate().is_ok());
    }

    #[test]
    fn timeout_override_keeps_exact_deadline() {
        let zero = ScoringSettings::new("http://localhost/score").with_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid { .. })));

        let settings =
            ScoringSettings::new("http://localhost/score").with_timeout(Duration::from_millis(1500));
        assert!(settings.validate().is_ok());
        assert_eq!(settings.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn fractional_timeout_parses() {
        let settings = ScoringSettings::from_toml_str(
            r#"
            endpoint = "http://localhost/score"
            timeout_secs = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(settings.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ScoringSettings::from_toml_str(
            r#"
            endpoint = "http://localhost/score"
            retries = 3
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScoringSettings::load(Path::new("/nonexistent/hts-scoring.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hts-scoring.toml"));
    }
}
