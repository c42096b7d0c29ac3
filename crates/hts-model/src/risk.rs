//! Risk tiers and threshold classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Probability at or below which a client is low risk.
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.002_625_179;
/// Probability at or below which a client is medium risk.
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.010_638_781;
/// Probability at or below which a client is high risk; above is very high.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.028_924_102;

/// Message shown when the scoring endpoint returned no prediction.
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Ordered HIV-test risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskTier {
    /// All tiers, lowest first.
    pub const ALL: [RiskTier; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        }
    }

    /// Recommendation shown to the provider.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::VeryHigh => {
                "This client has a very high probability of a HIV positive test result. Testing is strongly recommended"
            }
            Self::High => {
                "This client has a high probability of a HIV positive test result. Testing is strongly recommended"
            }
            Self::Medium => {
                "This client has a medium probability of a HIV positive test result. Testing is recommended"
            }
            Self::Low => {
                "This client has a low probability of a HIV positive test result. Testing may not be recommended"
            }
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probability cut-offs separating the four tiers.
///
/// Always strictly ordered: `0 <= low < medium < high <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdValues", into = "ThresholdValues")]
pub struct RiskThresholds {
    low: f64,
    medium: f64,
    high: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdValues {
    low: f64,
    medium: f64,
    high: f64,
}

impl TryFrom<ThresholdValues> for RiskThresholds {
    type Error = ModelError;

    fn try_from(values: ThresholdValues) -> Result<Self> {
        Self::new(values.low, values.medium, values.high)
    }
}

impl From<RiskThresholds> for ThresholdValues {
    fn from(thresholds: RiskThresholds) -> Self {
        Self {
            low: thresholds.low,
            medium: thresholds.medium,
            high: thresholds.high,
        }
    }
}

impl RiskThresholds {
    pub fn new(low: f64, medium: f64, high: f64) -> Result<Self> {
        let in_range = |value: f64| (0.0..=1.0).contains(&value);
        if !(in_range(low) && in_range(medium) && in_range(high) && low < medium && medium < high)
        {
            return Err(ModelError::InvalidThresholds { low, medium, high });
        }
        Ok(Self { low, medium, high })
    }

    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    #[must_use]
    pub const fn medium(&self) -> f64 {
        self.medium
    }

    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Maps a probability to its tier.
    ///
    /// Checked from the highest threshold down; a probability equal to a
    /// threshold falls to the lower tier.
    #[must_use]
    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability > self.high {
            RiskTier::VeryHigh
        } else if probability > self.medium {
            RiskTier::High
        } else if probability > self.low {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Classifies a probability after checking it lies in [0, 1].
    pub fn assess(&self, probability: f64) -> Result<RiskAssessment> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::ProbabilityOutOfRange(probability));
        }
        Ok(RiskAssessment {
            probability,
            tier: self.classify(probability),
        })
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

/// A scored probability together with its tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub tier: RiskTier,
}

impl RiskAssessment {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.tier.message()
    }
}

/// Result of a scoring call that reached the endpoint and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RiskOutcome {
    /// The endpoint returned a probability.
    Scored(RiskAssessment),
    /// The response carried no prediction.
    NoResult,
}

impl RiskOutcome {
    #[must_use]
    pub const fn tier(&self) -> Option<RiskTier> {
        match self {
            Self::Scored(assessment) => Some(assessment.tier),
            Self::NoResult => None,
        }
    }

    /// Recommendation text, or [`NO_RESULTS_MESSAGE`].
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Scored(assessment) => assessment.message(),
            Self::NoResult => NO_RESULTS_MESSAGE,
        }
    }
}

impl fmt::Display for RiskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_probabilities() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.classify(0.03), RiskTier::VeryHigh);
        assert_eq!(thresholds.classify(0.02), RiskTier::High);
        // Just under the medium threshold.
        assert_eq!(thresholds.classify(0.01), RiskTier::Medium);
        assert_eq!(thresholds.classify(0.005), RiskTier::Medium);
        assert_eq!(thresholds.classify(0.001), RiskTier::Low);
    }

    #[test]
    fn boundaries_fall_to_lower_tier() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.classify(DEFAULT_HIGH_THRESHOLD), RiskTier::High);
        assert_eq!(thresholds.classify(DEFAULT_MEDIUM_THRESHOLD), RiskTier::Medium);
        assert_eq!(thresholds.classify(DEFAULT_LOW_THRESHOLD), RiskTier::Low);
        assert_eq!(thresholds.classify(0.0), RiskTier::Low);
        assert_eq!(thresholds.classify(1.0), RiskTier::VeryHigh);
    }

    #[test]
    fn messages_name_their_tier() {
        assert!(RiskTier::VeryHigh.message().contains("very high probability"));
        assert!(RiskTier::VeryHigh.message().contains("strongly recommended"));
        assert!(RiskTier::High.message().contains(" high probability"));
        assert!(RiskTier::Medium.message().contains("medium probability"));
        assert!(RiskTier::Medium.message().ends_with("Testing is recommended"));
        assert!(RiskTier::Low.message().contains("may not be recommended"));
    }

    #[test]
    fn rejects_unordered_thresholds() {
        assert!(RiskThresholds::new(0.1, 0.1, 0.2).is_err());
        assert!(RiskThresholds::new(0.3, 0.2, 0.1).is_err());
        assert!(RiskThresholds::new(0.1, 0.2, 1.5).is_err());
        assert!(RiskThresholds::new(f64::NAN, 0.2, 0.3).is_err());
        assert!(RiskThresholds::new(0.0, 0.5, 1.0).is_ok());
    }

    #[test]
    fn assess_rejects_out_of_range() {
        let thresholds = RiskThresholds::default();
        assert_eq!(
            thresholds.assess(1.2),
            Err(ModelError::ProbabilityOutOfRange(1.2))
        );
        assert!(thresholds.assess(f64::NAN).is_err());
        let assessment = thresholds.assess(0.03).unwrap();
        assert_eq!(assessment.tier, RiskTier::VeryHigh);
    }

    #[test]
    fn thresholds_deserialize_with_validation() {
        let parsed: RiskThresholds =
            serde_json::from_str(r#"{"low":0.1,"medium":0.2,"high":0.3}"#).unwrap();
        assert_eq!(parsed.medium(), 0.2);
        let err = serde_json::from_str::<RiskThresholds>(r#"{"low":0.3,"medium":0.2,"high":0.1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn no_result_uses_sentinel() {
        assert_eq!(RiskOutcome::NoResult.message(), NO_RESULTS_MESSAGE);
        assert_eq!(RiskOutcome::NoResult.tier(), None);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::High < RiskTier::VeryHigh);
    }
}
