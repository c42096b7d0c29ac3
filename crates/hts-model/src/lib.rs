//! Data model for HIV Testing Services (HTS) risk screening.
//!
//! The types in this crate describe the three stages of a screening call:
//!
//! - [`RawInput`]: the positional list of clinical attribute codes supplied by
//!   the host workflow.
//! - [`FeatureVector`]: the flat indicator/numeric encoding consumed by the
//!   remote model. Its schema is the closed [`Feature`] enumeration.
//! - [`RiskOutcome`]: the classified result of a scoring call.
//!
//! The wire envelope sent to and received from the scoring endpoint lives in
//! [`wire`].

pub mod error;
pub mod feature;
pub mod raw;
pub mod redact;
pub mod risk;
pub mod wire;

pub use error::{ModelError, Result};
pub use feature::{
    FEATURE_COUNT, Feature, FeatureGroup, FeatureKind, FeatureVector, FeatureVectorBuilder,
};
pub use raw::{RAW_FIELD_COUNT, RawField, RawInput, RawValue};
pub use risk::{
    DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD, NO_RESULTS_MESSAGE,
    RiskAssessment, RiskOutcome, RiskThresholds, RiskTier,
};
pub use wire::{ModelConfigs, Prediction, ScoringRequest, ScoringResponse};
