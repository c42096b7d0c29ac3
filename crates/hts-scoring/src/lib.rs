//! Remote risk scoring for HTS screening.
//!
//! [`ScoringClient`] wraps an encoded [`hts_model::FeatureVector`] in the
//! model configuration envelope, posts it to the configured endpoint and
//! classifies the returned probability into a [`hts_model::RiskTier`].
//!
//! Each call is bounded by a deadline and can be aborted with a
//! [`CancellationToken`]. Failures are reported through [`ScoringError`];
//! a response without a prediction is [`hts_model::RiskOutcome::NoResult`].
//! There is no retry, batching or authentication.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use hts_model::{FeatureVector, RiskOutcome};
//! use hts_scoring::{ScoringClient, ScoringSettings};
//!
//! async fn screen(vector: &FeatureVector) -> hts_scoring::Result<()> {
//!     let settings = ScoringSettings::new("http://scoring.local:8080/api/hts");
//!     let client = ScoringClient::new(settings)?;
//!     let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//!     match client.assess(vector, date).await? {
//!         RiskOutcome::Scored(assessment) => println!("{}", assessment.message()),
//!         RiskOutcome::NoResult => println!("No results found"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;

pub use cancel::CancellationToken;
pub use client::ScoringClient;
pub use config::{DEFAULT_MODEL_ID, DEFAULT_TIMEOUT_SECS, ScoringSettings};
pub use error::{ConfigError, Result, ScoringError};
