//! HTTP client for the remote scoring endpoint.
//!
//! One call performs exactly one `POST` of the [`ScoringRequest`] built from
//! the caller's feature vector and classifies the returned probability.

use std::time::Duration;

use chrono::NaiveDate;
use hts_model::{
    FeatureVector, ModelConfigs, Prediction, RiskOutcome, RiskTier, ScoringRequest,
    ScoringResponse,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::cancel::CancellationToken;
use crate::config::ScoringSettings;
use crate::error::{Result, ScoringError};

/// User agent string for scoring requests.
const USER_AGENT_VALUE: &str = concat!("hts-risk/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in [`ScoringError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Client for the remote HTS risk scoring endpoint.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: reqwest::Client,
    settings: ScoringSettings,
}

impl ScoringClient {
    /// Creates a client for the configured endpoint.
    pub fn new(settings: ScoringSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ScoringError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Builds the request envelope for a vector and encounter date.
    #[must_use]
    pub fn request_for<'a>(
        &self,
        vector: &'a FeatureVector,
        encounter_date: NaiveDate,
    ) -> ScoringRequest<'a> {
        ScoringRequest {
            model_configs: ModelConfigs {
                model_id: self.settings.model_id.clone(),
                encounter_date,
                facility_id: self.settings.facility_id.clone(),
                debug: self.settings.debug,
            },
            variable_values: vector,
        }
    }

    /// Classifies a probability with the configured thresholds.
    #[must_use]
    pub fn classify(&self, probability: f64) -> RiskTier {
        self.settings.thresholds.classify(probability)
    }

    /// Scores a vector using the configured deadline and no cancellation.
    pub async fn assess(
        &self,
        vector: &FeatureVector,
        encounter_date: NaiveDate,
    ) -> Result<RiskOutcome> {
        self.assess_with(
            vector,
            encounter_date,
            self.settings.timeout(),
            &CancellationToken::new(),
        )
        .await
    }

    /// Scores a vector, giving up after `deadline` or when `cancel` fires.
    pub async fn assess_with(
        &self,
        vector: &FeatureVector,
        encounter_date: NaiveDate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<RiskOutcome> {
        if cancel.is_cancelled() {
            return Err(ScoringError::Cancelled);
        }

        let request = self.request_for(vector, encounter_date);
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("scoring request cancelled");
                Err(ScoringError::Cancelled)
            }
            outcome = tokio::time::timeout(deadline, self.send(&request)) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(?deadline, endpoint = %self.settings.endpoint, "scoring request timed out");
                    Err(ScoringError::Timeout(deadline))
                }
            },
        }
    }

    async fn send(&self, request: &ScoringRequest<'_>) -> Result<RiskOutcome> {
        tracing::debug!(
            endpoint = %self.settings.endpoint,
            model_id = %request.model_configs.model_id,
            encounter_date = %request.model_configs.encounter_date,
            "posting scoring request"
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    tracing::debug!(%error, "could not read error response body");
                    String::new()
                }
            };
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            tracing::warn!(status = status.as_u16(), "scoring endpoint returned an error status");
            return Err(ScoringError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed = ScoringResponse::from_slice(&bytes)?;
        self.outcome(&parsed)
    }

    /// Maps a parsed response to an outcome.
    pub fn outcome(&self, response: &ScoringResponse) -> Result<RiskOutcome> {
        match response.prediction()? {
            Prediction::Missing => {
                tracing::info!("scoring response carried no prediction");
                Ok(RiskOutcome::NoResult)
            }
            Prediction::Probability(probability) => {
                let assessment = self.settings.thresholds.assess(probability)?;
                tracing::info!(probability, tier = %assessment.tier, "scored client");
                Ok(RiskOutcome::Scored(assessment))
            }
        }
    }
}
