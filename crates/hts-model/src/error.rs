use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error(
        "risk thresholds must satisfy 0 <= low < medium < high <= 1 (got low={low}, medium={medium}, high={high})"
    )]
    InvalidThresholds { low: f64, medium: f64, high: f64 },

    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("probability is not a number: {0}")]
    NonNumericProbability(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
