/// Errors raised while validating or running a sequential-learning experiment.
///
/// Every variant is a local, deterministic failure: running the same
/// request again reproduces it, so callers should surface it to the user
/// instead of retrying.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the request is malformed: mismatched setting arrays,
    /// overlapping or empty partitions, missing columns or values.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of what is wrong with the request.
        reason: String,
    },

    /// Returned when the model selector names no known surrogate backend.
    #[error("invalid model: {0}")]
    UnsupportedModel(String),

    /// Returned when a target's optimization direction is neither `min` nor `max`.
    #[error("invalid value for max_or_min, got {0}")]
    InvalidDirection(String),

    /// Returned when a dataset or table lookup names a column that does not exist.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Returned when the Gaussian-process kernel matrix cannot be factorised.
    #[error("model fitting failed: {0}")]
    ModelFit(String),
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
