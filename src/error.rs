use chrono::TimeDelta;

use crate::value::Value;

/// Errors raised while constructing or reconstructing a distribution.
///
/// Every error is a construction-time failure. A distribution that was built
/// successfully never fails afterwards.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a categorical distribution has neither observations nor choices.
    #[error("invalid choices for categorical distribution: provide observations or choices")]
    InvalidChoices,

    /// Returned when an integer step is below 1, a log-integer step is not 1,
    /// or a datetime step is not positive.
    #[error("invalid step: {step}")]
    InvalidStep {
        /// The rejected step.
        step: Value,
    },

    /// Returned when a datetime containment offset is negative.
    #[error("invalid offset: {offset} must not be negative")]
    InvalidOffset {
        /// The rejected offset.
        offset: TimeDelta,
    },

    /// Returned when the bounds of an ordered distribution are unusable.
    #[error("invalid range [{low}, {high}]: {reason}")]
    InvalidRange {
        /// The lower bound value.
        low: Value,
        /// The upper bound value.
        high: Value,
        /// Why the range was rejected.
        reason: &'static str,
    },

    /// Returned when observed data cannot be represented by the distribution.
    #[error("invalid data type: {0}")]
    InvalidDataType(String),

    /// Returned when constraints carry no rules for the requested feature.
    #[error("no constraint rules found for feature '{feature}'")]
    UnknownConstraintKind {
        /// The feature that was looked up.
        feature: String,
    },

    /// Returned when a distribution kind name is not recognised.
    #[error("unknown distribution kind '{0}'")]
    UnknownDistributionKind(String),

    /// Returned when normalizing a marginal that holds no observations.
    #[error("marginal distribution is empty")]
    EmptyMarginal,
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn range(low: impl Into<Value>, high: impl Into<Value>, reason: &'static str) -> Self {
        Error::InvalidRange {
            low: low.into(),
            high: high.into(),
            reason,
        }
    }
}
