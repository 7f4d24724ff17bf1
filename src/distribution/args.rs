//! Keyword-style arguments shared by every distribution kind.

use chrono::{NaiveDateTime, TimeDelta};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// The defining fields of a distribution, in fixed order.
///
/// Each kind reads only the fields it defines:
///
/// | Kind | Fields |
/// |------|--------|
/// | categorical | `choices` |
/// | float, log, int log | `low`, `high` |
/// | integer | `low`, `high`, `step` |
/// | datetime | `low`, `high`, `step`, `offset` |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DistributionArgs {
    /// Categorical choices.
    pub choices: Option<Vec<Value>>,
    /// Lower bound.
    pub low: Option<Value>,
    /// Upper bound.
    pub high: Option<Value>,
    /// Grid step: an integer, or a duration for datetimes.
    pub step: Option<Value>,
    /// Containment tolerance for datetimes.
    pub offset: Option<Value>,
}

impl DistributionArgs {
    /// Arguments with only bounds set.
    #[must_use]
    pub fn bounds(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            low: Some(low.into()),
            high: Some(high.into()),
            ..Self::default()
        }
    }

    /// Arguments with only choices set.
    #[must_use]
    pub fn choices<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: Some(choices.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}

fn mismatch(field: &str, expected: &str, got: &Value) -> Error {
    Error::InvalidDataType(format!("{field} must be {expected}, got {got}"))
}

pub(crate) fn float(field: &str, value: Option<&Value>) -> Result<Option<f64>> {
    value
        .map(|v| v.as_f64().ok_or_else(|| mismatch(field, "a number", v)))
        .transpose()
}

pub(crate) fn int(field: &str, value: Option<&Value>) -> Result<Option<i64>> {
    value
        .map(|v| v.as_i64().ok_or_else(|| mismatch(field, "an integer", v)))
        .transpose()
}

pub(crate) fn datetime(field: &str, value: Option<&Value>) -> Result<Option<NaiveDateTime>> {
    value
        .map(|v| v.as_datetime().ok_or_else(|| mismatch(field, "a datetime", v)))
        .transpose()
}

pub(crate) fn duration(field: &str, value: Option<&Value>) -> Result<Option<TimeDelta>> {
    value
        .map(|v| v.as_duration().ok_or_else(|| mismatch(field, "a duration", v)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_wrong_types() {
        assert_eq!(float("low", Some(&Value::from(2))).unwrap(), Some(2.0));
        assert_eq!(float("low", None).unwrap(), None);
        assert!(float("low", Some(&Value::from("x"))).is_err());
        assert_eq!(int("step", Some(&Value::from(3.0))).unwrap(), Some(3));
        assert!(int("step", Some(&Value::from(3.5))).is_err());
        assert!(datetime("low", Some(&Value::from(1))).is_err());
        assert!(duration("offset", Some(&Value::from(1))).is_err());
    }

    #[test]
    fn constructors_fill_only_their_fields() {
        let args = DistributionArgs::bounds(1, 2);
        assert_eq!(args.low, Some(Value::from(1)));
        assert!(args.choices.is_none() && args.step.is_none());

        let args = DistributionArgs::choices(["a"]);
        assert_eq!(args.choices, Some(vec![Value::from("a")]));
        assert!(args.low.is_none());
    }
}
