//! Observed and sampled feature values.

use core::cmp::Ordering;
use core::fmt;

use chrono::{NaiveDateTime, TimeDelta};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single feature value.
///
/// `Value` is what observations are made of, what distributions sample, and
/// what constraint rules compare against. It has a total order so that it can
/// key a frequency table and be sorted: values are ordered first by variant
/// (in declaration order) and then naturally within a variant. Integers and
/// floats share one numeric order, so `Int(2) == Float(2.0)`. Floats follow
/// [`f64::total_cmp`] except that both zeros are equal.
///
/// # Examples
///
/// ```
/// use featurespace::Value;
///
/// let mut values = vec![Value::from("b"), Value::from(2), Value::Missing, Value::from("a")];
/// values.sort();
/// assert_eq!(values, vec![Value::Missing, Value::from(2), Value::from("a"), Value::from("b")]);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A missing observation.
    Missing,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string label.
    Str(String),
    /// A naive timestamp.
    Datetime(NaiveDateTime),
    /// A time span.
    Duration(#[cfg_attr(feature = "serde", serde(with = "duration_nanos"))] TimeDelta),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Missing => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Datetime(_) => 5,
            Value::Duration(_) => 6,
        }
    }

    fn is_nan(&self) -> bool {
        matches!(self, Value::Float(v) if v.is_nan())
    }

    /// Returns `true` for [`Value::Missing`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the value as `f64` if it is an integer or a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer or an integral float
    /// within `i64` range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v)
                if v.is_finite() && v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    /// Returns the timestamp if this is a datetime value.
    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Datetime(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the time span if this is a duration value.
    #[must_use]
    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(v) => Some(*v),
            _ => None,
        }
    }

    /// Compares two values the way a range rule would.
    ///
    /// Integers and floats compare numerically with each other; integers
    /// against integers compare exactly. Other variants only compare within
    /// the same variant. Returns `None` when the values are not comparable.
    #[must_use]
    pub fn range_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            _ if self.is_nan() || other.is_nan() => None,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                Some(self.cmp(other))
            }
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Datetime(a), Value::Datetime(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Missing, Value::Missing) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => float_cmp(*a, *b),
            (Value::Int(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Int(b)) => int_float_cmp(*b, *a).reverse(),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Datetime(a), Value::Datetime(b)) => a.cmp(b),
            (Value::Duration(a), Value::Duration(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// `total_cmp` with the two zeros identified, so that `-0.0 == 0 == 0.0`.
fn float_cmp(a: f64, b: f64) -> Ordering {
    if a == b { Ordering::Equal } else { a.total_cmp(&b) }
}

/// Exact comparison of an integer with a float. NaNs sort by sign beyond
/// every integer, as `total_cmp` places them beyond the infinities.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn int_float_cmp(a: i64, b: f64) -> Ordering {
    // 2^63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= LIMIT {
        return Ordering::Less;
    }
    if b < -LIMIT {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal if b > whole => Ordering::Less,
        Ordering::Equal if b < whole => Ordering::Greater,
        ord => ord,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "<missing>"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Datetime(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Datetime(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

/// The storage type a distribution's values are expected to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dtype {
    /// Arbitrary labels.
    Object,
    /// Real numbers.
    Float,
    /// Integers.
    Int,
    /// Timestamps.
    Datetime,
}

impl Dtype {
    /// Classifies a single value.
    ///
    /// Missing values count as floats, booleans as integers, and strings and
    /// durations as objects.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Missing | Value::Float(_) => Dtype::Float,
            Value::Bool(_) | Value::Int(_) => Dtype::Int,
            Value::Datetime(_) => Dtype::Datetime,
            Value::Str(_) | Value::Duration(_) => Dtype::Object,
        }
    }

    /// Returns the canonical tag: `"object"`, `"float"`, `"int"` or `"datetime"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::Object => "object",
            Dtype::Float => "float",
            Dtype::Int => "int",
            Dtype::Datetime => "datetime",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn from_nanos(nanos: i128) -> Option<TimeDelta> {
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let subsec = nanos.rem_euclid(1_000_000_000) as u32;
    TimeDelta::new(secs, subsec)
}

#[cfg(feature = "serde")]
pub(crate) mod duration_nanos {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn serialize<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        super::nanos(*delta).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let nanos = i128::deserialize(deserializer)?;
        super::from_nanos(nanos).ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_variant_then_value_with_numbers_merged() {
        let mut values = vec![
            Value::from(2.5),
            Value::from("x"),
            Value::from(3),
            Value::Missing,
            Value::from(-1),
            Value::from(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Missing,
                Value::from(true),
                Value::from(-1),
                Value::from(2.5),
                Value::from(3),
                Value::from("x"),
            ]
        );
    }

    #[test]
    fn integers_and_floats_compare_exactly() {
        assert_eq!(Value::from(2), Value::from(2.0));
        assert_eq!(Value::from(0), Value::from(-0.0));
        assert_eq!(Value::from(0.0), Value::from(-0.0));
        assert!(Value::from(1) < Value::from(1.5));
        assert!(Value::from(-1) > Value::from(-1.5));
        assert!(Value::from(i64::MAX) < Value::from(9.3e18));
        assert!(Value::from(i64::MIN) > Value::from(f64::NEG_INFINITY));
        assert!(Value::from(i64::MAX) < Value::from(f64::NAN));
        assert!(Value::from(i64::MAX) > Value::from(i64::MAX as f64 - 4096.0));
    }

    #[test]
    fn nan_equals_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn range_cmp_mixes_numbers() {
        assert_eq!(Value::from(1).range_cmp(&Value::from(1.5)), Some(Ordering::Less));
        assert_eq!(Value::from(2.0).range_cmp(&Value::from(2)), Some(Ordering::Equal));
        assert_eq!(Value::from(i64::MAX).range_cmp(&Value::from(i64::MAX - 1)), Some(Ordering::Greater));
        assert_eq!(Value::from("a").range_cmp(&Value::from(1)), None);
        assert_eq!(Value::from(1).range_cmp(&Value::from(f64::NAN)), None);
    }

    #[test]
    fn as_i64_accepts_integral_floats_only() {
        assert_eq!(Value::from(4.0).as_i64(), Some(4));
        assert_eq!(Value::from(4.5).as_i64(), None);
        assert_eq!(Value::from(f64::NAN).as_i64(), None);
        assert_eq!(Value::from("4").as_i64(), None);
    }

    #[test]
    fn option_none_is_missing() {
        assert!(Value::from(None::<i64>).is_missing());
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn dtype_classification() {
        assert_eq!(Dtype::of(&Value::Missing), Dtype::Float);
        assert_eq!(Dtype::of(&Value::from(true)), Dtype::Int);
        assert_eq!(Dtype::of(&Value::from("a")), Dtype::Object);
        assert_eq!(Dtype::Datetime.as_str(), "datetime");
    }

    #[test]
    fn nanos_round_trip() {
        let delta = TimeDelta::milliseconds(-1500);
        assert_eq!(from_nanos(nanos(delta)), Some(delta));
    }
}
