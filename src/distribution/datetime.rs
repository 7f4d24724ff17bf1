//! Timestamp domains.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use super::args::{self, DistributionArgs};
use super::base::{Base, BaseBuilder, coerce_with};
use super::ordered::Ordered;
use super::{Distribution, Domain};
use crate::constraints::Constraints;
use crate::error::{Error, Result};
use crate::value::{self, Dtype, Value};

fn observed_datetime(value: &Value) -> Result<NaiveDateTime> {
    value
        .as_datetime()
        .ok_or_else(|| Error::InvalidDataType(format!("{value} is not a valid datetime value")))
}

/// A bounded timestamp range on a grid of `step`.
///
/// `offset` is a tolerance applied by [`includes`](Domain::includes) on both
/// ends; [`has`](Domain::has) checks the exact bounds. Defaults: from the
/// UNIX epoch to now, a step of one microsecond and an offset of two minutes.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use featurespace::{DatetimeDistribution, Domain};
///
/// let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let t1 = t0 + TimeDelta::days(1);
///
/// let day = DatetimeDistribution::builder("ts")
///     .bounds(t0, t1)
///     .offset(TimeDelta::seconds(2))
///     .build()
///     .unwrap();
/// let wider = DatetimeDistribution::builder("ts")
///     .bounds(t0 - TimeDelta::seconds(1), t1 + TimeDelta::seconds(1))
///     .build()
///     .unwrap();
///
/// assert!(day.includes(&wider.into()));
/// ```
#[derive(Clone, Debug)]
pub struct DatetimeDistribution {
    base: Base,
    low: NaiveDateTime,
    high: NaiveDateTime,
    step: TimeDelta,
    offset: TimeDelta,
}

/// Builder for [`DatetimeDistribution`].
#[derive(Clone, Debug)]
pub struct DatetimeDistributionBuilder {
    base: BaseBuilder,
    low: NaiveDateTime,
    high: Option<NaiveDateTime>,
    step: TimeDelta,
    offset: TimeDelta,
}

impl DatetimeDistributionBuilder {
    /// Sets the lower bound (inclusive).
    #[must_use]
    pub fn low(mut self, low: NaiveDateTime) -> Self {
        self.low = low;
        self
    }

    /// Sets the upper bound (inclusive).
    #[must_use]
    pub fn high(mut self, high: NaiveDateTime) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets both bounds.
    #[must_use]
    pub fn bounds(self, low: NaiveDateTime, high: NaiveDateTime) -> Self {
        self.low(low).high(high)
    }

    /// Sets the grid step. Must be positive.
    #[must_use]
    pub fn step(mut self, step: TimeDelta) -> Self {
        self.step = step;
        self
    }

    /// Sets the containment tolerance. Must not be negative.
    #[must_use]
    pub fn offset(mut self, offset: TimeDelta) -> Self {
        self.offset = offset;
        self
    }

    source_setters! {
        /// Supplies observations. Their range replaces the declared bounds and
        /// sampling follows their frequencies.
    }

    /// Resolves observations and validates bounds, step and offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] if the step is not positive,
    /// [`Error::InvalidOffset`] if the offset is negative,
    /// [`Error::InvalidRange`] if `low > high`, and
    /// [`Error::InvalidDataType`] if an observation is not a timestamp.
    pub fn build(self) -> Result<DatetimeDistribution> {
        let base = self
            .base
            .resolve(coerce_with("datetime", |v| v.as_datetime().map(Value::Datetime)))?;
        let (low, high) = match base.observed_bounds()? {
            Some((lo, hi)) => (observed_datetime(&lo)?, observed_datetime(&hi)?),
            None => (
                self.low,
                self.high.unwrap_or_else(|| Utc::now().naive_utc()),
            ),
        };
        if low > high {
            return Err(Error::range(low, high, "low must be less than or equal to high"));
        }
        if self.step <= TimeDelta::zero() {
            return Err(Error::InvalidStep {
                step: Value::Duration(self.step),
            });
        }
        if self.offset < TimeDelta::zero() {
            return Err(Error::InvalidOffset {
                offset: self.offset,
            });
        }
        Ok(DatetimeDistribution {
            base,
            low,
            high,
            step: self.step,
            offset: self.offset,
        })
    }
}

impl DatetimeDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DatetimeDistributionBuilder {
        DatetimeDistributionBuilder {
            base: BaseBuilder::new(name),
            low: DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
            high: None,
            step: TimeDelta::microseconds(1),
            offset: TimeDelta::seconds(120),
        }
    }

    /// Builds from `low`, `high`, `step` and `offset` arguments.
    ///
    /// # Errors
    ///
    /// See [`DatetimeDistributionBuilder::build`].
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        let mut builder = Self::builder(name);
        if let Some(low) = args::datetime("low", args.low.as_ref())? {
            builder = builder.low(low);
        }
        if let Some(high) = args::datetime("high", args.high.as_ref())? {
            builder = builder.high(high);
        }
        if let Some(step) = args::duration("step", args.step.as_ref())? {
            builder = builder.step(step);
        }
        if let Some(offset) = args::duration("offset", args.offset.as_ref())? {
            builder = builder.offset(offset);
        }
        builder.build()
    }

    bound_accessors!(NaiveDateTime);

    /// Grid step.
    #[must_use]
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Containment tolerance.
    #[must_use]
    pub fn offset(&self) -> TimeDelta {
        self.offset
    }

    /// Returns `(name, low, high, step, offset)`.
    #[must_use]
    pub fn get(&self) -> (&str, NaiveDateTime, NaiveDateTime, TimeDelta, TimeDelta) {
        (&self.base.name, self.low, self.high, self.step, self.offset)
    }
}

impl Ordered for DatetimeDistribution {}

impl Domain for DatetimeDistribution {
    base_domain!(Datetime);

    fn args(&self) -> DistributionArgs {
        DistributionArgs {
            step: Some(Value::Duration(self.step)),
            offset: Some(Value::Duration(self.offset)),
            ..DistributionArgs::bounds(self.low, self.high)
        }
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        let step = value::nanos(self.step);
        let n = value::nanos(self.high - self.low) / step + 1;
        self.base.sample_with(count, |rng| {
            let index = rng.i128(0..n);
            let ts = value::from_nanos(index * step)
                .and_then(|delta| self.low.checked_add_signed(delta))
                .unwrap_or(self.high);
            Value::Datetime(ts)
        })
    }

    fn has(&self, value: &Value) -> bool {
        self.within(value)
    }

    fn includes(&self, other: &Distribution) -> bool {
        let Distribution::Datetime(other) = other else {
            return false;
        };
        let low = self
            .low
            .checked_sub_signed(self.offset)
            .unwrap_or(NaiveDateTime::MIN);
        let high = self
            .high
            .checked_add_signed(self.offset)
            .unwrap_or(NaiveDateTime::MAX);
        low <= other.low && other.high <= high
    }

    fn as_constraint(&self) -> Constraints {
        self.range_constraint()
    }

    fn min(&self) -> Value {
        Value::Datetime(self.low)
    }

    fn max(&self) -> Value {
        Value::Datetime(self.high)
    }

    fn dtype(&self) -> Dtype {
        Dtype::Datetime
    }
}

eq_by_get!(DatetimeDistribution);

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::constraints::{Op, Rule};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn defaults() {
        let dist = DatetimeDistribution::builder("ts").build().unwrap();
        let (name, low, high, step, offset) = dist.get();
        assert_eq!(name, "ts");
        assert_eq!(low, DateTime::<Utc>::UNIX_EPOCH.naive_utc());
        assert!(high > low);
        assert_eq!(step, TimeDelta::microseconds(1));
        assert_eq!(offset, TimeDelta::seconds(120));
    }

    #[test]
    fn samples_land_on_the_grid() {
        let dist = DatetimeDistribution::builder("ts")
            .bounds(t0(), t0() + TimeDelta::minutes(10))
            .step(TimeDelta::minutes(3))
            .build()
            .unwrap();
        let grid: Vec<Value> = (0..4)
            .map(|k| Value::Datetime(t0() + TimeDelta::minutes(3 * k)))
            .collect();
        for v in dist.sample(100) {
            assert!(grid.contains(&v), "{v} is off the grid");
        }
    }

    #[test]
    fn has_ignores_offset() {
        let dist = DatetimeDistribution::builder("ts")
            .bounds(t0(), t0() + TimeDelta::hours(1))
            .build()
            .unwrap();
        assert!(dist.has(&Value::Datetime(t0())));
        assert!(!dist.has(&Value::Datetime(t0() - TimeDelta::seconds(1))));
        assert!(!dist.has(&Value::from(0)));
    }

    #[test]
    fn includes_tolerates_offset() {
        let t1 = t0() + TimeDelta::hours(1);
        let dist = DatetimeDistribution::builder("ts")
            .bounds(t0(), t1)
            .offset(TimeDelta::seconds(2))
            .build()
            .unwrap();
        let inside: Distribution = DatetimeDistribution::builder("ts")
            .bounds(t0() - TimeDelta::seconds(1), t1 + TimeDelta::seconds(1))
            .build()
            .unwrap()
            .into();
        let outside: Distribution = DatetimeDistribution::builder("ts")
            .bounds(t0() - TimeDelta::seconds(3), t1)
            .build()
            .unwrap()
            .into();
        assert!(dist.includes(&inside));
        assert!(!dist.includes(&outside));

        let numeric: Distribution = crate::FloatDistribution::builder("ts").build().unwrap().into();
        assert!(!dist.includes(&numeric));
    }

    #[test]
    fn rejects_bad_step_offset_and_range() {
        assert!(matches!(
            DatetimeDistribution::builder("ts").step(TimeDelta::zero()).build(),
            Err(Error::InvalidStep { .. })
        ));
        assert!(matches!(
            DatetimeDistribution::builder("ts").offset(TimeDelta::seconds(-1)).build(),
            Err(Error::InvalidOffset { .. })
        ));
        assert!(matches!(
            DatetimeDistribution::builder("ts")
                .bounds(t0(), t0() - TimeDelta::seconds(1))
                .build(),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn observations_set_bounds() {
        let later = t0() + TimeDelta::days(3);
        let dist = DatetimeDistribution::builder("ts")
            .data([Value::Datetime(later), Value::Missing, Value::Datetime(t0())])
            .build()
            .unwrap();
        assert_eq!(dist.low(), t0());
        assert_eq!(dist.high(), later);

        let result = DatetimeDistribution::builder("ts").data([1, 2]).build();
        assert!(matches!(result, Err(Error::InvalidDataType(_))));
    }

    #[test]
    fn constraint_omits_step_and_offset() {
        let t1 = t0() + TimeDelta::hours(1);
        let dist = DatetimeDistribution::builder("ts").bounds(t0(), t1).build().unwrap();
        assert_eq!(
            dist.as_constraint().rules(),
            &[
                Rule::new("ts", Op::Le(Value::Datetime(t1))),
                Rule::new("ts", Op::Ge(Value::Datetime(t0()))),
                Rule::new("ts", Op::Dtype("datetime".into())),
            ]
        );
    }
}
