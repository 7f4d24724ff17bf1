//! Integer domains on a step grid or sampled in log2 space.

use super::args::{self, DistributionArgs};
use super::base::{Base, BaseBuilder, coerce_with};
use super::ordered::Ordered;
use super::Domain;
use crate::error::{Error, Result};
use crate::rng_util;
use crate::value::Value;

fn coerce_int() -> impl FnMut(Value) -> Result<Value> {
    coerce_with("integer", |v| v.as_i64().map(Value::Int))
}

fn observed_i64(value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::InvalidDataType(format!("{value} is not a valid integer value")))
}

fn resolve_bounds(base: &Base, low: i64, high: i64) -> Result<(i64, i64)> {
    let (low, high) = match base.observed_bounds()? {
        Some((lo, hi)) => (observed_i64(&lo)?, observed_i64(&hi)?),
        None => (low, high),
    };
    if low > high {
        return Err(Error::range(low, high, "low must be less than or equal to high"));
    }
    Ok((low, high))
}

/// A bounded integer range on the grid `low, low + step, low + 2 * step, ...`.
///
/// Without a marginal, samples are uniform over the grid points that do not
/// exceed `high`. Support tests ignore the grid and only check the bounds.
///
/// # Examples
///
/// ```
/// use featurespace::{Domain, IntegerDistribution, Value};
///
/// let dist = IntegerDistribution::builder("units")
///     .bounds(0, 10)
///     .step(3)
///     .build()
///     .unwrap();
///
/// for v in dist.sample(100) {
///     assert!([0, 3, 6, 9].map(Value::from).contains(&v));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct IntegerDistribution {
    base: Base,
    low: i64,
    high: i64,
    step: i64,
}

/// Builder for [`IntegerDistribution`].
#[derive(Clone, Debug)]
pub struct IntegerDistributionBuilder {
    base: BaseBuilder,
    low: i64,
    high: i64,
    step: i64,
}

impl IntegerDistributionBuilder {
    bound_setters!(i64);

    /// Sets the grid step. Must be at least 1.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    source_setters! {
        /// Supplies observations. Their range replaces the declared bounds and
        /// sampling follows their frequencies.
    }

    /// Resolves observations and validates bounds and step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] if `step < 1`, [`Error::InvalidRange`]
    /// if `low > high`, and [`Error::InvalidDataType`] if an observation is
    /// not an integer.
    pub fn build(self) -> Result<IntegerDistribution> {
        let base = self.base.resolve(coerce_int())?;
        let (low, high) = resolve_bounds(&base, self.low, self.high)?;
        if self.step < 1 {
            return Err(Error::InvalidStep {
                step: Value::Int(self.step),
            });
        }
        Ok(IntegerDistribution {
            base,
            low,
            high,
            step: self.step,
        })
    }
}

impl IntegerDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> IntegerDistributionBuilder {
        IntegerDistributionBuilder {
            base: BaseBuilder::new(name),
            low: i64::MIN,
            high: i64::MAX,
            step: 1,
        }
    }

    /// Builds from `low`, `high` and `step` arguments.
    ///
    /// # Errors
    ///
    /// See [`IntegerDistributionBuilder::build`].
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        let mut builder = Self::builder(name);
        if let Some(low) = args::int("low", args.low.as_ref())? {
            builder = builder.low(low);
        }
        if let Some(high) = args::int("high", args.high.as_ref())? {
            builder = builder.high(high);
        }
        if let Some(step) = args::int("step", args.step.as_ref())? {
            builder = builder.step(step);
        }
        builder.build()
    }

    bound_accessors!(i64);

    /// Grid step.
    #[must_use]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Returns `(name, low, high, step)`.
    #[must_use]
    pub fn get(&self) -> (&str, i64, i64, i64) {
        (&self.base.name, self.low, self.high, self.step)
    }
}

impl Ordered for IntegerDistribution {}

impl Domain for IntegerDistribution {
    base_domain!(Integer);

    fn args(&self) -> DistributionArgs {
        DistributionArgs {
            step: Some(Value::Int(self.step)),
            ..DistributionArgs::bounds(self.low, self.high)
        }
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        // i128 keeps the full i64 span representable
        let low = i128::from(self.low);
        let step = i128::from(self.step);
        let steps = (i128::from(self.high) - low) / step;
        self.base.sample_with(count, |rng| {
            let k = rng.i128(0..=steps);
            Value::Int(i64::try_from(low + k * step).unwrap_or(self.high))
        })
    }

    interval_domain!(Int, Int);
}

/// An integer range sampled uniformly in log2 space and truncated.
///
/// `low` must be at least 1 and the step is always 1. Support tests and
/// constraints behave like [`IntegerDistribution`].
///
/// # Examples
///
/// ```
/// use featurespace::{Domain, IntLogDistribution};
///
/// let batch = IntLogDistribution::builder("batch_size").bounds(1, 1024).build().unwrap();
/// assert_eq!(batch.get(), ("batch_size", 1, 1024));
/// for v in batch.sample(100) {
///     assert!(batch.has(&v));
/// }
///
/// assert!(IntLogDistribution::builder("bad").step(2).build().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct IntLogDistribution {
    base: Base,
    low: i64,
    high: i64,
}

/// Builder for [`IntLogDistribution`].
#[derive(Clone, Debug)]
pub struct IntLogDistributionBuilder {
    base: BaseBuilder,
    low: i64,
    high: i64,
    step: i64,
}

impl IntLogDistributionBuilder {
    bound_setters!(i64);

    /// Sets the step. Anything other than 1 is rejected by [`build`](Self::build).
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    source_setters! {
        /// Supplies observations. Their range replaces the declared bounds and
        /// sampling follows their frequencies.
    }

    /// Resolves observations and validates bounds and step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] if `step != 1`, [`Error::InvalidRange`]
    /// if `low > high` or `low < 1`, and [`Error::InvalidDataType`] if an
    /// observation is not an integer.
    pub fn build(self) -> Result<IntLogDistribution> {
        if self.step != 1 {
            return Err(Error::InvalidStep {
                step: Value::Int(self.step),
            });
        }
        let base = self.base.resolve(coerce_int())?;
        let (low, high) = resolve_bounds(&base, self.low, self.high)?;
        if low < 1 {
            return Err(Error::range(low, high, "log bounds must be strictly positive"));
        }
        Ok(IntLogDistribution { base, low, high })
    }
}

impl IntLogDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> IntLogDistributionBuilder {
        IntLogDistributionBuilder {
            base: BaseBuilder::new(name),
            low: 1,
            high: i64::MAX,
            step: 1,
        }
    }

    /// Builds from `low`, `high` and an optional `step` argument, which must be 1.
    ///
    /// # Errors
    ///
    /// See [`IntLogDistributionBuilder::build`].
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        let mut builder = Self::builder(name);
        if let Some(low) = args::int("low", args.low.as_ref())? {
            builder = builder.low(low);
        }
        if let Some(high) = args::int("high", args.high.as_ref())? {
            builder = builder.high(high);
        }
        if let Some(step) = args::int("step", args.step.as_ref())? {
            builder = builder.step(step);
        }
        builder.build()
    }

    bound_accessors!(i64);

    /// Returns `(name, low, high)`.
    #[must_use]
    pub fn get(&self) -> (&str, i64, i64) {
        (&self.base.name, self.low, self.high)
    }
}

impl Ordered for IntLogDistribution {}

impl Domain for IntLogDistribution {
    base_domain!(IntLog);

    fn args(&self) -> DistributionArgs {
        DistributionArgs::bounds(self.low, self.high)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn sample(&self, count: usize) -> Vec<Value> {
        let (low, high) = (self.low as f64, self.high as f64);
        self.base.sample_with(count, |rng| {
            let v = rng_util::log2_uniform(rng, low, high) as i64;
            Value::Int(v.clamp(self.low, self.high))
        })
    }

    interval_domain!(Int, Int);
}

eq_by_get!(IntegerDistribution, IntLogDistribution);
