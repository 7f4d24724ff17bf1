//! Real-valued domains, sampled uniformly or in log2 space.

use super::args::{self, DistributionArgs};
use super::base::{Base, BaseBuilder, coerce_with};
use super::ordered::Ordered;
use super::Domain;
use crate::error::{Error, Result};
use crate::rng_util;
use crate::value::Value;

#[allow(clippy::cast_precision_loss)]
const DEFAULT_LOW: f64 = i64::MIN as f64;
#[allow(clippy::cast_precision_loss)]
const DEFAULT_HIGH: f64 = i64::MAX as f64;

fn coerce_float() -> impl FnMut(Value) -> Result<Value> {
    coerce_with("float", |v| v.as_f64().map(Value::Float))
}

fn observed_f64(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::InvalidDataType(format!("{value} is not a valid float value")))
}

/// Bounds from the marginal override the declared ones, then both are checked.
fn resolve_bounds(base: &Base, low: f64, high: f64) -> Result<(f64, f64)> {
    let (low, high) = match base.observed_bounds()? {
        Some((lo, hi)) => (observed_f64(&lo)?, observed_f64(&hi)?),
        None => (low, high),
    };
    if !low.is_finite() || !high.is_finite() {
        return Err(Error::range(low, high, "bounds must be finite"));
    }
    if low > high {
        return Err(Error::range(low, high, "low must be less than or equal to high"));
    }
    Ok((low, high))
}

/// A bounded real interval.
///
/// Without bounds the interval spans the `i64` range. Without a marginal,
/// samples are uniform in `[low, high]`.
///
/// # Examples
///
/// ```
/// use featurespace::{Domain, FloatDistribution, Value};
///
/// let dist = FloatDistribution::builder("temperature")
///     .bounds(-10.0, 40.0)
///     .random_state(7)
///     .build()
///     .unwrap();
///
/// assert!(dist.has(&Value::from(21.5)));
/// assert!(!dist.has(&Value::from(41.0)));
/// for v in dist.sample(100) {
///     assert!(dist.has(&v));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FloatDistribution {
    base: Base,
    low: f64,
    high: f64,
}

/// Builder for [`FloatDistribution`].
#[derive(Clone, Debug)]
pub struct FloatDistributionBuilder {
    base: BaseBuilder,
    low: f64,
    high: f64,
}

impl FloatDistributionBuilder {
    bound_setters!(f64);
    source_setters! {
        /// Supplies observations. Their range replaces the declared bounds and
        /// sampling follows their frequencies.
    }

    /// Resolves observations and validates the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `low > high` or a bound is not
    /// finite, and [`Error::InvalidDataType`] if an observation is not a number.
    pub fn build(self) -> Result<FloatDistribution> {
        let base = self.base.resolve(coerce_float())?;
        let (low, high) = resolve_bounds(&base, self.low, self.high)?;
        Ok(FloatDistribution { base, low, high })
    }
}

impl FloatDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> FloatDistributionBuilder {
        FloatDistributionBuilder {
            base: BaseBuilder::new(name),
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }

    /// Builds from `low` and `high` arguments.
    ///
    /// # Errors
    ///
    /// See [`FloatDistributionBuilder::build`].
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        let mut builder = Self::builder(name);
        if let Some(low) = args::float("low", args.low.as_ref())? {
            builder = builder.low(low);
        }
        if let Some(high) = args::float("high", args.high.as_ref())? {
            builder = builder.high(high);
        }
        builder.build()
    }

    bound_accessors!(f64);

    /// Returns `(name, low, high)`.
    #[must_use]
    pub fn get(&self) -> (&str, f64, f64) {
        (&self.base.name, self.low, self.high)
    }
}

impl Ordered for FloatDistribution {}

impl Domain for FloatDistribution {
    base_domain!(Float);

    fn args(&self) -> DistributionArgs {
        DistributionArgs::bounds(self.low, self.high)
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        self.base.sample_with(count, |rng| {
            Value::Float(rng_util::f64_range(rng, self.low, self.high))
        })
    }

    interval_domain!(Float, Float);
}

/// A real interval sampled uniformly in log2 space.
///
/// Both bounds must be strictly positive. Without bounds the interval spans
/// `[f64::MIN_POSITIVE, f64::MAX]`. Support tests and constraints behave like
/// [`FloatDistribution`].
///
/// # Examples
///
/// ```
/// use featurespace::{Domain, LogDistribution};
///
/// let lr = LogDistribution::builder("learning_rate")
///     .bounds(1e-5, 1e-1)
///     .build()
///     .unwrap();
/// for v in lr.sample(50) {
///     assert!(lr.has(&v));
/// }
///
/// assert!(LogDistribution::builder("bad").bounds(0.0, 1.0).build().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct LogDistribution {
    base: Base,
    low: f64,
    high: f64,
}

/// Builder for [`LogDistribution`].
#[derive(Clone, Debug)]
pub struct LogDistributionBuilder {
    base: BaseBuilder,
    low: f64,
    high: f64,
}

impl LogDistributionBuilder {
    bound_setters!(f64);
    source_setters! {
        /// Supplies observations. Their range replaces the declared bounds and
        /// sampling follows their frequencies.
    }

    /// Resolves observations and validates the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `low > high`, a bound is not finite,
    /// or `low` is not strictly positive, and [`Error::InvalidDataType`] if an
    /// observation is not a number.
    pub fn build(self) -> Result<LogDistribution> {
        let base = self.base.resolve(coerce_float())?;
        let (low, high) = resolve_bounds(&base, self.low, self.high)?;
        if low <= 0.0 {
            return Err(Error::range(low, high, "log bounds must be strictly positive"));
        }
        Ok(LogDistribution { base, low, high })
    }
}

impl LogDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LogDistributionBuilder {
        LogDistributionBuilder {
            base: BaseBuilder::new(name),
            low: f64::MIN_POSITIVE,
            high: f64::MAX,
        }
    }

    /// Builds from `low` and `high` arguments.
    ///
    /// # Errors
    ///
    /// See [`LogDistributionBuilder::build`].
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        let mut builder = Self::builder(name);
        if let Some(low) = args::float("low", args.low.as_ref())? {
            builder = builder.low(low);
        }
        if let Some(high) = args::float("high", args.high.as_ref())? {
            builder = builder.high(high);
        }
        builder.build()
    }

    bound_accessors!(f64);

    /// Returns `(name, low, high)`.
    #[must_use]
    pub fn get(&self) -> (&str, f64, f64) {
        (&self.base.name, self.low, self.high)
    }
}

impl Ordered for LogDistribution {}

impl Domain for LogDistribution {
    base_domain!(Log);

    fn args(&self) -> DistributionArgs {
        DistributionArgs::bounds(self.low, self.high)
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        self.base.sample_with(count, |rng| {
            let v = rng_util::log2_uniform(rng, self.low, self.high);
            Value::Float(v.clamp(self.low, self.high))
        })
    }

    interval_domain!(Float, Float);
}

eq_by_get!(FloatDistribution, LogDistribution);
