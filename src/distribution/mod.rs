//! Feature domain distributions.
//!
//! Every supported domain is a variant of the closed [`Distribution`] sum
//! type. The variants share one contract, the [`Domain`] trait, and differ in
//! how they bound, discretize and sample their support.

use core::fmt;
use core::str::FromStr;

use crate::constraints::Constraints;
use crate::error::{Error, Result};
use crate::marginal::Marginal;
use crate::rng_util;
use crate::value::{Dtype, Value};

#[macro_use]
mod macros;

mod args;
mod base;
mod categorical;
mod datetime;
mod float;
mod integer;
mod ordered;

pub use args::DistributionArgs;
pub use categorical::{CategoricalDistribution, CategoricalDistributionBuilder};
pub use datetime::{DatetimeDistribution, DatetimeDistributionBuilder};
pub use float::{FloatDistribution, FloatDistributionBuilder, LogDistribution, LogDistributionBuilder};
pub use integer::{
    IntLogDistribution, IntLogDistributionBuilder, IntegerDistribution, IntegerDistributionBuilder,
};

/// Operations every feature domain supports.
///
/// Support tests ([`has`](Self::has), [`includes`](Self::includes),
/// [`min`](Self::min), [`max`](Self::max)) always refer to the declared
/// support. A marginal never narrows the support, it only biases
/// [`sample`](Self::sample).
pub trait Domain {
    /// Name of the feature this domain describes.
    fn name(&self) -> &str;

    /// Seed every [`sample`](Self::sample) call starts from.
    fn random_state(&self) -> u64;

    /// Empirical marginal the domain was built from, if any.
    fn marginal(&self) -> Option<&Marginal>;

    /// Which variant this is.
    fn kind(&self) -> DistributionKind;

    /// The defining metadata of the domain, excluding its name.
    ///
    /// Two domains of the same kind and name with equal arguments are
    /// interchangeable, and [`Distribution::from_args`] rebuilds an equal
    /// domain from them.
    fn args(&self) -> DistributionArgs;

    /// Draws `count` values.
    ///
    /// When a marginal is present values are drawn from it with replacement,
    /// weighted by observed frequency. Otherwise the variant's own strategy
    /// applies. The output depends only on the domain, its seed and `count`.
    fn sample(&self, count: usize) -> Vec<Value>;

    /// Tests whether `value` lies in the declared support.
    fn has(&self, value: &Value) -> bool;

    /// Tests whether the support of `other` lies within this one.
    fn includes(&self, other: &Distribution) -> bool;

    /// Rules a constraint engine needs to accept exactly this support.
    fn as_constraint(&self) -> Constraints;

    /// Lower end of the support.
    fn min(&self) -> Value;

    /// Upper end of the support.
    fn max(&self) -> Value;

    /// Storage type of the values.
    fn dtype(&self) -> Dtype;

    /// Distinct observed values of the marginal, in ascending order.
    fn marginal_states(&self) -> Option<Vec<&Value>> {
        self.marginal().map(|m| m.states().collect())
    }

    /// Observed frequencies of the marginal normalized to sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMarginal`] if the marginal holds no observations.
    fn marginal_probabilities(&self) -> Result<Option<Vec<f64>>> {
        self.marginal().map(Marginal::probabilities).transpose()
    }

    /// Draws `count` values from the marginal, or `None` without one.
    fn sample_marginal(&self, count: usize) -> Option<Vec<Value>> {
        let marginal = self.marginal()?;
        let mut rng = rng_util::seeded(self.random_state());
        Some(marginal.sample(&mut rng, count))
    }
}

/// The variant tag of a [`Distribution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistributionKind {
    /// Finite set of choices.
    Categorical,
    /// Bounded real interval.
    Float,
    /// Bounded real interval sampled in log2 space.
    Log,
    /// Bounded, stepped integer range.
    Integer,
    /// Bounded integer range sampled in log2 space.
    IntLog,
    /// Bounded, stepped timestamp range.
    Datetime,
}

impl DistributionKind {
    /// Returns the snake-case name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistributionKind::Categorical => "categorical",
            DistributionKind::Float => "float",
            DistributionKind::Log => "log",
            DistributionKind::Integer => "integer",
            DistributionKind::IntLog => "int_log",
            DistributionKind::Datetime => "datetime",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "categorical" => Ok(DistributionKind::Categorical),
            "float" => Ok(DistributionKind::Float),
            "log" => Ok(DistributionKind::Log),
            "integer" => Ok(DistributionKind::Integer),
            "int_log" => Ok(DistributionKind::IntLog),
            "datetime" => Ok(DistributionKind::Datetime),
            other => Err(Error::UnknownDistributionKind(other.to_owned())),
        }
    }
}

/// A feature domain.
///
/// Equality is structural: two distributions are equal when they are the
/// same variant and their `get()` tuples are equal. Seeds and marginals do
/// not take part.
///
/// # Examples
///
/// ```
/// use featurespace::{Distribution, Domain, FloatDistribution, IntegerDistribution};
///
/// let wide: Distribution = FloatDistribution::builder("x").bounds(0.0, 10.0).build().unwrap().into();
/// let narrow: Distribution = IntegerDistribution::builder("x").bounds(2, 5).build().unwrap().into();
/// assert!(wide.includes(&narrow));
/// assert!(!narrow.includes(&wide));
/// ```
#[derive(Clone, Debug)]
pub enum Distribution {
    /// A categorical domain.
    Categorical(CategoricalDistribution),
    /// A real interval.
    Float(FloatDistribution),
    /// A real interval sampled in log space.
    Log(LogDistribution),
    /// A stepped integer range.
    Integer(IntegerDistribution),
    /// An integer range sampled in log space.
    IntLog(IntLogDistribution),
    /// A stepped timestamp range.
    Datetime(DatetimeDistribution),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            Distribution::Categorical($d) => $body,
            Distribution::Float($d) => $body,
            Distribution::Log($d) => $body,
            Distribution::Integer($d) => $body,
            Distribution::IntLog($d) => $body,
            Distribution::Datetime($d) => $body,
        }
    };
}

impl Distribution {
    /// Builds a distribution of the given kind from its defining arguments.
    ///
    /// This is the inverse of [`Domain::args`]. Arguments the kind does not
    /// use are ignored and missing ones take the kind's defaults.
    ///
    /// # Errors
    ///
    /// Returns the construction error of the target variant, or
    /// [`Error::InvalidDataType`] if an argument has the wrong type.
    pub fn from_args(
        kind: DistributionKind,
        name: impl Into<String>,
        args: &DistributionArgs,
    ) -> Result<Self> {
        Ok(match kind {
            DistributionKind::Categorical => CategoricalDistribution::from_args(name, args)?.into(),
            DistributionKind::Float => FloatDistribution::from_args(name, args)?.into(),
            DistributionKind::Log => LogDistribution::from_args(name, args)?.into(),
            DistributionKind::Integer => IntegerDistribution::from_args(name, args)?.into(),
            DistributionKind::IntLog => IntLogDistribution::from_args(name, args)?.into(),
            DistributionKind::Datetime => DatetimeDistribution::from_args(name, args)?.into(),
        })
    }

    /// Returns `true` for the real and integer variants, which share
    /// interval containment semantics.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Distribution::Float(_)
                | Distribution::Log(_)
                | Distribution::Integer(_)
                | Distribution::IntLog(_)
        )
    }
}

impl Domain for Distribution {
    fn name(&self) -> &str {
        dispatch!(self, d => d.name())
    }

    fn random_state(&self) -> u64 {
        dispatch!(self, d => d.random_state())
    }

    fn marginal(&self) -> Option<&Marginal> {
        dispatch!(self, d => d.marginal())
    }

    fn kind(&self) -> DistributionKind {
        dispatch!(self, d => d.kind())
    }

    fn args(&self) -> DistributionArgs {
        dispatch!(self, d => d.args())
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        dispatch!(self, d => d.sample(count))
    }

    fn has(&self, value: &Value) -> bool {
        dispatch!(self, d => d.has(value))
    }

    fn includes(&self, other: &Distribution) -> bool {
        dispatch!(self, d => d.includes(other))
    }

    fn as_constraint(&self) -> Constraints {
        dispatch!(self, d => d.as_constraint())
    }

    fn min(&self) -> Value {
        dispatch!(self, d => d.min())
    }

    fn max(&self) -> Value {
        dispatch!(self, d => d.max())
    }

    fn dtype(&self) -> Dtype {
        dispatch!(self, d => d.dtype())
    }
}

impl PartialEq for Distribution {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Distribution::Categorical(a), Distribution::Categorical(b)) => a == b,
            (Distribution::Float(a), Distribution::Float(b)) => a == b,
            (Distribution::Log(a), Distribution::Log(b)) => a == b,
            (Distribution::Integer(a), Distribution::Integer(b)) => a == b,
            (Distribution::IntLog(a), Distribution::IntLog(b)) => a == b,
            (Distribution::Datetime(a), Distribution::Datetime(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CategoricalDistribution> for Distribution {
    fn from(d: CategoricalDistribution) -> Self {
        Distribution::Categorical(d)
    }
}

impl From<FloatDistribution> for Distribution {
    fn from(d: FloatDistribution) -> Self {
        Distribution::Float(d)
    }
}

impl From<LogDistribution> for Distribution {
    fn from(d: LogDistribution) -> Self {
        Distribution::Log(d)
    }
}

impl From<IntegerDistribution> for Distribution {
    fn from(d: IntegerDistribution) -> Self {
        Distribution::Integer(d)
    }
}

impl From<IntLogDistribution> for Distribution {
    fn from(d: IntLogDistribution) -> Self {
        Distribution::IntLog(d)
    }
}

impl From<DatetimeDistribution> for Distribution {
    fn from(d: DatetimeDistribution) -> Self {
        Distribution::Datetime(d)
    }
}

/// Infers the distribution of `feature` from stored constraint rules.
///
/// Categorical rules (`in`) yield a [`CategoricalDistribution`], integer and
/// datetime dtype rules yield [`IntegerDistribution`] and
/// [`DatetimeDistribution`]. Any other rule set falls back to a
/// [`FloatDistribution`] bounded by its `le`/`ge` rules.
///
/// # Errors
///
/// Returns [`Error::UnknownConstraintKind`] if no rule mentions `feature`,
/// and the construction error of the target variant if the rules describe an
/// invalid domain (for example `low > high`).
///
/// # Examples
///
/// ```
/// use featurespace::constraints::{Constraints, Op, Rule};
/// use featurespace::{Distribution, Domain, IntegerDistribution, constraint_to_distribution};
///
/// let constraints = Constraints::new(vec![
///     Rule::new("n", Op::Ge(0.into())),
///     Rule::new("n", Op::Le(9.into())),
///     Rule::new("n", Op::Dtype("int".into())),
/// ]);
/// let dist = constraint_to_distribution(&constraints, "n").unwrap();
/// let expected: Distribution = IntegerDistribution::builder("n").bounds(0, 9).build().unwrap().into();
/// assert_eq!(dist, expected);
/// ```
pub fn constraint_to_distribution(constraints: &Constraints, feature: &str) -> Result<Distribution> {
    let (kind, args) = constraints.feature_params(feature)?;
    let kind = match kind {
        DistributionKind::Categorical | DistributionKind::Integer | DistributionKind::Datetime => kind,
        _ => DistributionKind::Float,
    };
    trace_debug!(feature, kind = kind.as_str(), "distribution reconstructed from constraints");
    Distribution::from_args(kind, feature, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            DistributionKind::Categorical,
            DistributionKind::Float,
            DistributionKind::Log,
            DistributionKind::Integer,
            DistributionKind::IntLog,
            DistributionKind::Datetime,
        ] {
            assert_eq!(kind.as_str().parse::<DistributionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "gaussian".parse::<DistributionKind>(),
            Err(Error::UnknownDistributionKind(_))
        ));
    }

    #[test]
    fn equality_requires_same_variant() {
        let float: Distribution = FloatDistribution::builder("x").bounds(1.0, 8.0).build().unwrap().into();
        let log: Distribution = LogDistribution::builder("x").bounds(1.0, 8.0).build().unwrap().into();
        assert_eq!(float.args(), log.args());
        assert_ne!(float, log);
    }

    #[test]
    fn equality_matches_variant_equality() {
        let neg = FloatDistribution::builder("x").bounds(-0.0, 1.0).build().unwrap();
        let pos = FloatDistribution::builder("x").bounds(0.0, 1.0).build().unwrap();
        assert_eq!(neg, pos);
        assert_eq!(Distribution::from(neg), Distribution::from(pos));
    }

    #[test]
    fn equality_ignores_seed_and_marginal() {
        let a: Distribution = FloatDistribution::builder("x")
            .data([1.0, 3.0])
            .random_state(1)
            .build()
            .unwrap()
            .into();
        let b: Distribution = FloatDistribution::builder("x")
            .bounds(1.0, 3.0)
            .random_state(2)
            .build()
            .unwrap()
            .into();
        assert_eq!(a, b);
    }

    #[test]
    fn equality_compares_names() {
        let a: Distribution = IntegerDistribution::builder("a").bounds(0, 1).build().unwrap().into();
        let b: Distribution = IntegerDistribution::builder("b").bounds(0, 1).build().unwrap().into();
        assert_ne!(a, b);
    }

    #[test]
    fn dispatch_reaches_variant() {
        let d: Distribution = CategoricalDistribution::builder("c")
            .choices(["b", "a"])
            .random_state(9)
            .build()
            .unwrap()
            .into();
        assert_eq!(d.name(), "c");
        assert_eq!(d.random_state(), 9);
        assert_eq!(d.kind(), DistributionKind::Categorical);
        assert_eq!(d.min(), Value::from("a"));
        assert_eq!(d.max(), Value::from("b"));
        assert!(!d.is_numeric());
        assert!(d.marginal_states().is_none());
        assert!(d.marginal_probabilities().unwrap().is_none());
        assert!(d.sample_marginal(3).is_none());
    }

    #[test]
    fn marginal_helpers_follow_observations() {
        let d: Distribution = CategoricalDistribution::builder("c")
            .data(["x", "y", "y", "y"])
            .build()
            .unwrap()
            .into();
        let states = d.marginal_states().unwrap();
        assert_eq!(states, vec![&Value::from("x"), &Value::from("y")]);
        assert_eq!(d.marginal_probabilities().unwrap().unwrap(), vec![0.25, 0.75]);
        assert_eq!(d.sample_marginal(10).unwrap(), d.sample(10));
    }
}
