//! Finite choice domains.

use super::args::DistributionArgs;
use super::base::{Base, BaseBuilder};
use super::{Distribution, Domain};
use crate::constraints::{Constraints, Op, Rule};
use crate::error::{Error, Result};
use crate::value::{Dtype, Value};

/// A finite set of choices, stored sorted and de-duplicated.
///
/// When built from observations the choices are the distinct observed
/// values, missing included.
///
/// # Examples
///
/// ```
/// use featurespace::{CategoricalDistribution, Domain, Dtype, Value};
///
/// let color = CategoricalDistribution::builder("color")
///     .choices(["red", "green", "blue", "red"])
///     .build()
///     .unwrap();
///
/// assert_eq!(color.choices().len(), 3);
/// assert!(color.has(&Value::from("green")));
/// assert!(!color.has(&Value::from("purple")));
/// assert_eq!(color.dtype(), Dtype::Object);
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalDistribution {
    base: Base,
    choices: Vec<Value>,
}

/// Builder for [`CategoricalDistribution`].
#[derive(Clone, Debug)]
pub struct CategoricalDistributionBuilder {
    base: BaseBuilder,
    choices: Vec<Value>,
}

impl CategoricalDistributionBuilder {
    /// Sets the allowed choices. Order and duplicates do not matter.
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    source_setters! {
        /// Supplies observations. The distinct observed values replace the
        /// declared choices and sampling follows their frequencies.
    }

    /// Resolves observations and validates the choices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChoices`] if there are neither observations
    /// nor choices, and [`Error::InvalidDataType`] if an empty set of
    /// observations was supplied.
    pub fn build(self) -> Result<CategoricalDistribution> {
        let base = self.base.resolve(|value| match value {
            Value::Float(v) if v.is_nan() => Ok(Value::Missing),
            other => Ok(other),
        })?;
        let mut choices = match &base.marginal {
            Some(marginal) => marginal.states().cloned().collect(),
            None => self.choices,
        };
        // stable, so dedup keeps the first of numerically equal choices
        choices.sort();
        choices.dedup();
        if choices.is_empty() {
            return Err(Error::InvalidChoices);
        }
        Ok(CategoricalDistribution { base, choices })
    }
}

impl CategoricalDistribution {
    /// Starts building a distribution for the feature `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CategoricalDistributionBuilder {
        CategoricalDistributionBuilder {
            base: BaseBuilder::new(name),
            choices: Vec::new(),
        }
    }

    /// Builds from the `choices` argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChoices`] if `choices` is absent or empty.
    pub fn from_args(name: impl Into<String>, args: &DistributionArgs) -> Result<Self> {
        Self::builder(name)
            .choices(args.choices.iter().flatten().cloned())
            .build()
    }

    /// The sorted, distinct choices.
    #[must_use]
    pub fn choices(&self) -> &[Value] {
        &self.choices
    }

    /// Returns `(name, choices)`.
    #[must_use]
    pub fn get(&self) -> (&str, &[Value]) {
        (&self.base.name, &self.choices)
    }
}

impl Domain for CategoricalDistribution {
    base_domain!(Categorical);

    fn args(&self) -> DistributionArgs {
        DistributionArgs::choices(self.choices.iter().cloned())
    }

    fn sample(&self, count: usize) -> Vec<Value> {
        self.base.sample_with(count, |rng| {
            self.choices[rng.usize(0..self.choices.len())].clone()
        })
    }

    fn has(&self, value: &Value) -> bool {
        self.choices.binary_search(value).is_ok()
    }

    fn includes(&self, other: &Distribution) -> bool {
        match other {
            Distribution::Categorical(other) => other.choices.iter().all(|c| self.has(c)),
            _ => false,
        }
    }

    fn as_constraint(&self) -> Constraints {
        Constraints::new(vec![Rule::new(
            self.name(),
            Op::In(self.choices.clone()),
        )])
    }

    fn min(&self) -> Value {
        self.choices.first().cloned().unwrap_or(Value::Missing)
    }

    fn max(&self) -> Value {
        self.choices.last().cloned().unwrap_or(Value::Missing)
    }

    /// The first non-empty class among object, float and int choices.
    fn dtype(&self) -> Dtype {
        let count = |dtype: Dtype| {
            self.choices
                .iter()
                .filter(|v| match Dtype::of(v) {
                    Dtype::Datetime => dtype == Dtype::Object,
                    other => other == dtype,
                })
                .count()
        };
        [Dtype::Object, Dtype::Float, Dtype::Int]
            .into_iter()
            .find(|&dtype| count(dtype) > 0)
            .unwrap_or(Dtype::Object)
    }
}

eq_by_get!(CategoricalDistribution);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_sorted_and_unique() {
        let dist = CategoricalDistribution::builder("c")
            .choices(["b", "a", "b", "c"])
            .build()
            .unwrap();
        assert_eq!(dist.get(), ("c", &[Value::from("a"), Value::from("b"), Value::from("c")][..]));
    }

    #[test]
    fn requires_choices_or_data() {
        assert!(matches!(
            CategoricalDistribution::builder("c").build(),
            Err(Error::InvalidChoices)
        ));
        assert!(matches!(
            CategoricalDistribution::from_args("c", &DistributionArgs::default()),
            Err(Error::InvalidChoices)
        ));
    }

    #[test]
    fn data_overrides_choices_and_keeps_missing() {
        let dist = CategoricalDistribution::builder("c")
            .choices(["z"])
            .data([Value::from("x"), Value::Missing, Value::from("y"), Value::from(f64::NAN)])
            .build()
            .unwrap();
        assert_eq!(
            dist.choices(),
            &[Value::Missing, Value::from("x"), Value::from("y")]
        );
        assert!(!dist.has(&Value::from("z")));
        assert_eq!(dist.marginal().unwrap().count(&Value::Missing), 2);
    }

    #[test]
    fn uniform_sampling_covers_choices() {
        let dist = CategoricalDistribution::builder("c")
            .choices([1, 2, 3])
            .random_state(4)
            .build()
            .unwrap();
        let samples = dist.sample(300);
        for choice in dist.choices() {
            assert!(samples.contains(choice));
        }
        assert!(samples.iter().all(|v| dist.has(v)));
    }

    #[test]
    fn includes_requires_categorical_subset() {
        let big = CategoricalDistribution::builder("c").choices(["a", "b", "c"]).build().unwrap();
        let small: Distribution = CategoricalDistribution::builder("c")
            .choices(["a", "c"])
            .build()
            .unwrap()
            .into();
        let other: Distribution = CategoricalDistribution::builder("c")
            .choices(["a", "d"])
            .build()
            .unwrap()
            .into();
        let numeric: Distribution = crate::IntegerDistribution::builder("c").bounds(0, 1).build().unwrap().into();

        assert!(big.includes(&small));
        assert!(!big.includes(&other));
        assert!(!big.includes(&numeric));
    }

    #[test]
    fn constraint_lists_choices() {
        let dist = CategoricalDistribution::builder("c").choices([2, 1]).build().unwrap();
        assert_eq!(
            dist.as_constraint().rules(),
            &[Rule::new("c", Op::In(vec![Value::from(1), Value::from(2)]))]
        );
    }

    #[test]
    fn dtype_prefers_object_then_float_then_int() {
        let ints = CategoricalDistribution::builder("c").choices([1, 2]).build().unwrap();
        assert_eq!(ints.dtype(), Dtype::Int);

        let mixed_numbers = CategoricalDistribution::builder("c")
            .choices([Value::from(1), Value::from(2), Value::from(0.5)])
            .build()
            .unwrap();
        assert_eq!(mixed_numbers.dtype(), Dtype::Float);

        let with_label = CategoricalDistribution::builder("c")
            .choices([Value::from(1), Value::from(2.5), Value::from("x")])
            .build()
            .unwrap();
        assert_eq!(with_label.dtype(), Dtype::Object);
    }

    #[test]
    fn mixed_numeric_choices_sort_and_dedup_numerically() {
        let dist = CategoricalDistribution::builder("c")
            .choices([Value::from(1), Value::from(0.5), Value::from(2.0), Value::from(2)])
            .build()
            .unwrap();
        assert_eq!(dist.choices().len(), 3);
        assert!(matches!(dist.choices()[0], Value::Float(v) if v == 0.5));
        assert!(matches!(dist.choices()[1], Value::Int(1)));
        assert!(matches!(dist.choices()[2], Value::Float(v) if v == 2.0));
        assert_eq!(dist.min(), Value::from(0.5));
        assert_eq!(dist.max(), Value::from(2));
        assert!(dist.has(&Value::from(1.0)));
        assert!(dist.has(&Value::from(2)));
        assert!(!dist.has(&Value::from(1.5)));
        assert_eq!(dist.dtype(), Dtype::Float);
    }

    #[test]
    fn min_and_max_are_extreme_choices() {
        let dist = CategoricalDistribution::builder("c").choices([5, -3, 9]).build().unwrap();
        assert_eq!(dist.min(), Value::from(-3));
        assert_eq!(dist.max(), Value::from(9));
    }
}
