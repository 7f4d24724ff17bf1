//! Declarative `(feature, operator, value)` rules.
//!
//! Distributions export their support as [`Constraints`] through
//! [`Domain::as_constraint`](crate::Domain::as_constraint), and
//! [`constraint_to_distribution`](crate::constraint_to_distribution) turns
//! stored rules back into a distribution.
//!
//! # Example
//!
//! ```
//! use featurespace::constraints::{Constraints, Op, Rule};
//! use featurespace::Value;
//!
//! let constraints = Constraints::new(vec![
//!     Rule::new("age", Op::Ge(0.into())),
//!     Rule::new("age", Op::Le(120.into())),
//!     Rule::new("age", Op::Dtype("int".into())),
//! ]);
//!
//! assert!(constraints.matches("age", &Value::from(42)));
//! assert!(!constraints.matches("age", &Value::from(-1)));
//! ```

use core::cmp::Ordering;
use core::fmt;

use chrono::TimeDelta;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionArgs, DistributionKind};
use crate::error::{Error, Result};
use crate::value::{Dtype, Value};

/// The operator and operand of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Op {
    /// Strictly less than.
    Lt(Value),
    /// Less than or equal.
    Le(Value),
    /// Strictly greater than.
    Gt(Value),
    /// Greater than or equal.
    Ge(Value),
    /// Equal.
    Eq(Value),
    /// Member of the set.
    In(Vec<Value>),
    /// Stored with the given dtype name, such as `"int"` or `"datetime"`.
    Dtype(String),
}

impl Op {
    /// Returns the operator name: `lt`, `le`, `gt`, `ge`, `eq`, `in` or `dtype`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Op::Lt(_) => "lt",
            Op::Le(_) => "le",
            Op::Gt(_) => "gt",
            Op::Ge(_) => "ge",
            Op::Eq(_) => "eq",
            Op::In(_) => "in",
            Op::Dtype(_) => "dtype",
        }
    }

    /// Tests whether `value` satisfies the rule.
    ///
    /// Values that cannot be compared with the operand never satisfy a
    /// comparison.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Op::Lt(bound) => value.range_cmp(bound) == Some(Ordering::Less),
            Op::Le(bound) => matches!(value.range_cmp(bound), Some(Ordering::Less | Ordering::Equal)),
            Op::Gt(bound) => value.range_cmp(bound) == Some(Ordering::Greater),
            Op::Ge(bound) => {
                matches!(value.range_cmp(bound), Some(Ordering::Greater | Ordering::Equal))
            }
            Op::Eq(bound) => value.range_cmp(bound) == Some(Ordering::Equal),
            Op::In(set) => set.contains(value),
            Op::Dtype(name) => parse_dtype(name).is_none_or(|dtype| dtype_accepts(dtype, value)),
        }
    }
}

/// Maps the dtype names found in stored rules to a [`Dtype`].
fn parse_dtype(name: &str) -> Option<Dtype> {
    match name {
        "int" | "int8" | "int16" | "int32" | "int64" | "integer" => Some(Dtype::Int),
        "float" | "float32" | "float64" => Some(Dtype::Float),
        "datetime" | "datetime64" | "datetime64[ns]" => Some(Dtype::Datetime),
        "object" | "str" | "category" => Some(Dtype::Object),
        _ => None,
    }
}

fn dtype_accepts(dtype: Dtype, value: &Value) -> bool {
    match dtype {
        Dtype::Object => true,
        Dtype::Float => matches!(value, Value::Int(_) | Value::Float(_) | Value::Missing),
        other => Dtype::of(value) == other,
    }
}

/// A single rule on one feature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// Feature the rule applies to.
    pub feature: String,
    /// What the rule requires.
    pub op: Op,
}

impl Rule {
    /// Creates a rule on `feature`.
    #[must_use]
    pub fn new(feature: impl Into<String>, op: Op) -> Self {
        Self {
            feature: feature.into(),
            op,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            Op::In(set) => {
                write!(f, "{} in [", self.feature)?;
                for (i, v) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Op::Dtype(name) => write!(f, "{} dtype {name}", self.feature),
            Op::Lt(v) | Op::Le(v) | Op::Gt(v) | Op::Ge(v) | Op::Eq(v) => {
                write!(f, "{} {} {v}", self.feature, self.op.name())
            }
        }
    }
}

/// An ordered collection of rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraints {
    rules: Vec<Rule>,
}

impl Constraints {
    /// Creates constraints from rules, keeping their order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// All rules in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Appends every rule of `other`.
    pub fn merge(&mut self, other: Constraints) {
        self.rules.extend(other.rules);
    }

    /// Distinct feature names in order of first appearance.
    #[must_use]
    pub fn features(&self) -> Vec<&str> {
        let mut features: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !features.contains(&rule.feature.as_str()) {
                features.push(&rule.feature);
            }
        }
        features
    }

    /// The operators that apply to `feature`, in order.
    pub fn feature_constraints<'a>(&'a self, feature: &'a str) -> impl Iterator<Item = &'a Op> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.feature == feature)
            .map(|rule| &rule.op)
    }

    /// Tests whether `value` satisfies every rule on `feature`.
    #[must_use]
    pub fn matches(&self, feature: &str, value: &Value) -> bool {
        self.feature_constraints(feature).all(|op| op.accepts(value))
    }

    /// Infers the distribution kind and arguments that the rules on
    /// `feature` describe.
    ///
    /// An `in` rule makes the feature categorical. Otherwise an integer or
    /// datetime dtype rule selects that kind and anything else is treated as
    /// float. Bounds are the tightest of the `le`/`lt`/`ge`/`gt`/`eq` rules;
    /// strict bounds move inward by one unit for integers, one ulp for floats
    /// and one microsecond for timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConstraintKind`] if no rule applies to `feature`.
    pub fn feature_params(&self, feature: &str) -> Result<(DistributionKind, DistributionArgs)> {
        let mut ops = self.feature_constraints(feature).peekable();
        if ops.peek().is_none() {
            return Err(Error::UnknownConstraintKind {
                feature: feature.to_owned(),
            });
        }

        let mut kind = DistributionKind::Float;
        let mut args = DistributionArgs::default();
        for op in ops {
            match op {
                Op::Le(v) => tighten(&mut args.high, v.clone(), Ordering::Less),
                Op::Lt(v) => tighten(&mut args.high, step_down(v), Ordering::Less),
                Op::Ge(v) => tighten(&mut args.low, v.clone(), Ordering::Greater),
                Op::Gt(v) => tighten(&mut args.low, step_up(v), Ordering::Greater),
                Op::Eq(v) => {
                    args.low = Some(v.clone());
                    args.high = Some(v.clone());
                }
                Op::In(set) => {
                    args.choices = Some(match args.choices.take() {
                        Some(existing) => existing.into_iter().filter(|v| set.contains(v)).collect(),
                        None => set.clone(),
                    });
                }
                Op::Dtype(name) => {
                    kind = match parse_dtype(name) {
                        Some(Dtype::Int) => DistributionKind::Integer,
                        Some(Dtype::Datetime) => DistributionKind::Datetime,
                        _ => DistributionKind::Float,
                    };
                }
            }
        }

        if let Some(choices) = args.choices {
            return Ok((
                DistributionKind::Categorical,
                DistributionArgs {
                    choices: Some(choices),
                    ..DistributionArgs::default()
                },
            ));
        }
        Ok((kind, args))
    }
}

impl FromIterator<Rule> for Constraints {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Rule> for Constraints {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

/// Replaces `slot` with `candidate` when the slot is empty or `candidate`
/// compares `toward` the current value.
fn tighten(slot: &mut Option<Value>, candidate: Value, toward: Ordering) {
    let replace = match slot {
        None => true,
        Some(current) => candidate.range_cmp(current) == Some(toward),
    };
    if replace {
        *slot = Some(candidate);
    }
}

fn step_down(value: &Value) -> Value {
    match value {
        Value::Int(v) => Value::Int(v.saturating_sub(1)),
        Value::Float(v) => Value::Float(v.next_down()),
        Value::Datetime(v) => Value::Datetime(
            v.checked_sub_signed(TimeDelta::microseconds(1)).unwrap_or(*v),
        ),
        other => other.clone(),
    }
}

fn step_up(value: &Value) -> Value {
    match value {
        Value::Int(v) => Value::Int(v.saturating_add(1)),
        Value::Float(v) => Value::Float(v.next_up()),
        Value::Datetime(v) => Value::Datetime(
            v.checked_add_signed(TimeDelta::microseconds(1)).unwrap_or(*v),
        ),
        other => other.clone(),
    }
}
