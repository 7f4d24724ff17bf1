//! Empirical marginal distributions.
//!
//! A [`Marginal`] is the frequency table a distribution keeps instead of the
//! raw observations it was built from. The observations are consumed once and
//! only the distinct values with their counts survive.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::rng_util;
use crate::value::Value;

/// Frequency table over observed values, ordered by value.
///
/// Missing observations are kept under [`Value::Missing`].
///
/// # Examples
///
/// ```
/// use featurespace::{Marginal, Value};
///
/// let marginal = Marginal::from_observations([1, 2, 2, 3]).unwrap();
/// assert_eq!(marginal.total(), 4);
/// assert_eq!(marginal.count(&Value::from(2)), 2);
/// assert_eq!(marginal.probabilities().unwrap(), vec![0.25, 0.5, 0.25]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marginal {
    counts: BTreeMap<Value, u64>,
}

impl Marginal {
    /// Builds the frequency table from a single column of observations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataType`] if there are no observations.
    pub fn from_observations<I, V>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut counts = BTreeMap::new();
        for value in observations {
            *counts.entry(value.into()).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return Err(Error::InvalidDataType("no observations supplied".into()));
        }
        Ok(Self { counts })
    }

    /// Builds the frequency table from tabular rows that must hold exactly one
    /// column each.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataType`] if any row does not have exactly one
    /// cell, or if there are no rows.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut column = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let width = row.len();
            let mut cells = row.into_iter();
            match (cells.next(), cells.next()) {
                (Some(cell), None) => column.push(cell),
                _ => {
                    return Err(Error::InvalidDataType(format!(
                        "expected a single column, row {index} has {width} cells"
                    )));
                }
            }
        }
        Self::from_observations(column)
    }

    /// Rewrites every key through `coerce`, merging counts of keys that
    /// collapse onto the same value.
    pub(crate) fn try_map_keys<F>(self, mut coerce: F) -> Result<Self>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        let mut counts = BTreeMap::new();
        for (value, count) in self.counts {
            *counts.entry(coerce(value)?).or_insert(0) += count;
        }
        Ok(Self { counts })
    }

    /// Returns the distinct observed values in ascending order.
    pub fn states(&self) -> impl Iterator<Item = &Value> {
        self.counts.keys()
    }

    /// Returns `(value, count)` pairs in ascending value order.
    pub fn counts(&self) -> impl Iterator<Item = (&Value, u64)> {
        self.counts.iter().map(|(v, &c)| (v, c))
    }

    /// Returns how often `value` was observed.
    #[must_use]
    pub fn count(&self, value: &Value) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Returns the number of distinct observed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the total number of observations.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Returns the observed frequencies normalized to sum to one, in the
    /// same order as [`states`](Self::states).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMarginal`] if the table holds no observations.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> Result<Vec<f64>> {
        let total = self.total();
        if total == 0 {
            return Err(Error::EmptyMarginal);
        }
        let total = total as f64;
        Ok(self.counts.values().map(|&c| c as f64 / total).collect())
    }

    /// Returns the smallest non-missing observed value.
    #[must_use]
    pub fn min(&self) -> Option<&Value> {
        self.counts.keys().find(|v| !v.is_missing())
    }

    /// Returns the largest non-missing observed value.
    #[must_use]
    pub fn max(&self) -> Option<&Value> {
        self.counts.keys().rev().find(|v| !v.is_missing())
    }

    /// Draws `count` observed values with replacement, weighted by frequency.
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng, count: usize) -> Vec<Value> {
        let states: Vec<&Value> = self.counts.keys().collect();
        let cumulative: Vec<u64> = self
            .counts
            .values()
            .scan(0u64, |acc, &c| {
                *acc += c;
                Some(*acc)
            })
            .collect();

        (0..count)
            .map(|_| states[rng_util::weighted_index(rng, &cumulative)].clone())
            .collect()
    }
}
