//! A named collection of feature domains.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use featurespace::prelude::*;
//!
//! let schema = Schema::new(vec![
//!     IntegerDistribution::builder("age").bounds(0, 120).build().unwrap().into(),
//!     CategoricalDistribution::builder("plan").choices(["free", "pro"]).build().unwrap().into(),
//! ])
//! .unwrap();
//!
//! let row = HashMap::from([
//!     ("age".to_owned(), Value::from(31)),
//!     ("plan".to_owned(), Value::from("pro")),
//! ]);
//! assert!(schema.has(&row));
//!
//! let rebuilt = Schema::from_constraints(&schema.as_constraints()).unwrap();
//! assert_eq!(rebuilt, schema);
//! ```

use std::collections::HashMap;

use crate::constraints::Constraints;
use crate::distribution::{Distribution, Domain, constraint_to_distribution};
use crate::error::{Error, Result};
use crate::value::Value;

/// An ordered list of distributions with unique feature names.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    features: Vec<Distribution>,
}

impl Schema {
    /// Creates a schema, keeping the given feature order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataType`] if two distributions share a name.
    pub fn new(features: Vec<Distribution>) -> Result<Self> {
        for (i, dist) in features.iter().enumerate() {
            if features[..i].iter().any(|d| d.name() == dist.name()) {
                return Err(Error::InvalidDataType(format!(
                    "duplicate feature '{}'",
                    dist.name()
                )));
            }
        }
        trace_info!(features = features.len(), "schema built");
        Ok(Self { features })
    }

    /// Builds one distribution per feature named in `constraints`.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`constraint_to_distribution`].
    pub fn from_constraints(constraints: &Constraints) -> Result<Self> {
        let features = constraints
            .features()
            .into_iter()
            .map(|feature| constraint_to_distribution(constraints, feature))
            .collect::<Result<Vec<_>>>()?;
        Self::new(features)
    }

    /// Looks up a feature by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.features.iter().find(|d| d.name() == name)
    }

    /// All features in order.
    #[must_use]
    pub fn features(&self) -> &[Distribution] {
        &self.features
    }

    /// Feature names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(Domain::name)
    }

    /// Returns the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the schema has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Tests whether every feature of `other` exists here and is included by
    /// the matching distribution.
    #[must_use]
    pub fn includes(&self, other: &Schema) -> bool {
        other.features.iter().all(|theirs| {
            self.get(theirs.name())
                .is_some_and(|ours| ours.includes(theirs))
        })
    }

    /// Tests whether `row` holds an in-support value for every feature.
    ///
    /// Extra columns in `row` are ignored.
    #[must_use]
    pub fn has(&self, row: &HashMap<String, Value>) -> bool {
        self.features
            .iter()
            .all(|dist| row.get(dist.name()).is_some_and(|value| dist.has(value)))
    }

    /// Concatenates the constraints of every feature.
    #[must_use]
    pub fn as_constraints(&self) -> Constraints {
        let mut constraints = Constraints::default();
        for dist in &self.features {
            constraints.merge(dist.as_constraint());
        }
        constraints
    }

    /// Draws `count` values for each feature, in feature order.
    #[must_use]
    pub fn sample(&self, count: usize) -> Vec<(String, Vec<Value>)> {
        self.features
            .iter()
            .map(|dist| (dist.name().to_owned(), dist.sample(count)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoricalDistribution, FloatDistribution, IntegerDistribution};

    fn schema() -> Schema {
        Schema::new(vec![
            FloatDistribution::builder("x").bounds(0.0, 1.0).build().unwrap().into(),
            IntegerDistribution::builder("n").bounds(1, 10).build().unwrap().into(),
            CategoricalDistribution::builder("c").choices(["a", "b"]).build().unwrap().into(),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Schema::new(vec![
            FloatDistribution::builder("x").build().unwrap().into(),
            IntegerDistribution::builder("x").build().unwrap().into(),
        ]);
        assert!(matches!(result, Err(Error::InvalidDataType(_))));
    }

    #[test]
    fn lookup_and_order() {
        let schema = schema();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["x", "n", "c"]);
        assert_eq!(schema.len(), 3);
        assert!(matches!(schema.get("n"), Some(Distribution::Integer(_))));
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn row_membership() {
        let schema = schema();
        let mut row = HashMap::from([
            ("x".to_owned(), Value::from(0.5)),
            ("n".to_owned(), Value::from(3)),
            ("c".to_owned(), Value::from("b")),
            ("extra".to_owned(), Value::from("ignored")),
        ]);
        assert!(schema.has(&row));

        row.insert("n".to_owned(), Value::from(11));
        assert!(!schema.has(&row));

        row.remove("n");
        assert!(!schema.has(&row));
    }

    #[test]
    fn includes_subset_of_features() {
        let big = schema();
        let small = Schema::new(vec![
            IntegerDistribution::builder("n").bounds(2, 5).build().unwrap().into(),
        ])
        .unwrap();
        let unknown = Schema::new(vec![
            IntegerDistribution::builder("m").bounds(2, 5).build().unwrap().into(),
        ])
        .unwrap();
        assert!(big.includes(&small));
        assert!(!small.includes(&big));
        assert!(!big.includes(&unknown));
    }

    #[test]
    fn sample_every_feature() {
        let schema = schema();
        let samples = schema.sample(20);
        assert_eq!(samples.len(), 3);
        for (name, values) in &samples {
            let dist = schema.get(name).unwrap();
            assert_eq!(values.len(), 20);
            assert!(values.iter().all(|v| dist.has(v)));
        }
    }

    #[test]
    fn constraints_round_trip() {
        let schema = schema();
        let rebuilt = Schema::from_constraints(&schema.as_constraints()).unwrap();
        assert_eq!(rebuilt, schema);
    }
}
