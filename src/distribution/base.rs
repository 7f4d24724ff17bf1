//! State shared by every distribution and the first phase of construction.

use crate::error::{Error, Result};
use crate::marginal::Marginal;
use crate::rng_util;
use crate::value::Value;

#[derive(Clone, Debug)]
enum Source {
    Observations(Vec<Value>),
    Marginal(Marginal),
}

/// Name, seed and observations collected by a builder.
#[derive(Clone, Debug)]
pub(crate) struct BaseBuilder {
    pub(crate) name: String,
    pub(crate) random_state: u64,
    source: Option<Source>,
}

impl BaseBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            random_state: 0,
            source: None,
        }
    }

    pub(crate) fn observations<I, V>(&mut self, observations: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = observations.into_iter().map(Into::into).collect();
        self.source = Some(Source::Observations(values));
    }

    pub(crate) fn marginal(&mut self, marginal: Marginal) {
        self.source = Some(Source::Marginal(marginal));
    }

    /// Turns raw observations into a frequency table with every key coerced
    /// into the variant's domain. The observations are dropped afterwards.
    pub(crate) fn resolve<F>(self, coerce: F) -> Result<Base>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        let marginal = match self.source {
            None => None,
            Some(Source::Observations(values)) => Some(Marginal::from_observations(values)?),
            Some(Source::Marginal(marginal)) => Some(marginal),
        };
        let marginal = marginal.map(|m| m.try_map_keys(coerce)).transpose()?;

        trace_debug!(
            name = %self.name,
            states = marginal.as_ref().map_or(0, Marginal::len),
            observations = marginal.as_ref().map_or(0, Marginal::total),
            "distribution resolved"
        );

        Ok(Base {
            name: self.name,
            random_state: self.random_state,
            marginal,
        })
    }
}

/// Fields every distribution carries.
#[derive(Clone, Debug)]
pub(crate) struct Base {
    pub(crate) name: String,
    pub(crate) random_state: u64,
    pub(crate) marginal: Option<Marginal>,
}

impl Base {
    /// Smallest and largest non-missing observed values, if a marginal is
    /// present.
    pub(crate) fn observed_bounds(&self) -> Result<Option<(Value, Value)>> {
        let Some(marginal) = &self.marginal else {
            return Ok(None);
        };
        match (marginal.min(), marginal.max()) {
            (Some(low), Some(high)) => Ok(Some((low.clone(), high.clone()))),
            _ => Err(Error::InvalidDataType(format!(
                "feature '{}' has no non-missing observations",
                self.name
            ))),
        }
    }

    /// Draws `count` values from a freshly seeded stream, preferring the
    /// marginal over `draw` when one is present.
    pub(crate) fn sample_with<F>(&self, count: usize, mut draw: F) -> Vec<Value>
    where
        F: FnMut(&mut fastrand::Rng) -> Value,
    {
        let mut rng = rng_util::seeded(self.random_state);
        if let Some(marginal) = &self.marginal {
            return marginal.sample(&mut rng, count);
        }
        (0..count).map(|_| draw(&mut rng)).collect()
    }
}

/// Keeps missing values and rejects anything `accept` cannot map.
pub(crate) fn coerce_with<F>(kind: &'static str, accept: F) -> impl FnMut(Value) -> Result<Value>
where
    F: Fn(&Value) -> Option<Value>,
{
    move |value| match value {
        Value::Missing => Ok(Value::Missing),
        Value::Float(v) if v.is_nan() => Ok(Value::Missing),
        other => accept(&other)
            .ok_or_else(|| Error::InvalidDataType(format!("{other} is not a valid {kind} value"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_data_has_no_marginal() {
        let base = BaseBuilder::new("x").resolve(Ok).unwrap();
        assert!(base.marginal.is_none());
        assert!(base.observed_bounds().unwrap().is_none());
    }

    #[test]
    fn resolve_applies_coercion() {
        let mut builder = BaseBuilder::new("x");
        builder.observations([Value::from(1), Value::from(f64::NAN), Value::from(2.5)]);
        let base = builder
            .resolve(coerce_with("float", |v| v.as_f64().map(Value::Float)))
            .unwrap();
        let marginal = base.marginal.as_ref().unwrap();
        assert_eq!(marginal.count(&Value::Missing), 1);
        assert_eq!(marginal.count(&Value::from(1.0)), 1);
        assert_eq!(
            base.observed_bounds().unwrap(),
            Some((Value::from(1.0), Value::from(2.5)))
        );
    }

    #[test]
    fn resolve_rejects_uncoercible_values() {
        let mut builder = BaseBuilder::new("x");
        builder.observations(["a"]);
        let result = builder.resolve(coerce_with("float", |v| v.as_f64().map(Value::Float)));
        assert!(matches!(result, Err(Error::InvalidDataType(_))));
    }

    #[test]
    fn only_missing_observations_have_no_bounds() {
        let mut builder = BaseBuilder::new("x");
        builder.observations([Value::Missing]);
        let base = builder.resolve(Ok).unwrap();
        assert!(matches!(base.observed_bounds(), Err(Error::InvalidDataType(_))));
    }
}
