//! Shapes repeated across the distribution variants.

/// Seed and observation setters for a builder holding a `base: BaseBuilder`.
///
/// The doc comment passed in documents what observations do for the variant.
macro_rules! source_setters {
    ($(#[$data_doc:meta])*) => {
        /// Sets the sampling seed.
        #[must_use]
        pub fn random_state(mut self, seed: u64) -> Self {
            self.base.random_state = seed;
            self
        }

        $(#[$data_doc])*
        #[must_use]
        pub fn data<I, V>(mut self, observations: I) -> Self
        where
            I: IntoIterator<Item = V>,
            V: Into<$crate::value::Value>,
        {
            self.base.observations(observations);
            self
        }

        /// Supplies an already-built marginal in place of raw observations.
        #[must_use]
        pub fn marginal(mut self, marginal: $crate::marginal::Marginal) -> Self {
            self.base.marginal(marginal);
            self
        }
    };
}

/// `low`, `high` and `bounds` setters for a builder with plain bound fields.
macro_rules! bound_setters {
    ($t:ty) => {
        /// Sets the lower bound (inclusive).
        #[must_use]
        pub fn low(mut self, low: $t) -> Self {
            self.low = low;
            self
        }

        /// Sets the upper bound (inclusive).
        #[must_use]
        pub fn high(mut self, high: $t) -> Self {
            self.high = high;
            self
        }

        /// Sets both bounds.
        #[must_use]
        pub fn bounds(self, low: $t, high: $t) -> Self {
            self.low(low).high(high)
        }
    };
}

/// `low` and `high` accessors for a distribution with bound fields.
macro_rules! bound_accessors {
    ($t:ty) => {
        /// Lower bound.
        #[must_use]
        pub fn low(&self) -> $t {
            self.low
        }

        /// Upper bound.
        #[must_use]
        pub fn high(&self) -> $t {
            self.high
        }
    };
}

/// Equality over `get()`.
macro_rules! eq_by_get {
    ($($t:ty),+ $(,)?) => {
        $(
            impl PartialEq for $t {
                fn eq(&self, other: &Self) -> bool {
                    self.get() == other.get()
                }
            }
        )+
    };
}

/// The [`Domain`](super::Domain) methods that read the shared `base` state.
macro_rules! base_domain {
    ($kind:ident) => {
        fn name(&self) -> &str {
            &self.base.name
        }

        fn random_state(&self) -> u64 {
            self.base.random_state
        }

        fn marginal(&self) -> Option<&$crate::marginal::Marginal> {
            self.base.marginal.as_ref()
        }

        fn kind(&self) -> $crate::distribution::DistributionKind {
            $crate::distribution::DistributionKind::$kind
        }
    };
}

/// Support tests and constraints of a numeric interval. Needs `Ordered` in
/// scope.
macro_rules! interval_domain {
    ($value:ident, $dtype:ident) => {
        fn has(&self, value: &$crate::value::Value) -> bool {
            self.within(value)
        }

        fn includes(&self, other: &$crate::distribution::Distribution) -> bool {
            self.encloses(other)
        }

        fn as_constraint(&self) -> $crate::constraints::Constraints {
            self.range_constraint()
        }

        fn min(&self) -> $crate::value::Value {
            $crate::value::Value::$value(self.low)
        }

        fn max(&self) -> $crate::value::Value {
            $crate::value::Value::$value(self.high)
        }

        fn dtype(&self) -> $crate::value::Dtype {
            $crate::value::Dtype::$dtype
        }
    };
}
