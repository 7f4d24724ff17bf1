#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Typed domains for data features. A [`Distribution`] describes the legal
//! values of one feature (categorical, bounded real, log-scaled real, stepped
//! integer, log-scaled integer, or timestamp), can remember the empirical
//! marginal it was built from, samples synthetic values consistent with it,
//! tests whether another feature's domain fits inside it, and converts to and
//! from declarative range [`Constraints`](constraints::Constraints).
//!
//! # Getting Started
//!
//! ```
//! use featurespace::prelude::*;
//!
//! let age = IntegerDistribution::builder("age").bounds(0, 120).build().unwrap();
//! assert!(age.has(&Value::from(42)));
//! assert!(!age.has(&Value::from(130)));
//!
//! // Built from observations, the bounds come from the data.
//! let score = FloatDistribution::builder("score")
//!     .data([1.0, 2.0, 2.0, 3.0])
//!     .build()
//!     .unwrap();
//! assert_eq!(score.get(), ("score", 1.0, 3.0));
//!
//! // Sampling is a pure function of the distribution, its seed, and the count.
//! assert_eq!(score.sample(5), score.sample(5));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Distribution`] | Closed sum over every supported feature domain. |
//! | [`Domain`] | Operations every domain supports: `sample`, `has`, `includes`, `as_constraint`, `min`, `max`, `dtype`. |
//! | [`Marginal`] | Frequency table kept in place of the raw observations. |
//! | [`Constraints`](constraints::Constraints) | Declarative `(feature, operator, value)` rules. |
//! | [`constraint_to_distribution`] | Rebuilds a [`Distribution`] from stored rules. |
//! | [`Schema`](schema::Schema) | A named set of distributions describing a whole table. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on values, dtypes, distribution arguments and constraints | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) when marginals are built and distributions are reconstructed | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod constraints;
mod distribution;
mod error;
mod marginal;
mod rng_util;
pub mod schema;
mod value;

pub use distribution::{
    CategoricalDistribution, CategoricalDistributionBuilder, DatetimeDistribution,
    DatetimeDistributionBuilder, Distribution, DistributionArgs, DistributionKind, Domain,
    FloatDistribution, FloatDistributionBuilder, IntLogDistribution, IntLogDistributionBuilder,
    IntegerDistribution, IntegerDistributionBuilder, LogDistribution, LogDistributionBuilder,
    constraint_to_distribution,
};
pub use error::{Error, Result};
pub use marginal::Marginal;
pub use value::{Dtype, Value};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use featurespace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::constraints::{Constraints, Op, Rule};
    pub use crate::distribution::{
        CategoricalDistribution, DatetimeDistribution, Distribution, DistributionArgs,
        DistributionKind, Domain, FloatDistribution, IntLogDistribution, IntegerDistribution,
        LogDistribution, constraint_to_distribution,
    };
    pub use crate::error::{Error, Result};
    pub use crate::marginal::Marginal;
    pub use crate::schema::Schema;
    pub use crate::value::{Dtype, Value};
}
