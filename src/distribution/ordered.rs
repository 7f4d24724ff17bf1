//! Interval behavior shared by the ordered variants.

use core::cmp::Ordering;

use super::{Distribution, Domain};
use crate::constraints::{Constraints, Op, Rule};
use crate::value::Value;

fn at_most(a: &Value, b: &Value) -> bool {
    matches!(a.range_cmp(b), Some(Ordering::Less | Ordering::Equal))
}

/// Support is the closed interval `[min(), max()]`.
///
/// Implemented by the real, integer and datetime variants. Only `has` and the
/// constraint form are shared by all of them; [`encloses`](Self::encloses) is
/// the exact containment test of the numeric variants.
pub(crate) trait Ordered: Domain {
    fn within(&self, value: &Value) -> bool {
        at_most(&self.min(), value) && at_most(value, &self.max())
    }

    /// Interval containment against any numeric distribution, regardless of
    /// whether it holds reals or integers.
    fn encloses(&self, other: &Distribution) -> bool {
        other.is_numeric() && at_most(&self.min(), &other.min()) && at_most(&other.max(), &self.max())
    }

    fn range_constraint(&self) -> Constraints {
        let name = self.name();
        Constraints::new(vec![
            Rule::new(name, Op::Le(self.max())),
            Rule::new(name, Op::Ge(self.min())),
            Rule::new(name, Op::Dtype(self.dtype().as_str().to_owned())),
        ])
    }
}
