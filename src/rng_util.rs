/// Create the sampling stream for one `sample` call.
///
/// Every call gets its own generator seeded from the distribution's
/// `random_state`, so repeated calls reproduce the same output and concurrent
/// callers never share state.
#[inline]
pub(crate) fn seeded(random_state: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(random_state)
}

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    let u = rng.f64();
    let span = high - low;
    if span.is_finite() {
        low + u * span
    } else {
        // span overflows for bounds near +-f64::MAX
        low - u * low + u * high
    }
}

/// Draw `2^u` with `u` uniform in `[log2(low), log2(high))`.
#[inline]
pub(crate) fn log2_uniform(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    f64_range(rng, low.log2(), high.log2()).exp2()
}

/// Pick an index with probability proportional to its weight.
///
/// `cumulative` holds the running sum of the weights and must be non-empty
/// with a positive last element.
#[inline]
pub(crate) fn weighted_index(rng: &mut fastrand::Rng, cumulative: &[u64]) -> usize {
    let total = cumulative.last().copied().unwrap_or(0);
    if total == 0 {
        return 0;
    }
    let threshold = rng.u64(0..total);
    cumulative.partition_point(|&c| c <= threshold)
}
