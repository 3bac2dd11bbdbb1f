//! Rounding and the "absorb, don't propagate" rule for failed sums.

use std::collections::BTreeMap;

use tracing::warn;

/// Round to two decimal places, exact half-cent ties to the even cent.
///
/// An `f64` sits exactly halfway between two cents only when it is an odd
/// multiple of 1/8 (0.125, 0.375, ...); every other value rounds to nearest.
pub fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    let scaled = value * 100.0;
    let cents = if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        scaled.round_ties_even()
    } else {
        scaled.round()
    };
    cents / 100.0
}

/// A non-finite total (overflowed accumulation) becomes 0.
pub(crate) fn finite_total(metric: &'static str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(metric, "aggregation overflowed; reporting 0");
        0.0
    }
}

/// A grouping with any non-finite bucket is discarded as a whole.
pub(crate) fn finite_groups(
    metric: &'static str,
    groups: BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    if groups.values().all(|v| v.is_finite()) {
        groups
    } else {
        warn!(metric, "grouping overflowed; reporting no groups");
        BTreeMap::new()
    }
}

/// Sum values per key.
pub(crate) fn group_sum<'a, I>(pairs: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (key, value) in pairs {
        *groups.entry(key.to_string()).or_insert(0.0) += value;
    }
    groups
}
