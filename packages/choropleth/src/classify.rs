//! Quantile scale: maps numbers onto equally populated bins.
//!
//! Breakpoints sit at the `k / bin_count` quantiles of the sorted input
//! (linear interpolation between closest ranks). A value equal to a
//! breakpoint lands in the lower of the two bins it separates.

use crate::ChoroplethError;

/// A quantile discretization computed over one set of values.
///
/// Holds `bin_count - 1` ascending breakpoints plus the domain extent.
/// Built fresh for every classification call; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScale {
    thresholds: Vec<f64>,
    min: f64,
    max: f64,
    bin_count: usize,
}

/// Builds a [`QuantileScale`] over `values` with `bin_count` bins.
///
/// # Errors
///
/// Returns [`ChoroplethError::InvalidInput`] if `values` is empty,
/// `bin_count` is zero, or any value is NaN or infinite.
pub fn classify(values: &[f64], bin_count: usize) -> Result<QuantileScale, ChoroplethError> {
    QuantileScale::new(values, bin_count)
}

impl QuantileScale {
    /// See [`classify`].
    ///
    /// # Errors
    ///
    /// Returns [`ChoroplethError::InvalidInput`] for empty input, zero bins,
    /// or non-finite values.
    pub fn new(values: &[f64], bin_count: usize) -> Result<Self, ChoroplethError> {
        if bin_count == 0 {
            return Err(ChoroplethError::invalid_input(
                "bin count must be at least 1",
            ));
        }

        if values.is_empty() {
            return Err(ChoroplethError::invalid_input(
                "cannot classify an empty set of values",
            ));
        }

        if let Some((idx, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ChoroplethError::invalid_input(format!(
                "value at index {idx} is not finite ({value})"
            )));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let thresholds: Vec<f64> = (1..bin_count)
            .map(|k| quantile_sorted(&sorted, k, bin_count))
            .collect();

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        log::debug!(
            "Built {bin_count}-bin quantile scale over {} values (min={min}, max={max})",
            sorted.len()
        );

        Ok(Self {
            thresholds,
            min,
            max,
            bin_count,
        })
    }

    /// Returns the bin index for `value`, always in `0..bin_count`.
    ///
    /// The result is the smallest `i` with `value <= thresholds[i]`, or the
    /// last bin when `value` exceeds every breakpoint. NaN maps to bin 0.
    #[must_use]
    pub fn bin(&self, value: f64) -> usize {
        self.thresholds.partition_point(|&t| t < value)
    }

    /// Ascending breakpoints between adjacent bins (`bin_count - 1` of them).
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of bins this scale classifies into.
    #[must_use]
    pub const fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Smallest and largest classified value.
    #[must_use]
    pub const fn domain_extent(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Value range covered by `bin`, bounded by its neighbouring
    /// breakpoints (or the domain extent at either end).
    ///
    /// Returns `None` if `bin` is out of range.
    #[must_use]
    pub fn invert_extent(&self, bin: usize) -> Option<(f64, f64)> {
        if bin >= self.bin_count {
            return None;
        }

        let lower = if bin == 0 {
            self.min
        } else {
            self.thresholds[bin - 1]
        };
        let upper = self.thresholds.get(bin).copied().unwrap_or(self.max);

        Some((lower, upper))
    }
}

/// Quantile at probability `k / q` of an ascending, non-empty slice.
///
/// The fractional rank `(n - 1) * k / q` is computed in integers so ranks
/// that land exactly on an element never pick up rounding error.
#[allow(clippy::cast_precision_loss)]
fn quantile_sorted(sorted: &[f64], k: usize, q: usize) -> f64 {
    let numerator = (sorted.len() - 1) * k;
    let lo = numerator / q;
    let rem = numerator % q;

    if rem == 0 {
        return sorted[lo];
    }

    let a = sorted[lo];
    let b = sorted[lo + 1];
    let fraction = rem as f64 / q as f64;
    // Weighted sum instead of `a + (b - a) * f`: `b - a` can overflow even
    // when both ends are finite.
    a.mul_add(1.0 - fraction, b * fraction).clamp(a, b)
}
