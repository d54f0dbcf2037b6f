//! Rounding of values to "nice" half-decade steps.
//!
//! A value is split into a base-10 mantissa and exponent and the mantissa is
//! rounded to the next multiple of 0.5, so `1.3e-4` becomes `1.0e-4` or
//! `1.5e-4` depending on the [`RoundingMode`].

use serde::{Deserialize, Serialize};

/// Relative tolerance used to recognise values that already sit on a
/// half-step or on an exact power of ten
const SNAP_TOLERANCE: f64 = 1e-9;

/// Direction used by [`round_to_05`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Round to the half-step whose magnitude is below the value
    Small,
    /// Round to the half-step whose magnitude is above the value
    Large,
}

/// Smallest decade whose power of ten is representable (as a subnormal)
const MIN_DECADE: i32 = -323;
/// Largest decade whose power of ten is finite
pub(crate) const MAX_DECADE: i32 = 308;

/// `value * 10^exp`, applied in steps of `10^300` so no factor leaves the
/// finite range
fn scale(mut value: f64, mut exp: i32) -> f64 {
    while exp > 300 {
        value *= 1e300;
        exp -= 300;
    }
    while exp < -300 {
        value /= 1e300;
        exp += 300;
    }
    if exp >= 0 {
        value * 10f64.powi(exp)
    } else {
        value / 10f64.powi(-exp)
    }
}

/// `10^exp`, exact for every exponent whose power is representable
pub(crate) fn pow10(exp: i32) -> f64 {
    scale(1.0, exp)
}

/// Base-10 exponent of `value`, i.e. `floor(log10(|value|))`
///
/// Values within floating-point noise of an exact power of ten are assigned to
/// that power, so `0.001` always lands in decade `-3`. The result is clamped
/// to the decades whose power of ten is representable.
pub fn decade_of(value: f64) -> i32 {
    let log = value.abs().log10();
    let nearest = log.round();
    let exp = if (log - nearest).abs() < SNAP_TOLERANCE {
        nearest as i32
    } else {
        log.floor() as i32
    };
    exp.clamp(MIN_DECADE, MAX_DECADE)
}

/// Whether `value` is (up to floating-point noise) an exact power of ten
pub fn is_decade(value: f64) -> bool {
    if value == 0.0 || !value.is_finite() {
        return false;
    }
    let power = pow10(decade_of(value));
    ((value.abs() - power) / power).abs() < SNAP_TOLERANCE
}

fn mantissa(value: f64, exp: i32) -> f64 {
    scale(value.abs(), -exp)
}

fn snap_to_half(mantissa: f64) -> f64 {
    let doubled = mantissa * 2.0;
    let nearest = doubled.round();
    if (doubled - nearest).abs() <= SNAP_TOLERANCE * nearest.max(1.0) {
        nearest / 2.0
    } else {
        mantissa
    }
}

/// Round `n` to the next 0.5-value with respect to its base-10 exponent
///
/// If `exp` is `None` the exponent is derived from `n` itself, otherwise the
/// mantissa is taken relative to `10^exp` (and may then be larger than 10).
/// Values already on a half-step are returned unchanged by both modes, as are
/// zero and non-finite values.
///
/// # Example
///
/// ```rust
/// use psy_bounds::rounding::{round_to_05, RoundingMode};
///
/// assert_eq!(round_to_05(40.6, None, RoundingMode::Small), 40.0);
/// assert_eq!(round_to_05(40.6, None, RoundingMode::Large), 45.0);
/// assert_eq!(round_to_05(-100.3, None, RoundingMode::Large), -150.0);
/// ```
pub fn round_to_05(n: f64, exp: Option<i32>, mode: RoundingMode) -> f64 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    let exp = exp.unwrap_or_else(|| decade_of(n));
    let m = snap_to_half(mantissa(n, exp));

    let anchor = match mode {
        RoundingMode::Small => {
            let floor = m.floor();
            if m - floor >= 0.5 { floor + 0.5 } else { floor }
        }
        RoundingMode::Large => {
            let ceil = m.ceil();
            if ceil - m >= 0.5 { ceil - 0.5 } else { ceil }
        }
    };

    let rounded = scale(anchor, exp);
    if rounded.is_finite() {
        n.signum() * rounded
    } else {
        f64::MAX.copysign(n)
    }
}

/// Element-wise [`round_to_05`]
pub fn round_to_05_slice(values: &[f64], exp: Option<i32>, mode: RoundingMode) -> Vec<f64> {
    values.iter().map(|&v| round_to_05(v, exp, mode)).collect()
}

/// Rounded envelope of a range
///
/// Both endpoints are rounded in both modes using the exponent of the range
/// width; the smaller candidate is kept for the minimum and the larger one for
/// the maximum, so the result always contains `[vmin, vmax]`.
pub fn round_min_max(vmin: f64, vmax: f64) -> (f64, f64) {
    if vmin == vmax || !vmin.is_finite() || !vmax.is_finite() {
        return (vmin, vmax);
    }
    // an overflowing width lands in the largest decade
    let exp = Some(decade_of(vmax - vmin));
    let lower = round_to_05(vmin, exp, RoundingMode::Large)
        .min(round_to_05(vmin, exp, RoundingMode::Small));
    let upper = round_to_05(vmax, exp, RoundingMode::Large)
        .max(round_to_05(vmax, exp, RoundingMode::Small));
    (lower, upper)
}

/// Outward rounding where every endpoint uses its own exponent
pub(crate) fn round_outward(vmin: f64, vmax: f64) -> (f64, f64) {
    let lower = round_to_05(vmin, None, RoundingMode::Large)
        .min(round_to_05(vmin, None, RoundingMode::Small));
    let upper = round_to_05(vmax, None, RoundingMode::Large)
        .max(round_to_05(vmax, None, RoundingMode::Small));
    (lower, upper)
}
