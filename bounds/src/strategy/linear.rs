//! Linear strategies: data points, (rounded) extrema and symmetric ranges.

use itertools::Itertools;

use crate::method::Method;
use crate::rounding::round_min_max;
use crate::strategy::{linspace, symmetric_linspace, unique_sorted};

/// Widen a degenerate range by `padding` on both sides
pub(crate) fn widen((vmin, vmax): (f64, f64), padding: f64) -> (f64, f64) {
    if vmin == vmax {
        (vmin - padding, vmax + padding)
    } else {
        (vmin, vmax)
    }
}

/// Sorted unique values (`data`) or their midpoints (`mid`), strided
///
/// `values` must already be finite.
pub(crate) fn point_ticks(method: Method, values: &[f64], step: usize) -> Vec<f64> {
    let unique = unique_sorted(values.to_vec());
    let points: Vec<f64> = if method == Method::Mid {
        unique
            .iter()
            .tuple_windows()
            .map(|(a, b)| 0.5 * (a + b))
            .collect()
    } else {
        unique
    };
    points.into_iter().step_by(step.max(1)).collect()
}

/// The `(vmin, vmax)` a limit method produces for a reduced range
pub(crate) fn limit_range(method: Method, vmin: f64, vmax: f64) -> (f64, f64) {
    match method {
        Method::Rounded => round_min_max(vmin, vmax),
        Method::RoundedSym => {
            let (lo, hi) = round_min_max(vmin, vmax);
            let v = lo.abs().max(hi.abs());
            (-v, v)
        }
        Method::Sym => {
            let v = vmin.abs().max(vmax.abs());
            (-v, v)
        }
        _ => (vmin, vmax),
    }
}

/// Evenly spaced values for `rounded`, `roundedsym`, `minmax` and `sym`
pub(crate) fn linear_ticks(method: Method, vmin: f64, vmax: f64, n: usize) -> Vec<f64> {
    let (lo, hi) = limit_range(method, vmin, vmax);
    if method.is_symmetric() {
        symmetric_linspace(hi, n)
    } else {
        linspace(lo, hi, n)
    }
}

/// Every `step`-th colorbar bound (`bounds`) or bound midpoint (`midbounds`)
pub(crate) fn bounds_ticks(method: Method, bounds: &[f64], step: usize) -> Vec<f64> {
    let step = step.max(1);
    if method == Method::MidBounds {
        bounds
            .iter()
            .tuple_windows()
            .map(|(a, b)| 0.5 * (a + b))
            .step_by(step)
            .collect()
    } else {
        bounds.iter().copied().step_by(step).collect()
    }
}
