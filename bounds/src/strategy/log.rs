//! Logarithmic strategies (`log`, `symlog`).
//!
//! Boundaries are placed per power of ten: `N` values per decade taken from
//! `linspace(10^e, 9 * 10^e, N + 1)` without its last value, followed by the
//! top decade itself. A range that crosses zero is split at an inner "dead
//! zone" around zero which receives no boundaries.

use tracing::warn;

use crate::rounding::{MAX_DECADE, RoundingMode, decade_of, is_decade, pow10, round_outward, round_to_05};
use crate::sample::SampleSet;
use crate::strategy::{linspace, symmetric_linspace, unique_sorted};

/// `n` values per decade for the decades `expmin..expmax`
pub(crate) fn log_bounds(expmin: i32, expmax: i32, n: usize) -> Vec<f64> {
    (expmin..expmax)
        .flat_map(|e| {
            let base = pow10(e);
            let mut decade = linspace(base, 9.0 * base, n + 1);
            decade.truncate(n);
            decade
        })
        .collect()
}

/// Number of boundaries per decade
fn per_decade(n: Option<usize>, total: usize, ndecades: i32) -> usize {
    n.unwrap_or_else(|| (total / ndecades.max(1) as usize).max(1))
}

/// Decade one above `value` unless `value` already is a power of ten
fn top_decade(value: f64) -> i32 {
    let exp = decade_of(value);
    if is_decade(value) { exp } else { (exp + 1).min(MAX_DECADE) }
}

/// Logarithmic boundaries for the reduced range `(vmin, vmax)`
///
/// `total` is the approximate number of boundaries used when `n` (values per
/// decade) is not given.
pub(crate) fn log_ticks(
    samples: &SampleSet,
    (vmin, vmax): (f64, f64),
    symmetric: bool,
    n: Option<usize>,
    total: usize,
) -> Vec<f64> {
    if vmin > vmax {
        // explicit descending overrides give a reversed sequence
        let mut values = log_ticks(samples, (vmax, vmin), symmetric, n, total);
        values.reverse();
        return values;
    }
    let (mut vmin, mut vmax) = round_outward(vmin, vmax);
    if symmetric {
        let v = vmin.abs().max(vmax.abs());
        vmin = -v;
        vmax = v;
    }
    if vmin == vmax {
        return vec![vmin, vmax];
    }

    if vmin < 0.0 && vmax > 0.0 {
        crossing_ticks(samples, vmin, vmax, symmetric, n, total)
    } else {
        one_sided_ticks(samples, vmin, vmax, n, total)
    }
}

fn single_decade(vmin: f64, vmax: f64, symmetric: bool, n: Option<usize>, total: usize) -> Vec<f64> {
    let count = n.unwrap_or(total);
    if symmetric {
        symmetric_linspace(vmax, count)
    } else {
        linspace(vmin, vmax, count)
    }
}

fn one_sided_ticks(samples: &SampleSet, vmin: f64, vmax: f64, n: Option<usize>, total: usize) -> Vec<f64> {
    let negative = vmax <= 0.0;
    let (mut lo, hi) = if negative { (-vmax, -vmin) } else { (vmin, vmax) };

    if lo == 0.0 {
        let smallest = samples
            .finite_values()
            .into_iter()
            .map(|v| if negative { -v } else { v })
            .filter(|v| *v > 0.0)
            .min_by(f64::total_cmp);
        match smallest {
            Some(v) => lo = round_to_05(v, None, RoundingMode::Small).min(hi),
            None => {
                warn!(vmin, vmax, "No non-zero value to anchor logarithmic boundaries, using linear spacing");
                return linspace(vmin, vmax, n.unwrap_or(total));
            }
        }
    }

    let expmin = decade_of(lo);
    let expmax = decade_of(hi);
    let dexp = expmax - expmin;
    if dexp == 0 || (dexp == 1 && is_decade(hi)) {
        return single_decade(vmin, vmax, false, n, total);
    }

    let top = top_decade(hi);
    let mut bounds = log_bounds(expmin, top, per_decade(n, total, top - expmin));
    bounds.push(pow10(top));
    if negative {
        bounds.iter_mut().for_each(|b| *b = -*b);
    }
    unique_sorted(bounds)
}

fn crossing_ticks(
    samples: &SampleSet,
    vmin: f64,
    vmax: f64,
    symmetric: bool,
    n: Option<usize>,
    total: usize,
) -> Vec<f64> {
    let values = samples.finite_values();
    let smallest_positive = values.iter().copied().filter(|v| *v > 0.0).min_by(f64::total_cmp);
    let largest_negative = values.iter().copied().filter(|v| *v < 0.0).max_by(f64::total_cmp);

    let (mut inner_neg, mut inner_pos) = match (largest_negative, smallest_positive) {
        (Some(neg), Some(pos)) => (
            round_to_05(neg, None, RoundingMode::Large),
            round_to_05(pos, None, RoundingMode::Small),
        ),
        (Some(one), None) | (None, Some(one)) => {
            let v = round_to_05(one.abs(), None, RoundingMode::Small);
            (-v, v)
        }
        (None, None) => {
            let v = pow10(decade_of(vmin.abs().min(vmax)));
            (-v, v)
        }
    };
    if symmetric {
        inner_pos = inner_pos.min(-inner_neg);
        inner_neg = -inner_pos;
    }
    inner_neg = inner_neg.max(vmin);
    inner_pos = inner_pos.min(vmax);

    let expmin = decade_of(inner_neg);
    let expmax0 = decade_of(vmin);
    let expmin0 = decade_of(inner_pos);
    let expmax = decade_of(vmax);
    let dexp = (expmax0 - expmin) + (expmax - expmin0);
    if dexp == 0 || (dexp == 1 && is_decade(vmax)) {
        return single_decade(vmin, vmax, symmetric, n, total);
    }

    let top_neg = top_decade(vmin);
    let top_pos = top_decade(vmax);
    let n = per_decade(n, total, (top_neg - expmin) + (top_pos - expmin0));

    let mut bounds: Vec<f64> = log_bounds(expmin, top_neg, n).into_iter().map(|b| -b).collect();
    bounds.extend(log_bounds(expmin0, top_pos, n));
    bounds.extend([-pow10(expmin), -pow10(top_neg), pow10(expmin0), pow10(top_pos)]);
    bounds.retain(|&b| b <= inner_neg || b >= inner_pos);
    unique_sorted(bounds)
}
