//! Strategies that expand a reduced range into boundaries.
//!
//! Dispatch is a plain `match` over [`MethodFamily`]; each family lives in its
//! own module.

pub(crate) mod linear;
pub(crate) mod log;

use tracing::{debug, warn};

use crate::boundaries::Boundaries;
use crate::config::EngineConfig;
use crate::error::{BoundsError, Result};
use crate::method::MethodFamily;
use crate::reduce;
use crate::request::BoundsRequest;
use crate::sample::SampleSet;

/// `num` evenly spaced values from `start` to `stop`, both included
///
/// Matches `numpy.linspace`: value `i` is `start + i * step` and the last
/// value is exactly `stop`. Ranges wider than `f64::MAX` are interpolated
/// instead.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let div = (num - 1) as f64;
            let step = (stop - start) / div;
            let mut values: Vec<f64> = if step.is_finite() {
                (0..num).map(|i| start + i as f64 * step).collect()
            } else {
                // the width overflows, so interpolate between the endpoints
                (0..num)
                    .map(|i| {
                        let t = i as f64 / div;
                        start * (1.0 - t) + stop * t
                    })
                    .collect()
            };
            if let Some(last) = values.last_mut() {
                *last = stop;
            }
            values
        }
    }
}

/// `linspace(-v, v, num)` mirrored so that `x[i] == -x[num - 1 - i]` exactly
pub fn symmetric_linspace(v: f64, num: usize) -> Vec<f64> {
    let mut values = linspace(-v, v, num);
    let len = values.len();
    for i in 0..len / 2 {
        values[len - 1 - i] = -values[i];
    }
    if len % 2 == 1 {
        values[len / 2] = 0.0;
    }
    values
}

/// Sort ascending and drop exact duplicates
pub(crate) fn unique_sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Run the strategy of `request.method` on `samples`
pub(crate) fn run(
    request: &BoundsRequest,
    samples: &SampleSet,
    config: &EngineConfig,
) -> Result<Boundaries> {
    let method = request.method;
    let step = request.n.unwrap_or(1);

    let values = match method.family() {
        MethodFamily::Points => linear::point_ticks(method, &samples.finite_primary(), step),
        MethodFamily::Linear => {
            let (vmin, vmax) = linear::widen(
                reduce::vmin_vmax(samples, request),
                config.degenerate_padding,
            );
            let n = request
                .n
                .unwrap_or_else(|| config.linear_default(method.is_symmetric()));
            linear::linear_ticks(method, vmin, vmax, n)
        }
        MethodFamily::Logarithmic => {
            let symmetric = method.is_symmetric();
            log::log_ticks(
                samples,
                reduce::vmin_vmax(samples, request),
                symmetric,
                request.n,
                config.log_default(symmetric),
            )
        }
        MethodFamily::FromBounds => {
            let bounds = samples.bounds().ok_or_else(|| BoundsError::MissingBounds {
                method: method.to_string(),
            })?;
            linear::bounds_ticks(method, bounds, step)
        }
        MethodFamily::Calendar(rule) => {
            let Some(dates) = samples.dates() else {
                warn!(%method, "Could not determine calendar ticks without datetime values");
                return Ok(Boundaries::Default);
            };
            let ticks = rule.ticks(dates, step);
            debug!(%method, n_ticks = ticks.len(), "computed calendar ticks");
            return Ok(Boundaries::Dates(ticks));
        }
    };

    debug!(%method, n_values = values.len(), "computed boundaries");
    Ok(Boundaries::Values(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());

        let values = linspace(0.1, 0.7, 7);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[6], 0.7);
    }

    #[test]
    fn test_linspace_over_the_full_range() {
        let values = linspace(-f64::MAX, f64::MAX, 11);
        assert!(values.iter().all(|v| v.is_finite()), "{values:?}");
        assert_eq!(values[0], -f64::MAX);
        assert_eq!(values[5], 0.0);
        assert_eq!(values[10], f64::MAX);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_symmetric_linspace() {
        let values = symmetric_linspace(1.0, 10);
        for i in 0..10 {
            assert_eq!(values[i], -values[9 - i]);
        }
        assert_eq!(symmetric_linspace(2.0, 5), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_unique_sorted() {
        assert_eq!(unique_sorted(vec![3.0, -1.0, 3.0, 0.5]), vec![-1.0, 0.5, 3.0]);
    }
}
