//! Reduction of a [`SampleSet`] to a `(vmin, vmax)` range.

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::request::BoundsRequest;
use crate::sample::SampleSet;

/// Range used when the sample holds no finite value
pub const EMPTY_RANGE: (f64, f64) = (0.0, 1.0);

/// Minimum and maximum of the finite values in `values`
pub fn finite_extrema(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
}

/// Percentile of sorted data with linear interpolation between ranks
///
/// `p` is given in percent, matching `numpy.percentile`.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }

    let n = sorted_values.len();
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = (rank.ceil() as usize).min(n - 1);

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let fraction = rank - lower_index as f64;
        lower_value + fraction * (upper_value - lower_value)
    }
}

/// Collect the values the range is computed from
///
/// Percentiles need every value, so all arrays are concatenated. Plain
/// minimum/maximum only needs the extrema of each array.
pub fn collect(samples: &SampleSet, needs_percentile: bool) -> Vec<f64> {
    if !samples.has_shared() || needs_percentile {
        return samples.finite_values();
    }
    let arrays: Vec<&[f64]> = samples.arrays().collect();
    arrays
        .par_iter()
        .filter_map(|values| finite_extrema(values))
        .flat_map_iter(|(lo, hi)| [lo, hi])
        .collect()
}

/// Compute `(vmin, vmax)` for a request
///
/// Explicit `vmin`/`vmax` overrides win; otherwise the minimum/maximum or the
/// requested percentiles of the finite sample values are used. An empty sample
/// yields [`EMPTY_RANGE`].
pub fn vmin_vmax(samples: &SampleSet, request: &BoundsRequest) -> (f64, f64) {
    if let (Some(vmin), Some(vmax)) = (request.vmin, request.vmax) {
        return (vmin, vmax);
    }

    let use_percmin = request.vmin.is_none() && request.percmin > 0.0;
    let use_percmax = request.vmax.is_none() && request.percmax < 100.0;
    let needs_percentile = use_percmin || use_percmax;

    let mut values = collect(samples, needs_percentile);
    let Some((lo, hi)) = finite_extrema(&values) else {
        warn!(
            method = %request.method,
            "Cannot calculate minimum and maximum of an empty sample, using {:?}",
            EMPTY_RANGE
        );
        return EMPTY_RANGE;
    };

    if needs_percentile {
        values.sort_by(|a, b| a.total_cmp(b));
    }

    let vmin = request.vmin.unwrap_or_else(|| {
        if use_percmin {
            percentile(&values, request.percmin)
        } else {
            lo
        }
    });
    let vmax = request.vmax.unwrap_or_else(|| {
        if use_percmax {
            percentile(&values, request.percmax)
        } else {
            hi
        }
    });

    debug!(vmin, vmax, n_values = values.len(), "reduced sample range");
    (vmin, vmax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use approx::assert_relative_eq;

    fn request() -> BoundsRequest {
        BoundsRequest::new(Method::MinMax)
    }

    #[test]
    fn test_percentile() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 50.0), 3.0);
        assert_eq!(percentile(&data, 100.0), 5.0);
        assert_relative_eq!(percentile(&data, 10.0), 1.4);
    }

    #[test]
    fn test_min_max_ignores_nan() {
        let samples = SampleSet::new(vec![3.0, f64::NAN, -1.0, 7.5]);
        assert_eq!(vmin_vmax(&samples, &request()), (-1.0, 7.5));
    }

    #[test]
    fn test_shared_sources_are_merged() {
        let samples = SampleSet::new(vec![1.0, 2.0])
            .with_shared(vec![-4.0, 0.0])
            .with_shared(vec![10.0, f64::NAN]);
        assert_eq!(vmin_vmax(&samples, &request()), (-4.0, 10.0));
        // only per-array extrema are merged for plain min/max
        assert_eq!(collect(&samples, false), vec![1.0, 2.0, -4.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_shared_order_does_not_matter() {
        let a = SampleSet::new(vec![1.0, 5.0])
            .with_shared(vec![-3.0, 2.0])
            .with_shared(vec![8.0]);
        let b = SampleSet::new(vec![8.0])
            .with_shared(vec![1.0, 5.0])
            .with_shared(vec![-3.0, 2.0]);
        let mut req = request();
        req.percmin = 10.0;
        req.percmax = 90.0;
        assert_eq!(vmin_vmax(&a, &req), vmin_vmax(&b, &req));
        assert_eq!(vmin_vmax(&a, &request()), vmin_vmax(&b, &request()));
    }

    #[test]
    fn test_percentiles() {
        let samples = SampleSet::new((0..=100).map(f64::from).collect::<Vec<_>>());
        let mut req = request();
        req.percmin = 5.0;
        req.percmax = 95.0;
        let (vmin, vmax) = vmin_vmax(&samples, &req);
        assert_relative_eq!(vmin, 5.0);
        assert_relative_eq!(vmax, 95.0);
    }

    #[test]
    fn test_overrides() {
        let samples = SampleSet::new(vec![1.0, 2.0, 3.0]);
        let mut req = request();
        req.vmin = Some(-10.0);
        assert_eq!(vmin_vmax(&samples, &req), (-10.0, 3.0));

        req.vmax = Some(10.0);
        // no sample access needed at all
        assert_eq!(vmin_vmax(&SampleSet::default(), &req), (-10.0, 10.0));
    }

    #[test]
    fn test_empty_sample_falls_back() {
        let samples = SampleSet::new(vec![f64::NAN, f64::NAN]);
        assert_eq!(vmin_vmax(&samples, &request()), EMPTY_RANGE);
        assert_eq!(vmin_vmax(&SampleSet::default(), &request()), EMPTY_RANGE);
    }

    #[test]
    fn test_degenerate_sample_is_returned_exactly() {
        let samples = SampleSet::new(vec![5.0, 5.0, 5.0]);
        assert_eq!(vmin_vmax(&samples, &request()), (5.0, 5.0));
    }
}
