use serde_json::Value;
use tracing::debug;

use crate::boundaries::Boundaries;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::method::{Method, RequestContext};
use crate::reduce;
use crate::request::{BoundsRequest, LimitSpec, LimitsRequest, Request};
use crate::sample::SampleSet;
use crate::strategy::{self, linear};

/// Entry point for boundary, tick and limit computations
///
/// The engine holds no state besides its configuration; every call works on
/// the given snapshot and returns a fresh value.
///
/// # Example
///
/// ```rust
/// use psy_bounds::{BoundsEngine, RequestContext, SampleSet};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = BoundsEngine::default();
/// let samples = SampleSet::new(vec![239.91, 250.0, 309.78]);
///
/// let bounds = engine.compute_value(&json!("rounded"), RequestContext::Bounds, &samples)?;
/// let values = bounds.values().unwrap();
/// assert_eq!(values.len(), 11);
/// assert_eq!(values[0], 235.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoundsEngine {
    config: EngineConfig,
}

impl BoundsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a raw request for `context`
    pub fn parse(&self, value: &Value, context: RequestContext) -> Result<Request> {
        Request::parse(value, context)
    }

    /// Compute the boundaries for an already parsed request
    pub fn compute(&self, request: &Request, samples: &SampleSet) -> Result<Boundaries> {
        match request {
            Request::Default => Ok(Boundaries::Default),
            Request::EveryNth(step) => Ok(Boundaries::EveryNth(*step)),
            Request::Explicit(values) => Ok(Boundaries::Values(values.clone())),
            Request::Norm(norm) => Ok(Boundaries::Norm(norm.clone())),
            Request::Compute(request) => {
                debug!(
                    method = %request.method,
                    n = ?request.n,
                    percmin = request.percmin,
                    percmax = request.percmax,
                    "computing boundaries"
                );
                strategy::run(request, samples, &self.config)
            }
        }
    }

    /// Parse and compute in one step
    pub fn compute_value(
        &self,
        value: &Value,
        context: RequestContext,
        samples: &SampleSet,
    ) -> Result<Boundaries> {
        let request = self.parse(value, context)?;
        self.compute(&request, samples)
    }

    /// Compute axis limits
    ///
    /// Every side given as a method is derived from the reduced range; the
    /// percentile of a `[method, percentile]` side applies to that side only.
    pub fn limits(&self, request: &LimitsRequest, samples: &SampleSet) -> Result<Boundaries> {
        if !request.min.needs_sample() && !request.max.needs_sample() {
            return Ok(Boundaries::Limits {
                vmin: fixed_side(&request.min),
                vmax: fixed_side(&request.max),
            });
        }

        let mut range_request = BoundsRequest::new(Method::MinMax);
        range_request.percmin = request.min.percentile().unwrap_or(0.0);
        range_request.percmax = request.max.percentile().unwrap_or(100.0);
        let range = linear::widen(
            reduce::vmin_vmax(samples, &range_request),
            self.config.degenerate_padding,
        );

        let side = |spec: &LimitSpec, upper: bool| match spec {
            LimitSpec::Method { method, .. } => {
                let (lo, hi) = linear::limit_range(*method, range.0, range.1);
                Some(if upper { hi } else { lo })
            }
            other => fixed_side(other),
        };
        let (vmin, vmax) = (side(&request.min, false), side(&request.max, true));
        debug!(?vmin, ?vmax, "computed limits");
        Ok(Boundaries::Limits { vmin, vmax })
    }

    /// Parse and compute limits in one step
    pub fn limits_value(&self, value: &Value, samples: &SampleSet) -> Result<Boundaries> {
        self.limits(&LimitsRequest::parse(value)?, samples)
    }
}

fn fixed_side(spec: &LimitSpec) -> Option<f64> {
    match spec {
        LimitSpec::Value(v) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_pass_through_requests() {
        let engine = BoundsEngine::default();
        let samples = SampleSet::default();
        assert_eq!(
            engine.compute(&Request::Default, &samples).unwrap(),
            Boundaries::Default
        );
        assert_eq!(
            engine.compute(&Request::Explicit(vec![1.0, 2.0]), &samples).unwrap(),
            Boundaries::Values(vec![1.0, 2.0])
        );
        assert_eq!(
            engine
                .compute_value(&json!(4), RequestContext::AxisTicks, &samples)
                .unwrap(),
            Boundaries::EveryNth(4)
        );
    }

    #[test]
    fn test_limits_per_side() {
        let engine = BoundsEngine::default();
        let samples = SampleSet::new((0..=100).map(f64::from).collect::<Vec<_>>());

        let limits = engine
            .limits_value(&json!([["minmax", 10], null]), &samples)
            .unwrap();
        let (vmin, vmax) = limits.limits().unwrap();
        assert_relative_eq!(vmin.unwrap(), 10.0);
        assert_eq!(vmax, None);

        let limits = engine.limits_value(&json!("sym"), &SampleSet::new(vec![-2.0, 5.0])).unwrap();
        assert_eq!(limits.limits(), Some((Some(-5.0), Some(5.0))));

        let limits = engine.limits_value(&json!([1, 7.5]), &SampleSet::default()).unwrap();
        assert_eq!(limits.limits(), Some((Some(1.0), Some(7.5))));
    }

    #[test]
    fn test_limits_rounded() {
        let engine = BoundsEngine::default();
        let samples = SampleSet::new(vec![239.91, 309.78]);
        let limits = engine.limits_value(&json!("rounded"), &samples).unwrap();
        let (vmin, vmax) = limits.limits().unwrap();
        assert_relative_eq!(vmin.unwrap(), 235.0);
        assert_relative_eq!(vmax.unwrap(), 310.0);
    }

    #[test]
    fn test_limits_degenerate_range_is_widened() {
        let engine = BoundsEngine::default();
        let samples = SampleSet::new(vec![5.0, 5.0]);
        let limits = engine.limits_value(&json!("minmax"), &samples).unwrap();
        assert_eq!(limits.limits(), Some((Some(4.0), Some(6.0))));
    }

    #[test]
    fn test_missing_colorbar_bounds() {
        let engine = BoundsEngine::default();
        let err = engine
            .compute_value(&json!("midbounds"), RequestContext::ColorbarTicks, &SampleSet::default())
            .unwrap_err();
        assert!(matches!(err, crate::BoundsError::MissingBounds { .. }));
    }
}
