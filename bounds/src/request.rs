//! Parsing of user-facing requests into canonical, validated values.
//!
//! Requests arrive as loosely typed JSON (`null`, a method name, a positional
//! list, an object, an integer or an explicit array) and are normalized into a
//! [`Request`] before anything is computed. All validation happens here, so
//! the strategies only ever see well-formed input.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BoundsError, Result};
use crate::method::{Method, RequestContext};

fn default_percmax() -> f64 {
    100.0
}

/// Canonical description of how boundaries are computed
///
/// # Example
///
/// ```rust
/// use psy_bounds::{BoundsRequest, Method};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = BoundsRequest::builder()
///     .method(Method::Rounded)
///     .n(7usize)
///     .percmax(95.0)
///     .build()?;
/// assert_eq!(request.percmin, 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
#[serde(deny_unknown_fields)]
pub struct BoundsRequest {
    pub method: Method,

    /// Stride, ticks per decade or number of values, depending on the method
    #[serde(rename = "N", default)]
    #[builder(default)]
    pub n: Option<usize>,

    /// Lower percentile in [0, 100]
    #[serde(default)]
    #[builder(default = "0.0")]
    pub percmin: f64,

    /// Upper percentile in [0, 100]
    #[serde(default = "default_percmax")]
    #[builder(default = "100.0")]
    pub percmax: f64,

    /// Explicit lower endpoint, replaces `percmin`
    #[serde(default)]
    #[builder(default)]
    pub vmin: Option<f64>,

    /// Explicit upper endpoint, replaces `percmax`
    #[serde(default)]
    #[builder(default)]
    pub vmax: Option<f64>,
}

impl BoundsRequest {
    /// A request with default count, percentiles and no overrides
    pub fn new(method: Method) -> Self {
        Self {
            method,
            n: None,
            percmin: 0.0,
            percmax: 100.0,
            vmin: None,
            vmax: None,
        }
    }

    /// Create a new builder for BoundsRequest
    pub fn builder() -> BoundsRequestBuilder {
        BoundsRequestBuilder::default()
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    /// Check percentiles, count and overrides
    pub fn validate(&self) -> Result<()> {
        check_percentile("percmin", self.percmin)?;
        check_percentile("percmax", self.percmax)?;
        if self.percmin > self.percmax {
            return Err(BoundsError::invalid_request(format!(
                "percmin ({}) must not exceed percmax ({})",
                self.percmin, self.percmax
            )));
        }
        if self.n == Some(0) {
            return Err(BoundsError::invalid_count(0));
        }
        for (name, value) in [("vmin", self.vmin), ("vmax", self.vmax)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(BoundsError::invalid_request(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

impl BoundsRequestBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        let Some(method) = self.method else {
            return Ok(());
        };
        let request = BoundsRequest {
            method,
            n: self.n.flatten(),
            percmin: self.percmin.unwrap_or(0.0),
            percmax: self.percmax.unwrap_or(100.0),
            vmin: self.vmin.flatten(),
            vmax: self.vmax.flatten(),
        };
        request.validate().map_err(|e| e.to_string())
    }
}

fn check_percentile(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(BoundsError::InvalidPercentile { field, value })
    }
}

/// A continuous normalization object that is handed back untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "norm", rename_all = "lowercase")]
pub enum ContinuousNorm {
    Linear {
        #[serde(default)]
        vmin: Option<f64>,
        #[serde(default)]
        vmax: Option<f64>,
    },
    Log {
        #[serde(default)]
        vmin: Option<f64>,
        #[serde(default)]
        vmax: Option<f64>,
    },
    SymLog {
        linthresh: f64,
        #[serde(default)]
        vmin: Option<f64>,
        #[serde(default)]
        vmax: Option<f64>,
    },
}

/// A normalized request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Nothing to compute, the caller keeps its own default
    Default,
    /// Keep every n-th of the caller's default ticks
    EveryNth(usize),
    /// Compute boundaries with a method
    Compute(BoundsRequest),
    /// Explicit boundaries given by the user
    Explicit(Vec<f64>),
    /// A continuous normalization, passed through
    Norm(ContinuousNorm),
}

impl From<BoundsRequest> for Request {
    fn from(request: BoundsRequest) -> Self {
        Request::Compute(request)
    }
}

impl From<ContinuousNorm> for Request {
    fn from(norm: ContinuousNorm) -> Self {
        Request::Norm(norm)
    }
}

impl Request {
    /// Parse a raw request for the given context
    ///
    /// # Example
    ///
    /// ```rust
    /// use psy_bounds::{Method, Request, RequestContext};
    /// use serde_json::json;
    ///
    /// let request = Request::parse(&json!(["rounded", 5, 5, 95]), RequestContext::Bounds).unwrap();
    /// assert_eq!(request.method(), Some(Method::Rounded));
    ///
    /// let every = Request::parse(&json!(3), RequestContext::AxisTicks).unwrap();
    /// assert_eq!(every, Request::EveryNth(3));
    /// ```
    pub fn parse(value: &Value, context: RequestContext) -> Result<Self> {
        match value {
            Value::Null => Ok(Request::Default),
            Value::String(name) => checked(BoundsRequest::new(Method::parse(name)?), context),
            Value::Number(_) => {
                let count = parse_count(value)?;
                match context.count_method() {
                    Some(method) => checked(BoundsRequest::new(method).with_n(count), context),
                    None => Ok(Request::EveryNth(count)),
                }
            }
            Value::Object(map) if map.contains_key("norm") => {
                Ok(Request::Norm(serde_json::from_value(value.clone())?))
            }
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get("method") {
                    Method::parse(name)?;
                }
                checked(serde_json::from_value(value.clone())?, context)
            }
            Value::Array(items) if items.first().is_some_and(Value::is_string) => {
                checked(parse_positional(items)?, context)
            }
            Value::Array(items) => parse_explicit(items).map(Request::Explicit),
            Value::Bool(_) => Err(BoundsError::invalid_request(
                "a boolean is not a valid request",
            )),
        }
    }

    /// The method used by this request, if it computes anything
    pub fn method(&self) -> Option<Method> {
        match self {
            Request::Compute(request) => Some(request.method),
            _ => None,
        }
    }
}

fn checked(request: BoundsRequest, context: RequestContext) -> Result<Request> {
    context.check(request.method)?;
    request.validate()?;
    Ok(Request::Compute(request))
}

fn parse_count(value: &Value) -> Result<usize> {
    match value.as_u64() {
        Some(n) if n > 0 => usize::try_from(n).map_err(|_| BoundsError::invalid_count(n)),
        _ => Err(BoundsError::invalid_count(value)),
    }
}

fn optional_number(value: Option<&Value>, field: &str) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            BoundsError::invalid_request(format!("{field} must be a number, got {v}"))
        }),
    }
}

/// `[method, N, percmin, percmax, vmin, vmax]`, trailing entries optional
fn parse_positional(items: &[Value]) -> Result<BoundsRequest> {
    if items.len() > 6 {
        return Err(BoundsError::invalid_request(format!(
            "a positional request takes at most 6 entries, got {}",
            items.len()
        )));
    }
    let name = items.first().and_then(Value::as_str).unwrap_or_default();
    let mut request = BoundsRequest::new(Method::parse(name)?);

    request.n = match items.get(1) {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_count(v)?),
    };
    if let Some(p) = optional_number(items.get(2), "percmin")? {
        request.percmin = p;
    }
    if let Some(p) = optional_number(items.get(3), "percmax")? {
        request.percmax = p;
    }
    request.vmin = optional_number(items.get(4), "vmin")?;
    request.vmax = optional_number(items.get(5), "vmax")?;
    Ok(request)
}

fn parse_explicit(items: &[Value]) -> Result<Vec<f64>> {
    if items.is_empty() {
        return Err(BoundsError::invalid_request("explicit boundaries must not be empty"));
    }
    items
        .iter()
        .map(|item| match item.as_f64() {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(BoundsError::invalid_request(format!(
                "explicit boundaries must be finite numbers, got {item}"
            ))),
        })
        .collect()
}

/// One side of a limits request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitSpec {
    /// Leave this side to the caller
    Keep,
    /// A fixed value
    Value(f64),
    /// Compute the side with a limit method, optionally at a percentile
    Method {
        method: Method,
        percentile: Option<f64>,
    },
}

impl LimitSpec {
    fn parse(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(LimitSpec::Keep),
            Value::Number(_) => value
                .as_f64()
                .filter(|v| v.is_finite())
                .map(LimitSpec::Value)
                .ok_or_else(|| BoundsError::invalid_request(format!("invalid limit {value}"))),
            Value::String(name) => Self::method(name, None),
            Value::Array(items) => match items.as_slice() {
                [Value::String(name)] => Self::method(name, None),
                [Value::String(name), pct] => {
                    let pct = pct.as_f64().ok_or_else(|| {
                        BoundsError::invalid_request(format!("percentile must be a number, got {pct}"))
                    })?;
                    Self::method(name, Some(pct))
                }
                _ => Err(BoundsError::invalid_request(format!(
                    "a limit must be a method or [method, percentile], got {value}"
                ))),
            },
            other => Err(BoundsError::invalid_request(format!("invalid limit {other}"))),
        }
    }

    fn method(name: &str, percentile: Option<f64>) -> Result<Self> {
        let method = Method::parse(name)?;
        if !method.is_limit_method() {
            return Err(BoundsError::unsupported_method(name, "limits"));
        }
        Ok(LimitSpec::Method { method, percentile })
    }

    /// Whether this side needs the sample at all
    pub fn needs_sample(&self) -> bool {
        matches!(self, LimitSpec::Method { .. })
    }

    pub(crate) fn percentile(&self) -> Option<f64> {
        match self {
            LimitSpec::Method { percentile, .. } => *percentile,
            _ => None,
        }
    }
}

/// Axis limits requested per side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitsRequest {
    pub min: LimitSpec,
    pub max: LimitSpec,
}

impl LimitsRequest {
    /// The same method on both sides
    pub fn both(method: Method) -> Self {
        let spec = LimitSpec::Method {
            method,
            percentile: None,
        };
        Self { min: spec, max: spec }
    }

    /// Parse `null`, a method name or a `[min_spec, max_spec]` pair
    pub fn parse(value: &Value) -> Result<Self> {
        let request = match value {
            Value::Null => Self {
                min: LimitSpec::Keep,
                max: LimitSpec::Keep,
            },
            Value::String(name) => {
                let spec = LimitSpec::method(name, None)?;
                Self { min: spec, max: spec }
            }
            Value::Array(items) if items.len() == 2 => Self {
                min: LimitSpec::parse(&items[0])?,
                max: LimitSpec::parse(&items[1])?,
            },
            other => {
                return Err(BoundsError::invalid_request(format!(
                    "limits must be a method or a list of length 2, got {other}"
                )));
            }
        };
        if let Some(p) = request.min.percentile() {
            check_percentile("percmin", p)?;
        }
        if let Some(p) = request.max.percentile() {
            check_percentile("percmax", p)?;
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<Request> {
        Request::parse(&value, RequestContext::Bounds)
    }

    fn compute(value: Value) -> BoundsRequest {
        match parse(value).unwrap() {
            Request::Compute(request) => request,
            other => panic!("expected a computation, got {other:?}"),
        }
    }

    #[test]
    fn test_null_is_default() {
        assert_eq!(parse(Value::Null).unwrap(), Request::Default);
    }

    #[test]
    fn test_method_string() {
        assert_eq!(compute(json!("symlog")), BoundsRequest::new(Method::SymLog));
    }

    #[test]
    fn test_positional_list() {
        let request = compute(json!(["rounded", null, 5, 95]));
        assert_eq!(request.method, Method::Rounded);
        assert_eq!(request.n, None);
        assert_eq!(request.percmin, 5.0);
        assert_eq!(request.percmax, 95.0);

        let request = compute(json!(["minmax", 4, null, null, -1.5, 2]));
        assert_eq!(request.n, Some(4));
        assert_eq!(request.vmin, Some(-1.5));
        assert_eq!(request.vmax, Some(2.0));
    }

    #[test]
    fn test_object_matches_positional() {
        let object = compute(json!({"method": "log", "N": 3, "percmax": 99}));
        let positional = compute(json!(["log", 3, 0, 99]));
        assert_eq!(object, positional);
    }

    #[test]
    fn test_integer_shorthand_depends_on_context() {
        let bounds = compute(json!(7));
        assert_eq!(bounds, BoundsRequest::new(Method::Rounded).with_n(7));

        let cticks = Request::parse(&json!(2), RequestContext::ColorbarTicks).unwrap();
        assert_eq!(cticks, Request::Compute(BoundsRequest::new(Method::Bounds).with_n(2)));

        let ticks = Request::parse(&json!(2), RequestContext::AxisTicks).unwrap();
        assert_eq!(ticks, Request::EveryNth(2));
    }

    #[test]
    fn test_explicit_array() {
        assert_eq!(
            parse(json!([0, 0.5, 2])).unwrap(),
            Request::Explicit(vec![0.0, 0.5, 2.0])
        );
        assert!(parse(json!([])).is_err());
        assert!(parse(json!([1, "a"])).is_err());
    }

    #[test]
    fn test_norm_pass_through() {
        let request = parse(json!({"norm": "symlog", "linthresh": 0.1})).unwrap();
        assert_eq!(
            request,
            Request::Norm(ContinuousNorm::SymLog {
                linthresh: 0.1,
                vmin: None,
                vmax: None
            })
        );
    }

    #[test]
    fn test_invalid_requests() {
        assert!(matches!(
            parse(json!(["rounded", null, 120])),
            Err(BoundsError::InvalidPercentile { field: "percmin", .. })
        ));
        assert!(matches!(
            parse(json!({"method": "rounded", "percmax": -1})),
            Err(BoundsError::InvalidPercentile { field: "percmax", .. })
        ));
        assert!(matches!(
            parse(json!(["log", null, 90, 10])),
            Err(BoundsError::InvalidRequest { .. })
        ));
        assert!(matches!(
            parse(json!({"method": "minmax", "percmin": 60, "percmax": 40})),
            Err(BoundsError::InvalidRequest { .. })
        ));
        assert!(parse(json!(["minmax", null, 50, 50])).is_ok());
        assert!(matches!(parse(json!(0)), Err(BoundsError::InvalidCount { .. })));
        assert!(matches!(parse(json!(-3)), Err(BoundsError::InvalidCount { .. })));
        assert!(matches!(parse(json!(2.5)), Err(BoundsError::InvalidCount { .. })));
        assert!(matches!(parse(json!(["log", 0])), Err(BoundsError::InvalidCount { .. })));
        assert!(matches!(parse(json!("fancy")), Err(BoundsError::UnknownMethod { .. })));
        assert!(matches!(
            parse(json!({"method": "fancy"})),
            Err(BoundsError::UnknownMethod { .. })
        ));
        assert!(matches!(
            parse(json!("month")),
            Err(BoundsError::UnsupportedMethod { .. })
        ));
        assert!(matches!(
            parse(json!({"method": "rounded", "bogus": 1})),
            Err(BoundsError::SerializationError(_))
        ));
        assert!(parse(json!(true)).is_err());
        assert!(parse(json!(["rounded", 1, 2, 3, 4, 5, 6])).is_err());
    }

    #[test]
    fn test_builder_validation() {
        let err = BoundsRequest::builder()
            .method(Method::Rounded)
            .percmin(-5.0)
            .build();
        assert!(err.is_err());

        let request = BoundsRequest::builder()
            .method(Method::Sym)
            .vmax(3.0)
            .build()
            .unwrap();
        assert_eq!(request.vmax, Some(3.0));
        assert_eq!(request.percmax, 100.0);
    }

    #[test]
    fn test_limits_parsing() {
        assert_eq!(
            LimitsRequest::parse(&Value::Null).unwrap(),
            LimitsRequest {
                min: LimitSpec::Keep,
                max: LimitSpec::Keep
            }
        );
        assert_eq!(
            LimitsRequest::parse(&json!("rounded")).unwrap(),
            LimitsRequest::both(Method::Rounded)
        );

        let request = LimitsRequest::parse(&json!([["minmax", 5], 10])).unwrap();
        assert_eq!(
            request.min,
            LimitSpec::Method {
                method: Method::MinMax,
                percentile: Some(5.0)
            }
        );
        assert_eq!(request.max, LimitSpec::Value(10.0));
    }

    #[test]
    fn test_limits_rejects_non_limit_methods() {
        assert!(matches!(
            LimitsRequest::parse(&json!("log")),
            Err(BoundsError::UnsupportedMethod { .. })
        ));
        assert!(LimitsRequest::parse(&json!(["rounded"])).is_err());
        assert!(LimitsRequest::parse(&json!([["rounded", 150], null])).is_err());
    }
}
