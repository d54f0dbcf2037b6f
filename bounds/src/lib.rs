//! Bounds and ticks derivation for plots
//!
//! This crate derives colorbar/contour boundaries, axis ticks and axis limits
//! from data statistics, driven by a small grammar of named methods
//! (`rounded`, `minmax`, `sym`, `log`, `symlog`, percentile variants and
//! calendar frequencies such as `month` or `yearbegin`).
//!
//! A computation (a) collects the finite values of a primary sample and any
//! shared samples, (b) reduces them to `(vmin, vmax)` by minimum/maximum or
//! percentiles, and (c) expands that range into an ascending, symmetric,
//! logarithmic or calendar sequence.
//!
//! # Quick Start
//!
//! ```rust
//! use psy_bounds::{BoundsEngine, RequestContext, SampleSet};
//! use serde_json::json;
//!
//! let engine = BoundsEngine::default();
//!
//! // two subplots sharing one colorbar
//! let samples = SampleSet::new(vec![-0.7, 0.2, 3.4]).with_shared(vec![-2.1, 1.0]);
//!
//! let bounds = engine.compute_value(&json!(["roundedsym", null, 5, 95]), RequestContext::Bounds, &samples)?;
//! let values = bounds.values().unwrap();
//! assert_eq!(values.len(), 10);
//! assert_eq!(values[0], -values[9]);
//!
//! let limits = engine.limits_value(&json!(["rounded", ["minmax", 90]]), &samples)?;
//! println!("{:?}", limits.limits());
//! # Ok::<(), psy_bounds::BoundsError>(())
//! ```
//!
//! # Request shapes
//!
//! | value                                   | meaning                                   |
//! |-----------------------------------------|-------------------------------------------|
//! | `null`                                  | keep the caller's default                 |
//! | `"method"`                              | method with default parameters            |
//! | `["method", N, percmin, percmax, vmin, vmax]` | positional, trailing entries optional |
//! | `{"method": .., "N": .., ...}`          | same keys as the positional form          |
//! | integer `i`                             | context dependent, see [`RequestContext`] |
//! | numeric array                           | explicit boundaries                       |
//! | `{"norm": ..}`                          | continuous normalization, passed through  |

pub mod boundaries;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod method;
pub mod reduce;
pub mod request;
pub mod rounding;
pub mod sample;
pub mod strategy;

pub use boundaries::Boundaries;
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::BoundsEngine;
pub use error::{BoundsError, Result};
pub use method::{Method, MethodFamily, RequestContext};
pub use request::{
    BoundsRequest, BoundsRequestBuilder, ContinuousNorm, LimitSpec, LimitsRequest, Request,
};
pub use rounding::{RoundingMode, round_min_max, round_to_05};
pub use sample::{SampleSet, SampleSource, SharedArray};
pub use strategy::{linspace, symmetric_linspace};
