use chrono::NaiveDateTime;
use serde::Serialize;

use crate::request::ContinuousNorm;

/// Result of a boundary or tick computation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Boundaries {
    /// Keep the caller's default (nothing requested, or no datetime axis)
    Default,
    /// Keep every n-th of the caller's default ticks
    EveryNth(usize),
    /// Ascending numeric boundaries or ticks
    Values(Vec<f64>),
    /// Calendar ticks
    Dates(Vec<NaiveDateTime>),
    /// Axis limits; `None` leaves a side to the caller
    Limits { vmin: Option<f64>, vmax: Option<f64> },
    /// A continuous normalization handed back as given
    Norm(ContinuousNorm),
}

impl Boundaries {
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Boundaries::Values(values) => Some(values),
            _ => None,
        }
    }

    pub fn dates(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Boundaries::Dates(dates) => Some(dates),
            _ => None,
        }
    }

    pub fn limits(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self {
            Boundaries::Limits { vmin, vmax } => Some((*vmin, *vmax)),
            _ => None,
        }
    }

    /// Number of discrete values (0 for non-sequence results)
    pub fn len(&self) -> usize {
        match self {
            Boundaries::Values(values) => values.len(),
            Boundaries::Dates(dates) => dates.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
