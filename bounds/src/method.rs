//! The closed set of boundary/tick methods and where each may be used.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::calendar::{CalendarRule, Frequency};

/// Named method that turns a data sample into boundaries or ticks
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Exactly the (unique) data values
    Data,
    /// Midpoints between consecutive unique data values
    Mid,
    /// Rounded data minimum and maximum
    Rounded,
    /// Rounded and symmetric around zero
    RoundedSym,
    /// Data minimum and maximum
    MinMax,
    /// Data minimum and maximum, symmetric around zero
    Sym,
    /// Boundaries per power of ten
    Log,
    /// Boundaries per power of ten, symmetric around zero
    SymLog,
    /// Every N-th of previously computed colorbar bounds
    Bounds,
    /// Midpoints of previously computed colorbar bounds
    MidBounds,
    /// Every hour
    Hour,
    /// Every day
    Day,
    /// Every week
    Week,
    /// Middle of each month
    Month,
    /// End of each month
    MonthEnd,
    /// Beginning of each month
    MonthBegin,
    /// Middle of each year
    Year,
    /// End of each year
    YearEnd,
    /// Beginning of each year
    YearBegin,
}

/// How a method derives its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFamily {
    /// Values taken from the sample itself (`data`, `mid`)
    Points,
    /// Evenly spaced values between (rounded) extrema
    Linear,
    /// Per-decade values
    Logarithmic,
    /// Ticks derived from colorbar bounds
    FromBounds,
    /// Calendar frequencies on a datetime axis
    Calendar(CalendarRule),
}

impl Method {
    /// The family this method belongs to
    pub fn family(self) -> MethodFamily {
        match self {
            Method::Data | Method::Mid => MethodFamily::Points,
            Method::Rounded | Method::RoundedSym | Method::MinMax | Method::Sym => {
                MethodFamily::Linear
            }
            Method::Log | Method::SymLog => MethodFamily::Logarithmic,
            Method::Bounds | Method::MidBounds => MethodFamily::FromBounds,
            Method::Hour => MethodFamily::Calendar(CalendarRule::every(Frequency::Hourly)),
            Method::Day => MethodFamily::Calendar(CalendarRule::every(Frequency::Daily)),
            Method::Week => MethodFamily::Calendar(CalendarRule::every(Frequency::Weekly)),
            Method::Month => MethodFamily::Calendar(CalendarRule::mid(Frequency::MonthEnd)),
            Method::MonthEnd => MethodFamily::Calendar(CalendarRule::padded(
                Frequency::MonthEnd,
                Some(Frequency::MonthBegin),
                None,
            )),
            Method::MonthBegin => MethodFamily::Calendar(CalendarRule::padded(
                Frequency::MonthBegin,
                Some(Frequency::MonthBegin),
                Some(Frequency::MonthBegin),
            )),
            Method::Year => MethodFamily::Calendar(CalendarRule::mid(Frequency::YearBegin)),
            Method::YearEnd => MethodFamily::Calendar(CalendarRule::padded(
                Frequency::YearEnd,
                Some(Frequency::YearBegin),
                None,
            )),
            Method::YearBegin => MethodFamily::Calendar(CalendarRule::padded(
                Frequency::YearBegin,
                Some(Frequency::YearBegin),
                Some(Frequency::YearBegin),
            )),
        }
    }

    /// Whether the result is mirrored around zero
    pub fn is_symmetric(self) -> bool {
        matches!(self, Method::RoundedSym | Method::Sym | Method::SymLog)
    }

    /// Whether the method may be used to compute axis limits
    pub fn is_limit_method(self) -> bool {
        self.family() == MethodFamily::Linear
    }

    /// Parse a method name, failing with [`BoundsError::UnknownMethod`]
    ///
    /// [`BoundsError::UnknownMethod`]: crate::BoundsError::UnknownMethod
    pub fn parse(name: &str) -> crate::Result<Self> {
        name.parse::<Method>()
            .map_err(|_| crate::BoundsError::unknown_method(name))
    }
}

/// The kind of request a method is used for
///
/// Each context accepts a different subset of [`Method`] and gives the
/// integer shorthand a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestContext {
    /// Colorbar/contour boundaries; an integer `i` means `["rounded", i]`
    Bounds,
    /// Colorbar ticks; an integer `i` means `["bounds", i]`
    #[strum(to_string = "cticks")]
    #[serde(rename = "cticks")]
    ColorbarTicks,
    /// Axis ticks; an integer `i` keeps every i-th default tick
    #[strum(to_string = "ticks")]
    #[serde(rename = "ticks")]
    AxisTicks,
}

impl RequestContext {
    /// Whether `method` may be requested in this context
    pub fn allows(self, method: Method) -> bool {
        match method.family() {
            MethodFamily::Points | MethodFamily::Linear | MethodFamily::Logarithmic => true,
            MethodFamily::FromBounds => self == RequestContext::ColorbarTicks,
            MethodFamily::Calendar(_) => self == RequestContext::AxisTicks,
        }
    }

    /// All methods accepted in this context
    pub fn methods(self) -> Vec<Method> {
        Method::iter().filter(|m| self.allows(*m)).collect()
    }

    /// The method an integer shorthand expands to, if any
    pub fn count_method(self) -> Option<Method> {
        match self {
            RequestContext::Bounds => Some(Method::Rounded),
            RequestContext::ColorbarTicks => Some(Method::Bounds),
            RequestContext::AxisTicks => None,
        }
    }

    /// Validate that `method` is allowed here
    pub fn check(self, method: Method) -> crate::Result<Method> {
        if self.allows(method) {
            Ok(method)
        } else {
            Err(crate::BoundsError::unsupported_method(
                method.to_string(),
                self.to_string(),
            ))
        }
    }
}
