use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Engine-wide defaults used when a request does not name them explicitly
///
/// # Example
///
/// ```rust
/// use psy_bounds::EngineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EngineConfig::new()
///     .linear_points(21usize)
///     .degenerate_padding(0.5)
///     .build()?;
/// assert_eq!(config.symmetric_points, 10);
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into), default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct EngineConfig {
    /// Number of values for `rounded` and `minmax`
    #[builder(default = "11")]
    pub linear_points: usize,

    /// Number of values for `roundedsym` and `sym`
    #[builder(default = "10")]
    pub symmetric_points: usize,

    /// Approximate number of `log` boundaries across all decades
    #[builder(default = "11")]
    pub log_total: usize,

    /// Approximate number of `symlog` boundaries across all decades
    #[builder(default = "12")]
    pub symlog_total: usize,

    /// Half-width a degenerate range (`vmin == vmax`) is widened by
    #[builder(default = "1.0")]
    pub degenerate_padding: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            linear_points: 11,
            symmetric_points: 10,
            log_total: 11,
            symlog_total: 12,
            degenerate_padding: 1.0,
        }
    }
}

impl EngineConfig {
    /// Create a new builder for EngineConfig
    pub fn new() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Check a deserialized configuration
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("linear_points", self.linear_points),
            ("symmetric_points", self.symmetric_points),
            ("log_total", self.log_total),
            ("symlog_total", self.symlog_total),
        ] {
            if value == 0 {
                return Err(crate::BoundsError::invalid_request(format!(
                    "{name} must be positive"
                )));
            }
        }
        if !(self.degenerate_padding.is_finite() && self.degenerate_padding > 0.0) {
            return Err(crate::BoundsError::invalid_request(format!(
                "degenerate_padding must be a positive number, got {}",
                self.degenerate_padding
            )));
        }
        Ok(())
    }

    /// Default number of values for a linear method
    pub(crate) fn linear_default(&self, symmetric: bool) -> usize {
        if symmetric {
            self.symmetric_points
        } else {
            self.linear_points
        }
    }

    /// Default total number of boundaries for a logarithmic method
    pub(crate) fn log_default(&self, symmetric: bool) -> usize {
        if symmetric {
            self.symlog_total
        } else {
            self.log_total
        }
    }
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            linear_points: self.linear_points.unwrap_or(defaults.linear_points),
            symmetric_points: self.symmetric_points.unwrap_or(defaults.symmetric_points),
            log_total: self.log_total.unwrap_or(defaults.log_total),
            symlog_total: self.symlog_total.unwrap_or(defaults.symlog_total),
            degenerate_padding: self.degenerate_padding.unwrap_or(defaults.degenerate_padding),
        };
        config.validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.linear_points, 11);
        assert_eq!(config.symmetric_points, 10);
        assert_eq!(config.log_total, 11);
        assert_eq!(config.symlog_total, 12);
        assert_eq!(config.degenerate_padding, 1.0);
    }

    #[test]
    fn test_engine_config_builder_partial() {
        let config = EngineConfig::new().log_total(20usize).build().unwrap();
        assert_eq!(config.log_total, 20);
        assert_eq!(config.linear_points, 11);
        assert_eq!(config, EngineConfig { log_total: 20, ..Default::default() });
    }

    #[test]
    fn test_engine_config_builder_rejects_invalid() {
        assert!(EngineConfig::new().linear_points(0usize).build().is_err());
        assert!(EngineConfig::new().degenerate_padding(-1.0).build().is_err());
    }

    #[test]
    fn test_engine_config_from_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"symlog_total": 16}"#).unwrap();
        assert_eq!(config.symlog_total, 16);
        assert_eq!(config.log_total, 11);
        assert!(config.validate().is_ok());
    }
}
