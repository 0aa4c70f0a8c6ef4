use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Parameters of one call-center run, minus the staff count.
///
/// Durations are in simulated minutes. Every field has a default, so a TOML document only needs to list the values
/// it overrides:
///
/// ```toml
/// arrival_rate = 0.25
/// sim_time = 600.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shortest service a customer can need.
    pub service_time_min: u32,
    /// Longest service a customer can need.
    pub service_time_max: u32,
    /// Mean arrivals per minute after the initial burst. Zero disables further arrivals.
    pub arrival_rate: f64,
    /// Horizon of the run.
    pub sim_time: f64,
    pub patience_min: u32,
    pub patience_max: u32,
    /// Customers already calling at time zero.
    pub initial_customers: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_time_min: 5,
            service_time_max: 15,
            arrival_rate: 0.2,
            sim_time: 480.0,
            patience_min: 15,
            patience_max: 20,
            initial_customers: 3,
            seed: 42,
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, or any rejection from [`validate()`](Config::validate).
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as [`from_toml_str()`](Config::from_toml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the parameters for values no run could honour.
    ///
    /// # Errors
    ///
    /// The first violated constraint, as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sim_time.is_finite() && self.sim_time > 0.0) {
            return Err(ConfigError::NonPositiveHorizon(self.sim_time));
        }
        if !(self.arrival_rate.is_finite() && self.arrival_rate >= 0.0) {
            return Err(ConfigError::InvalidArrivalRate(self.arrival_rate));
        }
        if self.service_time_min == 0 {
            return Err(ConfigError::ZeroServiceTime);
        }
        if self.service_time_min > self.service_time_max {
            return Err(ConfigError::InvertedServiceBounds {
                min: self.service_time_min,
                max: self.service_time_max,
            });
        }
        if self.patience_min > self.patience_max {
            return Err(ConfigError::InvertedPatienceBounds {
                min: self.patience_min,
                max: self.patience_max,
            });
        }
        Ok(())
    }
}
