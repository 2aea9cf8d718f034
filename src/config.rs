//! Tunable constants of the background renderer.
//!
//! Defaults reproduce the stock backdrop: 800 stars approaching at one unit
//! per frame through a 128 px focal length, and 5 nebula clouds drifting at
//! most 0.05 px per frame.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::app::{NebulaHue, Rgba};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub star_count: usize,
    /// Depth lost by every star per frame.
    pub star_speed: f64,
    /// Numerator of the perspective factor `k = focal_length / z`.
    pub focal_length: f64,
    /// Radius of a star sitting right in front of the viewer.
    pub max_star_radius: f64,
    pub cloud_count: usize,
    /// Smallest cloud radius as a fraction of `min(width, height)`.
    pub cloud_radius_min: f64,
    /// Width of the radius range on top of `cloud_radius_min`.
    pub cloud_radius_span: f64,
    /// Velocity components are drawn from `[-cloud_drift, cloud_drift)`.
    pub cloud_drift: f64,
    pub palette: Vec<Rgba>,
    pub background: Rgba,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 800,
            star_speed: 1.,
            focal_length: 128.,
            max_star_radius: 2.,
            cloud_count: 5,
            cloud_radius_min: 0.2,
            cloud_radius_span: 0.4,
            cloud_drift: 0.05,
            palette: NebulaHue::iter().map(NebulaHue::rgba).collect(),
            background: Rgba::BLACK,
        }
    }
}

impl StarfieldConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.star_speed > 0.) {
            return Err(ConfigError::Invalid("star_speed must be positive"));
        }
        if !(self.focal_length > 0.) {
            return Err(ConfigError::Invalid("focal_length must be positive"));
        }
        if !(self.max_star_radius >= 0.) {
            return Err(ConfigError::Invalid("max_star_radius must not be negative"));
        }
        if !(self.cloud_radius_min >= 0.) || !(self.cloud_radius_span >= 0.) {
            return Err(ConfigError::Invalid("cloud radius fractions must not be negative"));
        }
        if !(self.cloud_drift >= 0.) {
            return Err(ConfigError::Invalid("cloud_drift must not be negative"));
        }
        if self.cloud_count > 0 && self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette is empty but clouds were requested"));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_backdrop() {
        let config = StarfieldConfig::default();
        assert_eq!(config.star_count, 800);
        assert_eq!(config.cloud_count, 5);
        assert_eq!(config.palette.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config =
            StarfieldConfig::from_toml_str("star_count = 120\nstar_speed = 2.5\n").unwrap();
        assert_eq!(config.star_count, 120);
        assert_eq!(config.star_speed, 2.5);
        assert_eq!(config.focal_length, 128.);
        assert_eq!(config.palette, StarfieldConfig::default().palette);
    }

    #[test]
    fn toml_round_trip() {
        let config = StarfieldConfig {
            cloud_count: 2,
            palette: vec![Rgba::new(1, 2, 3, 0.5)],
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(StarfieldConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        let err = StarfieldConfig::from_toml_str("star_speed = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = StarfieldConfig {
            palette: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StarfieldConfig {
            palette: vec![],
            cloud_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = StarfieldConfig::from_toml_str("star_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
