//! # Configuration Module
//!
//! Loads and validates the optional TOML configuration file. Every section has
//! defaults, so an empty file (or no file at all) is a valid configuration.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{GeoError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub timezone: TimezoneConfig,
}

/// Output settings; command-line flags take precedence
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default = "default_csv")]
    pub csv: bool,

    #[serde(default)]
    pub json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            csv: default_csv(),
            json: false,
        }
    }
}

/// Timezone lookup table used to label logs with their local start time
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TimezoneConfig {
    /// IANA zone used when no region matches
    #[serde(default)]
    pub fallback: Option<String>,

    #[serde(default)]
    pub regions: Vec<TimezoneRegionConfig>,
}

/// Bounding box mapped to an IANA zone name
#[derive(Debug, Deserialize, Clone)]
pub struct TimezoneRegionConfig {
    pub name: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

fn default_csv() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            GeoError::Config(msg) => GeoError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| GeoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.export.output_dir {
            if dir.trim().is_empty() {
                return Err(GeoError::Config(
                    "export.output_dir cannot be empty".to_string(),
                ));
            }
        }

        if let Some(fallback) = &self.timezone.fallback {
            validate_zone_name(fallback)?;
        }

        for (i, region) in self.timezone.regions.iter().enumerate() {
            validate_zone_name(&region.name)?;

            let latitudes = -90.0..=90.0;
            if !latitudes.contains(&region.min_lat) || !latitudes.contains(&region.max_lat) {
                return Err(GeoError::Config(format!(
                    "timezone.regions[{}] ({}): latitude must be within -90..90",
                    i, region.name
                )));
            }
            let longitudes = -180.0..=180.0;
            if !longitudes.contains(&region.min_lng) || !longitudes.contains(&region.max_lng) {
                return Err(GeoError::Config(format!(
                    "timezone.regions[{}] ({}): longitude must be within -180..180",
                    i, region.name
                )));
            }
            if region.min_lat > region.max_lat || region.min_lng > region.max_lng {
                return Err(GeoError::Config(format!(
                    "timezone.regions[{}] ({}): min bound exceeds max bound",
                    i, region.name
                )));
            }
        }

        Ok(())
    }
}

fn validate_zone_name(name: &str) -> Result<()> {
    name.parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| GeoError::Config(format!("unknown timezone '{}'", name)))
}
