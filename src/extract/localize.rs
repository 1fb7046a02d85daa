//! Local date/time label for a log, from its first fix and start time

use crate::config::TimezoneConfig;
use crate::error::{GeoError, Result};
use crate::types::GpsFix;
use chrono::DateTime;
use chrono_tz::Tz;
use log::warn;

/// Resolves the timezone in effect at a coordinate
pub trait TimezoneLookup {
    fn timezone_at(&self, lat: f64, lng: f64) -> Option<Tz>;
}

impl<F> TimezoneLookup for F
where
    F: Fn(f64, f64) -> Option<Tz>,
{
    fn timezone_at(&self, lat: f64, lng: f64) -> Option<Tz> {
        self(lat, lng)
    }
}

/// Lookup that never resolves a timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTimezone;

impl TimezoneLookup for NoTimezone {
    fn timezone_at(&self, _lat: f64, _lng: f64) -> Option<Tz> {
        None
    }
}

/// Rectangular area mapped to one timezone
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub tz: Tz,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Region {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// Timezone lookup backed by configured bounding boxes
///
/// Regions are tried in order; the first containing the coordinate wins. When
/// none does, the fallback zone (if any) is used.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: Vec<Region>,
    fallback: Option<Tz>,
}

fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| GeoError::Config(format!("unknown timezone '{}': {}", name, e)))
}

impl RegionTable {
    pub fn new(regions: Vec<Region>, fallback: Option<Tz>) -> Self {
        Self { regions, fallback }
    }

    pub fn from_config(config: &TimezoneConfig) -> Result<Self> {
        let regions = config
            .regions
            .iter()
            .map(|region| {
                Ok(Region {
                    tz: parse_tz(&region.name)?,
                    min_lat: region.min_lat,
                    max_lat: region.max_lat,
                    min_lng: region.min_lng,
                    max_lng: region.max_lng,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let fallback = config.fallback.as_deref().map(parse_tz).transpose()?;
        Ok(Self::new(regions, fallback))
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.fallback.is_none()
    }

    /// Zone of the first configured region containing the coordinate
    pub fn region_at(&self, lat: f64, lng: f64) -> Option<Tz> {
        self.regions
            .iter()
            .find(|region| region.contains(lat, lng))
            .map(|region| region.tz)
    }

    pub fn fallback(&self) -> Option<Tz> {
        self.fallback
    }
}

impl TimezoneLookup for RegionTable {
    fn timezone_at(&self, lat: f64, lng: f64) -> Option<Tz> {
        self.region_at(lat, lng).or(self.fallback)
    }
}

/// Region table backed by the bundled timezone boundary database
///
/// Configured regions win, then the zone whose boundary contains the coordinate,
/// then the fallback zone.
#[cfg(feature = "tz-detect")]
pub struct DetectedTimezones {
    table: RegionTable,
    finder: tzf_rs::DefaultFinder,
}

#[cfg(feature = "tz-detect")]
impl DetectedTimezones {
    /// Loads the boundary database; build once and reuse across logs
    pub fn new(table: RegionTable) -> Self {
        Self {
            table,
            finder: tzf_rs::DefaultFinder::new(),
        }
    }

    fn detect(&self, lat: f64, lng: f64) -> Option<Tz> {
        let name = self.finder.get_tz_name(lng, lat);
        if name.is_empty() {
            return None;
        }
        name.parse::<Tz>().ok()
    }
}

#[cfg(feature = "tz-detect")]
impl TimezoneLookup for DetectedTimezones {
    fn timezone_at(&self, lat: f64, lng: f64) -> Option<Tz> {
        self.table
            .region_at(lat, lng)
            .or_else(|| self.detect(lat, lng))
            .or(self.table.fallback())
    }
}

/// Build the "Local Date: MM/DD/YYYY, Local Time: HH:MM:SS" label
///
/// `stream_start_utc` is seconds since the Unix epoch. Returns `None` when the
/// start is unknown (not after the epoch), the fix has no coordinates, or no
/// timezone covers them.
pub fn annotate_local_time(
    stream_start_utc: f64,
    first_fix: &GpsFix,
    lookup: &dyn TimezoneLookup,
) -> Option<String> {
    if stream_start_utc <= 0.0 {
        return None;
    }
    let start = DateTime::from_timestamp(stream_start_utc.floor() as i64, 0)?;

    let (lat, lng) = (first_fix.latitude()?, first_fix.longitude()?);
    let Some(tz) = lookup.timezone_at(lat, lng) else {
        warn!("Could not determine the timezone at {:.6}, {:.6}", lat, lng);
        return None;
    };

    let local = start.with_timezone(&tz);
    Some(format!(
        "Local Date: {}, Local Time: {}",
        local.format("%m/%d/%Y"),
        local.format("%H:%M:%S")
    ))
}
