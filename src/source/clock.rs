//! Log clock: anchors boot-relative message stamps to UTC using GPS week time

use crate::types::{FieldValue, Message, TimeSpan};

/// Unix time of the GPS epoch, 1980-01-06T00:00:00Z
pub const GPS_EPOCH_UNIX: i64 = 86_400 * (10 * 365 + (1980 - 1969) / 4 + 1 + 6 - 2);

/// GPS time runs ahead of UTC by this many seconds
pub const GPS_LEAP_SECONDS: f64 = 18.0;

const SECONDS_PER_WEEK: i64 = 7 * 86_400;

/// Convert GPS week number and milliseconds-of-week to Unix seconds (UTC)
pub fn gps_time_to_unix(week: i64, msec: i64) -> f64 {
    (GPS_EPOCH_UNIX + SECONDS_PER_WEEK * week) as f64 + msec as f64 * 0.001 - GPS_LEAP_SECONDS
}

fn field_i64(message: &Message, names: &[&str]) -> Option<i64> {
    names
        .iter()
        .find_map(|name| message.get(name).and_then(FieldValue::as_i64))
}

fn is_gps_type(type_name: &str) -> bool {
    type_name == "GPS" || type_name == "GPS2"
}

/// Seconds since boot carried by a message, if any
///
/// Old-style GPS records keep GPS time-of-week in `TimeMS` and boot time in `T`.
fn boot_seconds(message: &Message) -> Option<f64> {
    if is_gps_type(message.type_name()) {
        if let Some(t) = field_i64(message, &["T"]) {
            return Some(t as f64 * 0.001);
        }
        if message.get("GWk").is_none() && message.get("Week").is_some() {
            return None;
        }
    }
    if let Some(us) = field_i64(message, &["TimeUS"]) {
        return Some(us as f64 * 1e-6);
    }
    field_i64(message, &["TimeMS"]).map(|ms| ms as f64 * 0.001)
}

/// Tracks the boot-to-UTC offset and the last message stamp of a log
#[derive(Debug, Clone, Default)]
pub struct LogClock {
    timebase: Option<f64>,
    last_boot: Option<f64>,
}

impl LogClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded message, in log order
    pub fn observe(&mut self, message: &Message) {
        let boot = boot_seconds(message);
        if boot.is_some() {
            self.last_boot = boot;
        }

        if self.timebase.is_none() && is_gps_type(message.type_name()) {
            self.timebase = Self::gps_timebase(message, boot);
        }
    }

    /// Unix time at boot, from the first GPS record with a week number
    fn gps_timebase(message: &Message, boot: Option<f64>) -> Option<f64> {
        // New style: GWk/GMS alongside TimeUS
        if let (Some(week), Some(msec)) = (
            field_i64(message, &["GWk", "Wk"]),
            field_i64(message, &["GMS"]),
        ) {
            if week > 0 {
                return Some(gps_time_to_unix(week, msec) - boot.unwrap_or(0.0));
            }
            return None;
        }

        // Old style: Week/TimeMS, boot time in T
        let week = field_i64(message, &["Week"])?;
        let msec = field_i64(message, &["TimeMS"])?;
        if week > 0 {
            Some(gps_time_to_unix(week, msec) - boot.unwrap_or(0.0))
        } else {
            None
        }
    }

    pub fn timebase(&self) -> Option<f64> {
        self.timebase
    }

    /// UTC span of the log: from boot to the last stamped message
    ///
    /// Zero when no GPS week time was seen.
    pub fn span(&self) -> TimeSpan {
        match self.timebase {
            Some(base) => TimeSpan {
                start: base,
                end: base + self.last_boot.unwrap_or(0.0),
            },
            None => TimeSpan::default(),
        }
    }
}
