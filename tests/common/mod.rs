//! DataFlash text log fixtures shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "\
FMT, 128, 89, FMT, BBnNZ, Type,Length,Name,Format,Columns
FMT, 130, 45, GPS, BIHBcLLeeEefI, Status,TimeMS,Week,NSats,HDop,Lat,Lng,RelAlt,Alt,Spd,GCrs,VZ,T
FMT, 131, 31, ATT, IccccCC, TimeMS,DesRoll,Roll,DesPitch,Pitch,DesYaw,Yaw
";

/// Old-style GPS record: GPS week 2200, `time_ms` into the week, `boot_ms` since boot
pub fn gps_line(time_ms: u32, lat: f64, boot_ms: u32) -> String {
    format!(
        "GPS, 3, {time_ms}, 2200, 10, 0.9, {lat}, 149.1652374, 0.3, 584.2, 0.0, 0.0, 0.0, {boot_ms}\n"
    )
}

pub fn att_line(boot_ms: u32) -> String {
    format!("ATT, {boot_ms}, 0.0, 0.1, 0.0, -0.2, 90.0, 90.1\n")
}

/// Five GPS snapshots with TimeMS 100,100,200,300,300 and Lat 10,10,20,0,30,
/// interleaved with attitude records and closed by a trailing ATT line
pub fn scenario_log(lats: [f64; 5]) -> String {
    let mut log = HEADER.to_string();
    log.push_str(&att_line(4000));
    log.push_str(&gps_line(100, lats[0], 5000));
    log.push_str(&att_line(5100));
    log.push_str(&gps_line(100, lats[1], 5000));
    log.push_str(&att_line(5200));
    log.push_str(&gps_line(200, lats[2], 5200));
    log.push_str(&att_line(5300));
    log.push_str(&gps_line(300, lats[3], 5300));
    log.push_str(&gps_line(300, lats[4], 5400));
    log.push_str(&att_line(5500));
    log.push_str(&att_line(5600));
    log
}

pub fn write_log(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture log");
    path
}
