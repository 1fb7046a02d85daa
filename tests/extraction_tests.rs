//! End-to-end extraction tests over DataFlash text logs
//!
//! Covers:
//! - De-duplication and zero-latitude exclusion on a real log layout
//! - Missing files, binary framing and logs without a GPS channel
//! - Local time labelling with and without a matching timezone
//! - Partial tracks when a line fails to decode

mod common;

use common::*;
use std::path::Path;
use telemetry_geo::{
    extract_track, Extraction, FieldValue, GeoError, NoTimezone, Region, RegionTable, Termination,
};
use tempfile::TempDir;

fn sydney_table() -> RegionTable {
    RegionTable::new(
        vec![Region {
            tz: chrono_tz::Australia::Sydney,
            min_lat: -38.0,
            max_lat: -33.0,
            min_lng: 147.0,
            max_lng: 151.0,
        }],
        None,
    )
}

fn time_ms(result: &telemetry_geo::ExtractionResult) -> Vec<i64> {
    result
        .samples
        .iter()
        .map(|fix| fix.get("TimeMS").and_then(FieldValue::as_i64).unwrap())
        .collect()
}

#[test]
fn test_scenario_dedup_and_zero_latitude() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_log(&temp_dir, "10.log", &scenario_log([10.0, 10.0, 20.0, 0.0, 30.0]));

    let result = extract_track(&path, &NoTimezone)
        .expect("extraction should succeed")
        .into_result()
        .expect("track should not be empty");

    assert_eq!(time_ms(&result), vec![100, 200, 300]);
    let lats: Vec<f64> = result.samples.iter().filter_map(|f| f.latitude()).collect();
    assert_eq!(lats, vec![10.0, 20.0, 30.0]);
    assert_eq!(
        result.fieldnames,
        "Status,TimeMS,Week,NSats,HDop,Lat,Lng,RelAlt,Alt,Spd,GCrs,VZ,T"
    );
    // The trailing ATT line reaches 100% and ends the read
    assert_eq!(result.termination, Termination::ProgressThreshold);
}

#[test]
fn test_every_admitted_fix_has_nonzero_latitude() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_log(&temp_dir, "zeros.log", &scenario_log([0.0, 0.0, 20.0, 0.0, 0.0]));

    let result = extract_track(&path, &NoTimezone)
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(time_ms(&result), vec![200]);
    assert!(result.samples.iter().all(|f| f.latitude() != Some(0.0)));
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("missing.log");

    let result = extract_track(&path, &NoTimezone);
    match result {
        Err(GeoError::SourceUnavailable(p)) => assert_eq!(p, path),
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[test]
fn test_binary_log_needs_a_binary_decoder() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("10.bin");
    std::fs::write(&path, [0xA3u8, 0x95, 0x80]).unwrap();

    let result = extract_track(&path, &NoTimezone);
    assert!(matches!(result, Err(GeoError::UnsupportedFraming(_))));
}

#[test]
fn test_log_without_gps_channel() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let content = "\
FMT, 128, 89, FMT, BBnNZ, Type,Length,Name,Format,Columns
FMT, 131, 31, ATT, IccccCC, TimeMS,DesRoll,Roll,DesPitch,Pitch,DesYaw,Yaw
ATT, 4000, 0.0, 0.1, 0.0, -0.2, 90.0, 90.1
";
    let path = write_log(&temp_dir, "nogps.log", content);

    assert!(matches!(
        extract_track(&path, &NoTimezone),
        Err(GeoError::NoGpsChannel)
    ));
}

#[test]
fn test_gps_declared_but_never_logged() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut content = HEADER.to_string();
    for ms in (4000..4100).step_by(10) {
        content.push_str(&att_line(ms));
    }
    let path = write_log(&temp_dir, "bench.log", &content);

    match extract_track(&path, &NoTimezone).unwrap() {
        Extraction::NoGpsData {
            messages_read,
            termination,
        } => {
            assert!(messages_read > 0);
            assert_eq!(termination, Termination::ProgressThreshold);
        }
        Extraction::Completed(result) => panic!("unexpected track: {:?}", result.samples),
    }
}

#[test]
fn test_local_time_label_from_first_fix() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let lats = [-35.3632621, -35.3632621, -35.3633, 0.0, -35.3634];
    let path = write_log(&temp_dir, "canberra.log", &scenario_log(lats));

    let result = extract_track(&path, &sydney_table())
        .unwrap()
        .into_result()
        .unwrap();

    // GPS week 2200 + 100 ms, 5.0 s after boot; the log starts at boot
    // => 2022-03-05T23:59:37Z, 10:59:37 AEDT
    assert_eq!(
        result.local_time.as_deref(),
        Some("Local Date: 03/06/2022, Local Time: 10:59:37")
    );
    let boot = telemetry_geo::gps_time_to_unix(2200, 100) - 5.0;
    assert_eq!(result.start_timestamp, boot);
    // last stamped message is the ATT at 5.6 s
    assert!((result.duration_seconds() - 5.6).abs() < 1e-5);
    assert_eq!(
        result.display_name("canberra.log"),
        "canberra.log: Local Date: 03/06/2022, Local Time: 10:59:37"
    );
}

#[test]
fn test_unknown_timezone_keeps_full_track() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_log(&temp_dir, "10.log", &scenario_log([10.0, 10.0, 20.0, 0.0, 30.0]));

    let result = extract_track(&path, &sydney_table())
        .unwrap()
        .into_result()
        .unwrap();

    assert!(result.local_time.is_none());
    assert_eq!(result.samples.len(), 3);
    assert!(result.start_timestamp > 0.0);
}

#[test]
fn test_decode_error_returns_partial_track() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut content = HEADER.to_string();
    content.push_str(&gps_line(100, -35.1, 5000));
    content.push_str(&att_line(5100));
    content.push_str(&gps_line(200, -35.2, 5200));
    content.push_str("GPS, 3, 300\n");
    content.push_str(&gps_line(400, -35.4, 5400));
    content.push_str(&att_line(5500));
    let path = write_log(&temp_dir, "truncated.log", &content);

    let result = extract_track(&path, &NoTimezone)
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(time_ms(&result), vec![100, 200]);
    match &result.termination {
        Termination::SourceError(reason) => assert!(reason.contains("line 7")),
        other => panic!("expected SourceError, got {:?}", other),
    }
}

#[test]
fn test_uppercase_extension_reads_as_text() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_log(&temp_dir, "00000042.LOG", &scenario_log([10.0, 10.0, 20.0, 0.0, 30.0]));

    let extraction = extract_track(Path::new(&path), &NoTimezone).unwrap();
    assert!(matches!(extraction, Extraction::Completed(_)));
}

#[test]
fn test_no_gps_week_time_gives_no_label() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let content = "\
FMT, 128, 89, FMT, BBnNZ, Type,Length,Name,Format,Columns
FMT, 130, 29, GPS, QLLe, TimeUS,Lat,Lng,Alt
GPS, 5000000, -35.3632621, 149.1652374, 584.2
GPS, 5200000, -35.3633, 149.1652374, 584.4
GPS, 5400000, -35.3634, 149.1652374, 584.6
GPS, 5600000, -35.3635, 149.1652374, 584.8
";
    let path = write_log(&temp_dir, "noweek.log", content);
    let always_utc = |_: f64, _: f64| Some(chrono_tz::UTC);

    let result = extract_track(&path, &always_utc)
        .unwrap()
        .into_result()
        .unwrap();

    // The closing line reaches 100% and is not examined
    assert_eq!(result.samples.len(), 3);
    assert_eq!(result.start_timestamp, 0.0);
    assert!(!result.time_span().is_known());
    assert!(result.local_time.is_none());
    let fields: Vec<&str> = result.field_names().collect();
    assert_eq!(fields, vec!["TimeUS", "Lat", "Lng", "Alt"]);
}

#[test]
fn test_decode_error_before_any_fix_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut content = HEADER.to_string();
    content.push_str(&att_line(4000));
    content.push_str("FMT, 150, 3, PARM,\n");
    content.push_str(&gps_line(100, -35.1, 5000));
    content.push_str(&att_line(5100));
    let path = write_log(&temp_dir, "badfmt.log", &content);

    match extract_track(&path, &NoTimezone).unwrap() {
        Extraction::NoGpsData {
            termination: Termination::SourceError(reason),
            ..
        } => assert!(reason.contains("line 5"), "unexpected reason: {reason}"),
        other => panic!("expected NoGpsData with a source error, got {:?}", other),
    }
}
