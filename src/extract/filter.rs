//! GPS sample filter

use crate::types::{FieldValue, GpsFix, MessageSnapshot, FIELD_LAT};

/// Pull a usable GPS fix out of a message snapshot
///
/// Returns `None` when the snapshot holds no `gps_type` message yet, or when its
/// latitude is zero, null or missing (the receiver has no fix). Declared fields
/// the message does not carry are filled with `Null`.
pub fn filter_gps_fix(
    snapshot: &MessageSnapshot,
    gps_type: &str,
    field_names: &[String],
) -> Option<GpsFix> {
    let gps = snapshot.get(gps_type)?;

    let latitude = gps.get(FIELD_LAT).and_then(FieldValue::as_f64)?;
    if latitude == 0.0 {
        return None;
    }

    let fields = field_names
        .iter()
        .map(|name| {
            let value = gps.get(name).cloned().unwrap_or(FieldValue::Null);
            (name.clone(), value)
        })
        .collect();

    Some(GpsFix::from_fields(fields))
}
