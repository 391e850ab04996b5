// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/metadata.rs
//
// Capture metadata (timestamp and GPS position) read from EXIF.

use crate::constant::{MINUTES_PER_DEGREE, SECONDS_PER_DEGREE};

/// Decimal-degree position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Best-effort capture metadata. Missing or unreadable fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    pub capture_timestamp: Option<String>,
    pub gps: Option<GpsCoordinate>,
}

/// Degrees/minutes/seconds to signed decimal degrees. `S` and `W` references
/// are negative.
pub fn dms_to_decimal(dms: [f64; 3], reference: Option<&str>) -> f64 {
    let value = dms[0] + dms[1] / MINUTES_PER_DEGREE + dms[2] / SECONDS_PER_DEGREE;
    match reference.map(str::trim) {
        Some("S" | "W" | "s" | "w") => -value,
        _ => value,
    }
}

/// Read capture metadata from encoded image bytes. Never fails.
#[cfg(feature = "exif")]
pub fn read_capture_metadata(bytes: &[u8]) -> CaptureMetadata {
    use exif::{In, Reader, Tag, Value};

    let exif = match Reader::new().read_from_container(&mut std::io::Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            log::warn!("No readable EXIF data: {e}");
            return CaptureMetadata::default();
        }
    };

    let ascii = |tag: Tag| -> Option<String> {
        match &exif.get_field(tag, In::PRIMARY)?.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    };
    let dms = |tag: Tag| -> Option<[f64; 3]> {
        match &exif.get_field(tag, In::PRIMARY)?.value {
            Value::Rational(parts) if parts.len() >= 3 => {
                Some([parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64()])
            }
            _ => None,
        }
    };

    let capture_timestamp = ascii(Tag::DateTimeOriginal).or_else(|| ascii(Tag::DateTimeDigitized));
    let gps = match (dms(Tag::GPSLatitude), dms(Tag::GPSLongitude)) {
        (Some(lat), Some(lng)) => Some(GpsCoordinate {
            lat: dms_to_decimal(lat, ascii(Tag::GPSLatitudeRef).as_deref()),
            lng: dms_to_decimal(lng, ascii(Tag::GPSLongitudeRef).as_deref()),
        }),
        _ => None,
    };

    CaptureMetadata {
        capture_timestamp,
        gps,
    }
}

#[cfg(not(feature = "exif"))]
pub fn read_capture_metadata(_bytes: &[u8]) -> CaptureMetadata {
    log::warn!("Built without EXIF support");
    CaptureMetadata::default()
}
