//! Encoded polyline codec.
//!
//! Implements the signed-varint polyline algorithm used by the directions
//! API: each coordinate is scaled by `10^precision`, delta-encoded against
//! the previous point, zig-zag folded, and emitted as 5-bit chunks offset
//! into the printable range starting at `?` (63).

use crate::error::{Error, Result};
use crate::types::LatLng;

/// Precision used by Google encoded polylines (five decimal places).
pub const GOOGLE_PRECISION: u32 = 5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;
const ASCII_OFFSET: u8 = 63;
/// Highest byte that can appear in an encoded polyline (`~`).
const ASCII_MAX: u8 = ASCII_OFFSET + 0x3f;
/// Scaled coordinates stay below 2^62 so any delta between two fits in i64.
const MAX_SCALED: f64 = (1u64 << 62) as f64;

/// Encode `points` at the given decimal `precision`.
///
/// Fails on non-finite coordinates and on values too large to scale.
pub fn encode_polyline(points: &[LatLng], precision: u32) -> Result<String> {
    let factor = scale(precision);
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut previous = (0i64, 0i64);

    for point in points {
        let lat = scale_degrees(point.lat, factor)?;
        let lng = scale_degrees(point.lng, factor)?;
        push_value(&mut encoded, lat - previous.0);
        push_value(&mut encoded, lng - previous.1);
        previous = (lat, lng);
    }

    Ok(encoded)
}

/// Decode an encoded polyline at the given decimal `precision`.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<LatLng>> {
    let factor = scale(precision);
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0;
    let mut current = (0i64, 0i64);

    while offset < bytes.len() {
        let (lat_delta, next) = read_value(bytes, offset)?;
        if next >= bytes.len() {
            return Err(Error::PolylineTruncated { offset: next });
        }
        let (lng_delta, next) = read_value(bytes, next)?;
        offset = next;

        current.0 = current
            .0
            .checked_add(lat_delta)
            .ok_or(Error::PolylineOverflow { offset })?;
        current.1 = current
            .1
            .checked_add(lng_delta)
            .ok_or(Error::PolylineOverflow { offset })?;
        points.push(LatLng::new(
            current.0 as f64 / factor,
            current.1 as f64 / factor,
        ));
    }

    Ok(points)
}

fn scale(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

fn scale_degrees(degrees: f64, factor: f64) -> Result<i64> {
    let scaled = (degrees * factor).round();
    if !scaled.is_finite() || scaled.abs() >= MAX_SCALED {
        return Err(Error::PolylineCoordinateOutOfRange { value: degrees });
    }
    Ok(scaled as i64)
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 {
        !((delta as u64) << 1)
    } else {
        (delta as u64) << 1
    };

    while value >= CONTINUATION {
        out.push(char::from(((CONTINUATION | (value & CHUNK_MASK)) as u8) + ASCII_OFFSET));
        value >>= CHUNK_BITS;
    }
    out.push(char::from(value as u8 + ASCII_OFFSET));
}

/// Read one zig-zag varint starting at `offset`; returns the value and the
/// offset just past it.
fn read_value(bytes: &[u8], mut offset: usize) -> Result<(i64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(Error::PolylineTruncated { offset });
        };
        if !(ASCII_OFFSET..=ASCII_MAX).contains(&byte) {
            return Err(Error::PolylineInvalidCharacter {
                character: char::from(byte),
                offset,
            });
        }
        if shift >= u64::BITS {
            return Err(Error::PolylineOverflow { offset });
        }

        let chunk = u64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        offset += 1;

        if chunk < CONTINUATION {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok((value, offset))
}
