use crate::error::{ProcessingError, Result};
use crate::models::geo::{Axis, Dms, Hemisphere};
use crate::utils::constants::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON, SECONDS_DENOMINATOR};

/// Convert decimal degrees to the EXIF rational DMS form.
///
/// The sign is dropped; the hemisphere is derived from it and stored next to
/// the magnitude. Degrees and minutes are truncated, seconds are scaled by
/// [`SECONDS_DENOMINATOR`] and rounded, so a round trip through
/// [`dms_to_decimal`] is lossy but bounded by `1 / (3600 * 100)` degree.
///
/// The caller must reject NaN before calling this.
///
/// # Examples
/// ```
/// use geophoto_processor::models::{Axis, Hemisphere};
/// use geophoto_processor::utils::decimal_to_dms;
///
/// let dms = decimal_to_dms(-73.5, Axis::Longitude);
/// assert_eq!(dms.hemisphere, Hemisphere::West);
/// assert_eq!(dms.degrees, (73, 1));
/// assert_eq!(dms.minutes, (30, 1));
/// assert_eq!(dms.seconds, (0, 100));
/// ```
pub fn decimal_to_dms(decimal: f64, axis: Axis) -> Dms {
    let hemisphere = Hemisphere::for_value(axis, decimal);
    let abs_decimal = decimal.abs();

    let degrees = abs_decimal.trunc();
    let minutes_decimal = (abs_decimal - degrees) * 60.0;
    let minutes = minutes_decimal.trunc();
    let seconds = (minutes_decimal - minutes) * 60.0;
    let seconds_num = (seconds * SECONDS_DENOMINATOR as f64).round();

    Dms {
        degrees: (degrees as u32, 1),
        minutes: (minutes as u32, 1),
        seconds: (seconds_num as u32, SECONDS_DENOMINATOR),
        hemisphere,
    }
}

/// Convert EXIF rational DMS back to signed decimal degrees
pub fn dms_to_decimal(dms: &Dms) -> Result<f64> {
    let degrees = rational_to_f64(dms.degrees, "degrees")?;
    let minutes = rational_to_f64(dms.minutes, "minutes")?;
    let seconds = rational_to_f64(dms.seconds, "seconds")?;

    let decimal_value = degrees + minutes / 60.0 + seconds / 3600.0;

    if dms.hemisphere.is_negative() {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

fn rational_to_f64((num, denom): (u32, u32), part: &str) -> Result<f64> {
    if denom == 0 {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Zero denominator in {} rational {}/{}",
            part, num, denom
        )));
    }
    Ok(num as f64 / denom as f64)
}

/// Parse a colon separated `DD:MM:SS` string into signed decimal degrees
pub fn dms_str_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').collect();

    if parts.len() != 3 {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    let is_negative = dms.trim_start().starts_with('-');

    let degrees = parts[0].trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid degrees value: '{}'", parts[0]))
    })?;

    let minutes = parts[1].trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid minutes value: '{}'", parts[1]))
    })?;

    let seconds = parts[2].trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid seconds value: '{}'", parts[2]))
    })?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse a catalog cell that might hold decimal degrees or `DD:MM:SS`
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    let value = if !trimmed.contains(':') {
        trimmed.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })?
    } else {
        dms_str_to_decimal(trimmed)?
    };

    if value.is_nan() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Coordinate is NaN: '{}'",
            coord_str
        )));
    }

    Ok(value)
}

/// Validate that a latitude/longitude pair is finite and on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Non-finite coordinate: lat='{}', lon='{}'",
            latitude, longitude
        )));
    }

    if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [{}, {}]",
            latitude, MIN_LAT, MAX_LAT
        )));
    }

    if !(MIN_LON..=MAX_LON).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [{}, {}]",
            longitude, MIN_LON, MAX_LON
        )));
    }

    Ok(())
}
