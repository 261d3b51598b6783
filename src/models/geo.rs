use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::coordinates::{decimal_to_dms, validate_coordinates};

/// Which angular component a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Hemisphere reference stored next to an unsigned EXIF DMS magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// `N`/`E` for non-negative values, `S`/`W` for negative ones
    pub fn for_value(axis: Axis, value: f64) -> Self {
        match (axis, value < 0.0) {
            (Axis::Latitude, false) => Hemisphere::North,
            (Axis::Latitude, true) => Hemisphere::South,
            (Axis::Longitude, false) => Hemisphere::East,
            (Axis::Longitude, true) => Hemisphere::West,
        }
    }

    /// Parse an EXIF reference value such as `b"S"` or `b"W\0"`.
    ///
    /// A missing or unrecognised reference falls back to the positive
    /// hemisphere of the axis.
    pub fn from_ref(axis: Axis, reference: Option<&[u8]>) -> Self {
        let code = reference
            .and_then(|r| r.iter().find(|b| !b.is_ascii_whitespace() && **b != 0))
            .map(|b| b.to_ascii_uppercase());

        match (axis, code) {
            (Axis::Latitude, Some(b'S')) => Hemisphere::South,
            (Axis::Latitude, _) => Hemisphere::North,
            (Axis::Longitude, Some(b'W')) => Hemisphere::West,
            (Axis::Longitude, _) => Hemisphere::East,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Degrees, minutes and seconds as EXIF `(numerator, denominator)` rationals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub degrees: (u32, u32),
    pub minutes: (u32, u32),
    pub seconds: (u32, u32),
    pub hemisphere: Hemisphere,
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoCoordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting NaN, infinities and off-globe values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate().map_err(ProcessingError::from)?;
        Ok(coordinate)
    }

    pub fn latitude_dms(&self) -> Dms {
        decimal_to_dms(self.latitude, Axis::Latitude)
    }

    pub fn longitude_dms(&self) -> Dms {
        decimal_to_dms(self.longitude, Axis::Longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={}, lon={}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hemisphere_from_ref() {
        assert_eq!(
            Hemisphere::from_ref(Axis::Latitude, Some(&b"S"[..])),
            Hemisphere::South
        );
        assert_eq!(
            Hemisphere::from_ref(Axis::Longitude, Some(&b"w\0"[..])),
            Hemisphere::West
        );
        assert_eq!(Hemisphere::from_ref(Axis::Latitude, None), Hemisphere::North);
        assert_eq!(
            Hemisphere::from_ref(Axis::Longitude, Some(&b""[..])),
            Hemisphere::East
        );
    }

    #[test]
    fn test_geo_coordinate_validation() {
        assert!(GeoCoordinate::new(45.5, -73.6).is_ok());
        assert!(GeoCoordinate::new(91.0, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, 181.0).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_dms_for_coordinate() {
        let coordinate = GeoCoordinate::new(45.5, -73.6).unwrap();
        assert_eq!(coordinate.latitude_dms().hemisphere, Hemisphere::North);
        assert_eq!(coordinate.longitude_dms().hemisphere, Hemisphere::West);
        assert_eq!(coordinate.longitude_dms().degrees, (73, 1));
    }
}
