use std::collections::{HashMap, HashSet};

use crate::error::{ProcessingError, Result};
use crate::models::geo::GeoCoordinate;
use crate::utils::constants::*;
use crate::utils::coordinates::parse_coordinate;
use crate::utils::filename::ensure_jpg_extension;

/// One catalog row.
///
/// Coordinates are kept as the raw cell text so rows that are not touched
/// are written back exactly as they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoRecord {
    pub unique_id: Option<String>,
    pub origin: Option<String>,
    pub original_file_name: String,
    pub new_file_name: Option<String>,
    pub x_coord: Option<String>,
    pub y_coord: Option<String>,
    /// Passthrough columns keyed by header name
    pub extra: HashMap<String, String>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Six decimals, trailing zeros dropped; finer than the DMS seconds precision
fn format_degrees(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

impl PhotoRecord {
    pub fn new(original_file_name: impl Into<String>) -> Self {
        Self {
            original_file_name: original_file_name.into(),
            ..Self::default()
        }
    }

    /// Build a record from one CSV row aligned with `headers`
    pub fn from_cells(headers: &[String], cells: &[String]) -> Self {
        let mut record = Self::default();

        for (header, cell) in headers.iter().zip(cells.iter()) {
            match header.as_str() {
                COL_UNIQUE_ID => record.unique_id = non_empty(cell),
                COL_ORIGIN => record.origin = non_empty(cell),
                COL_ORIGINAL_FILE_NAME => record.original_file_name = cell.trim().to_string(),
                COL_NEW_FILE_NAME => record.new_file_name = non_empty(cell),
                COL_X_COORD => record.x_coord = non_empty(cell),
                COL_Y_COORD => record.y_coord = non_empty(cell),
                other => {
                    record.extra.insert(other.to_string(), cell.clone());
                }
            }
        }

        record
    }

    /// Cells in `headers` order; unknown headers come out empty
    pub fn to_cells(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| self.value(header).unwrap_or_default().to_string())
            .collect()
    }

    pub fn value(&self, column: &str) -> Option<&str> {
        match column {
            COL_UNIQUE_ID => self.unique_id.as_deref(),
            COL_ORIGIN => self.origin.as_deref(),
            COL_ORIGINAL_FILE_NAME => Some(self.original_file_name.as_str()),
            COL_NEW_FILE_NAME => self.new_file_name.as_deref(),
            COL_X_COORD => self.x_coord.as_deref(),
            COL_Y_COORD => self.y_coord.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Lowercased file name used for every filename comparison
    pub fn lookup_key(&self) -> String {
        self.original_file_name.to_lowercase()
    }

    /// True when both coordinate cells hold something
    pub fn has_coordinates(&self) -> bool {
        self.x_coord.is_some() && self.y_coord.is_some()
    }

    /// Parse and validate the row's coordinate pair
    pub fn coordinate(&self) -> Result<GeoCoordinate> {
        let (x, y) = match (&self.x_coord, &self.y_coord) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(ProcessingError::InvalidCoordinate(format!(
                    "Missing coordinates: lat='{}', lon='{}'",
                    self.y_coord.as_deref().unwrap_or_default(),
                    self.x_coord.as_deref().unwrap_or_default()
                )))
            }
        };

        let longitude = parse_coordinate(x)?;
        let latitude = parse_coordinate(y)?;
        GeoCoordinate::new(latitude, longitude)
    }

    /// X takes the longitude, Y the latitude
    pub fn set_coordinate(&mut self, coordinate: &GeoCoordinate) {
        self.x_coord = Some(format_degrees(coordinate.longitude));
        self.y_coord = Some(format_degrees(coordinate.latitude));
    }

    /// Name the photo should carry after a rename or renamed copy
    pub fn target_file_name(&self) -> String {
        match &self.new_file_name {
            Some(name) => ensure_jpg_extension(name.trim()),
            None => self.original_file_name.clone(),
        }
    }
}

/// The full record set with its column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub headers: Vec<String>,
    pub records: Vec<PhotoRecord>,
}

impl Catalog {
    pub fn new(headers: Vec<String>) -> Self {
        let mut catalog = Self {
            headers,
            records: Vec::new(),
        };
        catalog.ensure_required_columns();
        catalog
    }

    /// Append any required column the input did not carry
    pub fn ensure_required_columns(&mut self) -> Vec<&'static str> {
        let mut added = Vec::new();
        for column in REQUIRED_COLUMNS {
            if !self.headers.iter().any(|h| h == column) {
                self.headers.push(column.to_string());
                added.push(column);
            }
        }
        added
    }

    /// An empty catalog sharing this catalog's columns
    pub fn empty_like(&self) -> Self {
        Self {
            headers: self.headers.clone(),
            records: Vec::new(),
        }
    }

    /// Lowercased file names of every record
    pub fn file_names(&self) -> HashSet<String> {
        self.records.iter().map(PhotoRecord::lookup_key).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
