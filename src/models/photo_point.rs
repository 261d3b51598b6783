use serde::Serialize;
use std::path::PathBuf;

use crate::models::geo::GeoCoordinate;

/// One photo turned into a point row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoPoint {
    pub folder_id: String,
    pub path: PathBuf,
    pub name: String,
    pub coordinate: Option<GeoCoordinate>,
    pub date_time: Option<String>,
    pub direction: Option<f64>,
}

impl PhotoPoint {
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.folder_id.clone(),
            self.path.display().to_string(),
            self.name.clone(),
            self.coordinate
                .map(|c| c.longitude.to_string())
                .unwrap_or_default(),
            self.coordinate
                .map(|c| c.latitude.to_string())
                .unwrap_or_default(),
            self.date_time.clone().unwrap_or_default(),
            self.direction.map(|d| d.to_string()).unwrap_or_default(),
        ]
    }
}

/// A photo that could not be placed on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidPhoto {
    pub path: PathBuf,
    pub name: String,
    pub reason: String,
}

impl InvalidPhoto {
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.path.display().to_string(),
            self.name.clone(),
            self.reason.clone(),
        ]
    }
}
