use crate::error::Result;
use crate::models::{Catalog, InvalidPhoto, PhotoPoint};
use crate::utils::constants::{INVALID_PHOTO_COLUMNS, POINT_COLUMNS};
use std::path::Path;
use tracing::info;

/// Writes catalogs and point tables as UTF-8 CSV
pub struct CatalogWriter;

impl CatalogWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write every record in the catalog's own column order
    pub fn write_catalog(&self, catalog: &Catalog, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&catalog.headers)?;
        for record in &catalog.records {
            writer.write_record(record.to_cells(&catalog.headers))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", catalog.len(), path.display());
        Ok(())
    }

    pub fn write_points(&self, points: &[PhotoPoint], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(POINT_COLUMNS)?;
        for point in points {
            writer.write_record(point.to_cells())?;
        }
        writer.flush()?;

        info!("Wrote {} points to {}", points.len(), path.display());
        Ok(())
    }

    pub fn write_invalid_photos(&self, photos: &[InvalidPhoto], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(INVALID_PHOTO_COLUMNS)?;
        for photo in photos {
            writer.write_record(photo.to_cells())?;
        }
        writer.flush()?;

        info!("Wrote {} invalid photos to {}", photos.len(), path.display());
        Ok(())
    }
}

impl Default for CatalogWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoCoordinate, PhotoRecord};
    use crate::readers::CatalogReader;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_survives_write_and_read() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.csv");

        let mut catalog = Catalog::new(vec![
            "Original_File_Name".to_string(),
            "Notes".to_string(),
        ]);
        let mut record = PhotoRecord::new("IMG_1.jpg");
        record.extra.insert("Notes".to_string(), "ridge, east side".to_string());
        record.set_coordinate(&GeoCoordinate::new(45.5, -73.6)?);
        catalog.records.push(record);

        CatalogWriter::new().write_catalog(&catalog, &path)?;
        let reread = CatalogReader::new().read_catalog(&path)?;

        assert_eq!(reread.headers, catalog.headers);
        assert_eq!(reread.records, catalog.records);
        Ok(())
    }

    #[test]
    fn test_points_table() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("points.csv");
        let points = vec![PhotoPoint {
            folder_id: "Unit4".to_string(),
            path: PathBuf::from("Unit4/a.jpg"),
            name: "a.jpg".to_string(),
            coordinate: Some(GeoCoordinate::new(45.5, -73.6)?),
            date_time: None,
            direction: Some(270.0),
        }];

        CatalogWriter::new().write_points(&points, &path)?;

        let text = std::fs::read_to_string(&path)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("FolderID,Path,Name,X,Y,DateTime,Direction"));
        assert_eq!(lines.next(), Some("Unit4,Unit4/a.jpg,a.jpg,-73.6,45.5,,270"));
        Ok(())
    }
}
