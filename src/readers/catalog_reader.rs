use crate::error::{ProcessingError, Result};
use crate::models::{Catalog, PhotoRecord};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct CatalogReader {
    encoding: &'static Encoding,
}

impl CatalogReader {
    pub fn new() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Reader for a WHATWG encoding label such as `utf-8` or `latin1`
    pub fn with_encoding(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ProcessingError::Config(format!("Unknown catalog encoding: '{}'", label))
        })?;
        Ok(Self { encoding })
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Read the catalog at `path`, synthesising any missing required column
    pub fn read_catalog(&self, path: &Path) -> Result<Catalog> {
        let bytes = fs::read(path)?;
        let catalog = self.parse_catalog(&bytes)?;
        info!(
            "Loaded {} catalog rows from {} ({})",
            catalog.len(),
            path.display(),
            self.encoding_name()
        );
        Ok(catalog)
    }

    /// Parse raw catalog bytes in this reader's encoding
    pub fn parse_catalog(&self, bytes: &[u8]) -> Result<Catalog> {
        let (text, used, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                "Catalog contains bytes that are not valid {}; they were replaced",
                used.name()
            );
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut catalog = Catalog {
            headers,
            records: Vec::new(),
        };

        for added in catalog.ensure_required_columns() {
            debug!("Catalog has no '{}' column; added as empty", added);
        }

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();

            if cells.iter().all(|c| c.trim().is_empty()) {
                debug!("Skipping blank catalog row {}", row + 2);
                continue;
            }
            cells.resize(catalog.headers.len(), String::new());

            catalog
                .records
                .push(PhotoRecord::from_cells(&catalog.headers, &cells));
        }

        Ok(catalog)
    }
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_catalog_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "Unique_ID,Origin,Original_File_Name,New_File_Name,X_coord,Y_coord,Crew"
        )?;
        writeln!(temp_file, "1,C:/Photos/A,IMG_0001.JPG,Unit4_N,-73.6,45.5,B")?;
        writeln!(temp_file, "2,C:/Photos/A,IMG_0002.JPG,,,,B")?;
        writeln!(temp_file, ",,,,,,")?;

        let catalog = CatalogReader::new().read_catalog(temp_file.path())?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.headers.len(), 7);
        assert_eq!(catalog.records[0].x_coord.as_deref(), Some("-73.6"));
        assert_eq!(catalog.records[0].value("Crew"), Some("B"));
        assert!(!catalog.records[1].has_coordinates());
        assert_eq!(catalog.records[1].new_file_name, None);

        Ok(())
    }

    #[test]
    fn test_missing_columns_are_synthesised() -> Result<()> {
        let catalog = CatalogReader::new().parse_catalog(b"Original_File_Name\nIMG_9.jpg\n")?;

        assert_eq!(catalog.len(), 1);
        assert!(catalog.headers.iter().any(|h| h == "X_coord"));
        assert!(catalog.headers.iter().any(|h| h == "Y_coord"));
        assert_eq!(catalog.records[0].x_coord, None);

        Ok(())
    }

    #[test]
    fn test_latin1_catalog() -> Result<()> {
        // "Lac Édouard" in ISO-8859-1
        let bytes = b"Original_File_Name,Site\nIMG_1.jpg,Lac \xC9douard\n";
        let catalog = CatalogReader::with_encoding("latin1")?.parse_catalog(bytes)?;

        assert_eq!(catalog.records[0].value("Site"), Some("Lac \u{c9}douard"));
        Ok(())
    }

    #[test]
    fn test_short_rows_are_padded() -> Result<()> {
        let catalog = CatalogReader::new()
            .parse_catalog(b"Original_File_Name,X_coord,Y_coord,Notes\nIMG_1.jpg,-120.5\n")?;

        assert_eq!(catalog.records[0].x_coord.as_deref(), Some("-120.5"));
        assert_eq!(catalog.records[0].y_coord, None);
        assert_eq!(catalog.records[0].value("Notes"), Some(""));
        Ok(())
    }

    #[test]
    fn test_unknown_encoding() {
        assert!(CatalogReader::with_encoding("klingon").is_err());
    }
}
