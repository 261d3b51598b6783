use geophoto_processor::metadata::ImageMetadataBlock;
use geophoto_processor::models::{GeoCoordinate, Outcome};
use geophoto_processor::processors::{BackfillRunner, InsertMode, InsertRunner};
use geophoto_processor::readers::{CatalogReader, ImageLocator};
use geophoto_processor::writers::{AuditLog, CatalogWriter};
use geophoto_processor::Result;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::BufReader;
use std::path::Path;
use tempfile::TempDir;

/// Minimal baseline JPEG: SOI, JFIF APP0, DQT, SOS, a few data bytes, EOI
fn bare_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
        0x01, 0x00, 0x00,
    ]);
    data.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x05, 0x00, 0x10, 0x20]);
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn write_geotagged(path: &Path, latitude: f64, longitude: f64) -> Result<()> {
    fs::write(path, bare_jpeg())?;
    let mut block = ImageMetadataBlock::empty();
    block.set_gps(&GeoCoordinate::new(latitude, longitude)?);
    block.save_into(path)
}

fn gps_ref(path: &Path, tag: exif::Tag) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let exif = exif::Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .first()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string()),
        _ => None,
    }
}

#[test]
fn test_backfill_fills_empty_row_from_image() -> Result<()> {
    let images = TempDir::new()?;
    let out = TempDir::new()?;
    write_geotagged(&images.path().join("IMG_0001.JPG"), 45.5, -73.6)?;

    let catalog_path = out.path().join("catalog.csv");
    fs::write(
        &catalog_path,
        "Unique_ID,Origin,Original_File_Name,New_File_Name,X_coord,Y_coord\n\
         1,,img_0001.jpg,Unit4,,\n",
    )?;

    let mut catalog = CatalogReader::new().read_catalog(&catalog_path)?;
    let index = ImageLocator::new(vec!["jpg".to_string()])
        .build_index(&[images.path().to_path_buf()])?;
    let mut log = AuditLog::create(&out.path().join("logger.csv"), false)?;

    let summary = BackfillRunner::new(2).run(&mut catalog, &index, &mut log, None)?;

    assert_eq!(summary.filled, 1);
    assert_eq!(catalog.records[0].x_coord.as_deref(), Some("-73.6"));
    assert_eq!(catalog.records[0].y_coord.as_deref(), Some("45.5"));

    let completed = out.path().join("completed.csv");
    CatalogWriter::new().write_catalog(&catalog, &completed)?;
    let text = fs::read_to_string(&completed)?;
    assert_eq!(
        text.lines().nth(1),
        Some("1,,img_0001.jpg,Unit4,-73.6,45.5")
    );
    Ok(())
}

#[test]
fn test_backfill_keeps_populated_row() -> Result<()> {
    let images = TempDir::new()?;
    let out = TempDir::new()?;
    write_geotagged(&images.path().join("a.jpg"), 45.5, -73.6)?;

    let catalog_path = out.path().join("catalog.csv");
    fs::write(
        &catalog_path,
        "Original_File_Name,X_coord,Y_coord\na.jpg,-120.1,38.2\n",
    )?;
    let mut catalog = CatalogReader::new().read_catalog(&catalog_path)?;
    let index = ImageLocator::new(vec!["jpg".to_string()])
        .build_index(&[images.path().to_path_buf()])?;
    let mut log = AuditLog::create(&out.path().join("logger.csv"), false)?;

    let summary = BackfillRunner::new(1).run(&mut catalog, &index, &mut log, None)?;

    assert_eq!(summary.skipped_present, 1);
    assert_eq!(catalog.records[0].x_coord.as_deref(), Some("-120.1"));
    assert_eq!(catalog.records[0].y_coord.as_deref(), Some("38.2"));
    Ok(())
}

#[test]
fn test_insert_writes_hemisphere_refs_and_is_idempotent() -> Result<()> {
    let work = TempDir::new()?;
    let photo = work.path().join("IMG_0002.JPG");
    fs::write(&photo, bare_jpeg())?;

    let catalog_path = work.path().join("catalog.csv");
    fs::write(
        &catalog_path,
        "Original_File_Name,X_coord,Y_coord\nIMG_0002.JPG,-73.6,45.5\n",
    )?;
    let catalog = CatalogReader::new().read_catalog(&catalog_path)?;
    let runner = InsertRunner::new(InsertMode::Rename, work.path());

    let (first, _) = runner.process_record(&catalog.records[0]);
    assert_eq!(first.outcome, Outcome::Filled);
    assert_eq!(gps_ref(&photo, exif::Tag::GPSLatitudeRef).as_deref(), Some("N"));
    assert_eq!(gps_ref(&photo, exif::Tag::GPSLongitudeRef).as_deref(), Some("W"));

    let coordinate = ImageMetadataBlock::load(&photo)?.gps_coordinate()?.unwrap();
    assert!((coordinate.latitude - 45.5).abs() < 1e-5);
    assert!((coordinate.longitude - -73.6).abs() < 1e-5);

    let tagged = fs::read(&photo)?;
    let (second, _) = runner.process_record(&catalog.records[0]);
    assert_eq!(second.outcome, Outcome::SkippedPresent);
    assert_eq!(fs::read(&photo)?, tagged);
    Ok(())
}

#[test]
fn test_missing_source_writes_one_log_entry() -> Result<()> {
    let images = TempDir::new()?;
    let work = TempDir::new()?;
    let untouched = images.path().join("other.jpg");
    fs::write(&untouched, bare_jpeg())?;

    let catalog_path = work.path().join("catalog.csv");
    fs::write(
        &catalog_path,
        "Original_File_Name,New_File_Name,X_coord,Y_coord\nmissing.jpg,Unit9,-73.6,45.5\n",
    )?;
    let catalog = CatalogReader::new().read_catalog(&catalog_path)?;
    let index = ImageLocator::new(vec!["jpg".to_string()])
        .build_index(&[images.path().to_path_buf()])?;

    let log_path = work.path().join("logger.csv");
    let mut log = AuditLog::create(&log_path, true)?;
    let summary = InsertRunner::new(InsertMode::Copy, work.path())
        .with_index(index)
        .run(&catalog, &mut log, None)?;

    assert_eq!(summary.skipped_missing_source, 1);
    assert_eq!(log.entries(), 1);
    assert_eq!(fs::read(&untouched)?, bare_jpeg());
    assert!(!work.path().join("Unit9.jpg").exists());

    let text = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",missing.jpg,,False,Source missing: missing.jpg"));
    Ok(())
}

#[test]
fn test_unreferenced_images_are_listed() -> Result<()> {
    let images = TempDir::new()?;
    for name in ["A.jpg", "b.JPG", "C.jpeg"] {
        fs::write(images.path().join(name), bare_jpeg())?;
    }

    let catalog_path = images.path().join("catalog.csv");
    fs::write(&catalog_path, "Original_File_Name\na.JPG\nB.jpg\n")?;
    let catalog = CatalogReader::new().read_catalog(&catalog_path)?;
    let index = ImageLocator::new(vec!["jpg".to_string(), "jpeg".to_string()])
        .build_index(&[images.path().to_path_buf()])?;

    let missing = BackfillRunner::new(1).unreferenced_catalog(&catalog, &index)?;

    let names: Vec<&str> = missing
        .records
        .iter()
        .map(|r| r.original_file_name.as_str())
        .collect();
    assert_eq!(names, vec!["c.jpeg"]);
    assert_eq!(missing.records[0].origin.as_deref(), Some("."));
    Ok(())
}
