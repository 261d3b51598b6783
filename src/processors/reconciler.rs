//! Keeps catalog coordinates and embedded GPS tags consistent without ever
//! overwriting GPS data that is already there.

use crate::error::{ProcessingError, Result};
use crate::metadata::ImageMetadataBlock;
use crate::models::{Outcome, PhotoRecord, RowReport};

/// Fill a row's empty coordinates from the image's GPS group.
///
/// `image` is `None` when the row's file could not be found, and an `Err`
/// when its metadata could not be read. Neither is an error for the row:
/// there is simply no data to backfill from.
pub fn backfill_from_image(
    record: &mut PhotoRecord,
    image: Option<&Result<ImageMetadataBlock>>,
) -> RowReport {
    if record.has_coordinates() {
        return RowReport::new(Outcome::SkippedPresent, "Coordinates already present");
    }

    let block = match image {
        None => {
            return RowReport::new(
                Outcome::SkippedMissingSource,
                format!("Image not found: {}", record.original_file_name),
            )
        }
        Some(Err(e)) => {
            return RowReport::new(
                Outcome::SkippedMissingSource,
                format!("No readable metadata: {}", e),
            )
        }
        Some(Ok(block)) => block,
    };

    match block.gps_coordinate() {
        Ok(Some(coordinate)) => {
            record.set_coordinate(&coordinate);
            RowReport::new(Outcome::Filled, format!("Filled from EXIF ({})", coordinate))
        }
        Ok(None) => RowReport::new(Outcome::SkippedMissingSource, "No embedded GPS"),
        Err(ProcessingError::MetadataRead(reason)) => RowReport::new(
            Outcome::SkippedMissingSource,
            format!("Unreadable GPS tags: {}", reason),
        ),
        Err(e) => RowReport::new(Outcome::SkippedInvalidCoordinate, e.to_string()),
    }
}

/// Merge a row's coordinates into an image's GPS group.
///
/// Only the in-memory block changes; the caller persists it when the
/// outcome is [`Outcome::Filled`].
pub fn write_to_image(record: &PhotoRecord, block: &mut ImageMetadataBlock) -> RowReport {
    if block.has_gps_latitude() {
        return RowReport::new(Outcome::SkippedPresent, "GPS already present, skipped");
    }

    match record.coordinate() {
        Ok(coordinate) => {
            block.set_gps(&coordinate);
            RowReport::new(Outcome::Filled, "GPS inserted")
        }
        Err(e) => RowReport::new(
            Outcome::SkippedInvalidCoordinate,
            format!("Skipped GPS ({})", e),
        ),
    }
}
