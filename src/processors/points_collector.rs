use crate::error::{ProcessingError, Result};
use crate::metadata::ImageMetadataBlock;
use crate::models::{InvalidPhoto, PhotoPoint};
use crate::readers::{ImageLocator, IndexedImage};
use crate::utils::progress::ProgressReporter;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which photos become points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IncludeOption {
    /// Only photos with decodable GPS
    #[default]
    OnlyGeotagged,
    /// Every photo; untagged ones get empty X/Y
    All,
}

#[derive(Debug, Default)]
pub struct PointsResult {
    pub points: Vec<PhotoPoint>,
    pub invalid: Vec<InvalidPhoto>,
}

/// Turns the photos under one or more folders into point rows
pub struct PointsCollector {
    locator: ImageLocator,
    include: IncludeOption,
}

impl PointsCollector {
    pub fn new(locator: ImageLocator) -> Self {
        Self {
            locator,
            include: IncludeOption::default(),
        }
    }

    pub fn with_include(mut self, include: IncludeOption) -> Self {
        self.include = include;
        self
    }

    /// Collect points folder by folder, in the order given
    pub fn collect(
        &self,
        folders: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<PointsResult> {
        let mut result = PointsResult::default();

        for folder in folders {
            if !folder.is_dir() {
                return Err(ProcessingError::MissingSource(folder.clone()));
            }
            let folder_id = folder_id(folder);
            let images = self.locator.walk(folder);
            info!("{} photos in folder {}", images.len(), folder_id);

            if let Some(p) = progress {
                p.set_message(&format!("Reading {}...", folder_id));
            }

            for image in images {
                self.collect_image(&folder_id, &image, &mut result);
                if let Some(p) = progress {
                    p.increment(1);
                }
            }
        }

        info!(
            "Collected {} points, {} invalid photos",
            result.points.len(),
            result.invalid.len()
        );
        Ok(result)
    }

    fn collect_image(&self, folder_id: &str, image: &IndexedImage, result: &mut PointsResult) {
        let name = image
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let block = match ImageMetadataBlock::load(&image.path) {
            Ok(block) => Some(block),
            Err(e) => {
                debug!("Unreadable metadata in {}: {}", image.path.display(), e);
                result.invalid.push(InvalidPhoto {
                    path: image.path.clone(),
                    name: name.clone(),
                    reason: e.to_string(),
                });
                None
            }
        };

        let coordinate = match block.as_ref().map(ImageMetadataBlock::gps_coordinate) {
            Some(Ok(Some(coordinate))) => Some(coordinate),
            Some(Ok(None)) => {
                result.invalid.push(InvalidPhoto {
                    path: image.path.clone(),
                    name: name.clone(),
                    reason: "No GPS coordinates".to_string(),
                });
                None
            }
            Some(Err(e)) => {
                result.invalid.push(InvalidPhoto {
                    path: image.path.clone(),
                    name: name.clone(),
                    reason: e.to_string(),
                });
                None
            }
            None => None,
        };

        if coordinate.is_none() && self.include == IncludeOption::OnlyGeotagged {
            return;
        }

        result.points.push(PhotoPoint {
            folder_id: folder_id.to_string(),
            path: image.path.clone(),
            name,
            coordinate,
            date_time: block.as_ref().and_then(ImageMetadataBlock::date_time_original),
            direction: block.as_ref().and_then(ImageMetadataBlock::gps_direction),
        });
    }
}

/// Basename of the folder, or the path itself for roots like `/`
fn folder_id(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}
