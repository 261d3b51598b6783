use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::utils::constants::{
    AUDIT_LOG_PREFIX, COMPLETED_CATALOG_PREFIX, FILE_TIMESTAMP_FORMAT, INVALID_PHOTOS_PREFIX,
    POINTS_PREFIX, RENAMED_EXTENSION, UNREFERENCED_CATALOG_PREFIX,
};

/// Output file names sharing one run timestamp
#[derive(Debug, Clone)]
pub struct RunFileNames {
    stamp: String,
}

impl RunFileNames {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            stamp: now.format(FILE_TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn now() -> Self {
        Self::new(Local::now())
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    fn stamped(&self, dir: &Path, prefix: &str) -> PathBuf {
        dir.join(format!("{}_{}.csv", prefix, self.stamp))
    }

    /// `Database_import_EXIF_completed_{ts}.csv`
    pub fn completed_catalog(&self, dir: &Path) -> PathBuf {
        self.stamped(dir, COMPLETED_CATALOG_PREFIX)
    }

    /// `Consider_Include_{ts}.csv`
    pub fn unreferenced_catalog(&self, dir: &Path) -> PathBuf {
        self.stamped(dir, UNREFERENCED_CATALOG_PREFIX)
    }

    /// `logger_{ts}.csv`
    pub fn audit_log(&self, dir: &Path) -> PathBuf {
        self.stamped(dir, AUDIT_LOG_PREFIX)
    }

    pub fn points(&self, dir: &Path) -> PathBuf {
        self.stamped(dir, POINTS_PREFIX)
    }

    pub fn invalid_photos(&self, dir: &Path) -> PathBuf {
        self.stamped(dir, INVALID_PHOTOS_PREFIX)
    }
}

/// Append `.jpg` unless the name already ends with it (any case)
pub fn ensure_jpg_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(RENAMED_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, RENAMED_EXTENSION)
    }
}

/// Whether a path carries one of the given extensions (compared lowercase, no dot)
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|allowed| allowed == &ext)
        })
        .unwrap_or(false)
}
