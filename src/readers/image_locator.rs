use crate::error::{ProcessingError, Result};
use crate::utils::filename::has_image_extension;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

/// An image found on disk and the root it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub path: PathBuf,
    pub root: PathBuf,
}

impl IndexedImage {
    /// Containing folder relative to the root, `.` for the root itself
    pub fn relative_folder(&self) -> String {
        let folder = self.path.parent().unwrap_or(&self.root);
        match folder.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => folder.display().to_string(),
        }
    }
}

/// Two files with the same lowercase name; the later one replaced the earlier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub replaced: PathBuf,
    pub kept: PathBuf,
}

/// An image on disk that no catalog row refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreferencedImage {
    pub name: String,
    pub image: IndexedImage,
}

/// Lowercase file name to full path, built from one or more directory trees.
///
/// Names are not disambiguated by folder: when two files share a lowercase
/// name the one walked last wins and the clash is recorded in
/// [`collisions`](Self::collisions).
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    entries: HashMap<String, IndexedImage>,
    collisions: Vec<Collision>,
}

impl ImageIndex {
    pub fn insert(&mut self, name: String, image: IndexedImage) {
        if let Some(previous) = self.entries.get(&name) {
            warn!(
                "Duplicate image name '{}': {} replaces {}",
                name,
                image.path.display(),
                previous.path.display()
            );
            self.collisions.push(Collision {
                name: name.clone(),
                replaced: previous.path.clone(),
                kept: image.path.clone(),
            });
        }
        self.entries.insert(name, image);
    }

    /// Resolve a catalog file name, ignoring case
    pub fn resolve(&self, file_name: &str) -> Option<&Path> {
        self.entries
            .get(&file_name.trim().to_lowercase())
            .map(|image| image.path.as_path())
    }

    /// Images on disk whose lowercase name is not among `catalog_names`, sorted by name
    pub fn unreferenced(&self, catalog_names: &HashSet<String>) -> Vec<UnreferencedImage> {
        let mut missing: Vec<UnreferencedImage> = self
            .entries
            .iter()
            .filter(|(name, _)| !catalog_names.contains(*name))
            .map(|(name, image)| UnreferencedImage {
                name: name.clone(),
                image: image.clone(),
            })
            .collect();
        missing.sort_by(|a, b| a.name.cmp(&b.name));
        missing
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ImageLocator {
    extensions: Vec<String>,
}

impl ImageLocator {
    /// `extensions` are lowercase and without the leading dot
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Walk every root recursively and index the image files found
    pub fn build_index(&self, roots: &[PathBuf]) -> Result<ImageIndex> {
        let mut index = ImageIndex::default();

        for root in roots {
            if !root.is_dir() {
                return Err(ProcessingError::MissingSource(root.clone()));
            }
            info!("Indexing images under {}", root.display());
            debug!("Configured image extensions: {:?}", self.extensions);

            for image in self.walk(root) {
                if let Some(name) = image.path.file_name().and_then(|n| n.to_str()) {
                    index.insert(name.to_lowercase(), image);
                }
            }
        }

        info!(
            "Indexed {} images ({} name collisions)",
            index.len(),
            index.collisions().len()
        );
        Ok(index)
    }

    /// Image files under `root` in a stable order
    pub fn walk(&self, root: &Path) -> Vec<IndexedImage> {
        let mut images = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                trace!("Skipping non-file entry: {:?}", entry.path());
                continue;
            }

            if has_image_extension(entry.path(), &self.extensions) {
                images.push(IndexedImage {
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                });
            } else {
                trace!("Skipping file due to unsupported extension: {:?}", entry.path());
            }
        }

        images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn locator() -> ImageLocator {
        ImageLocator::new(vec!["jpg".to_string(), "jpeg".to_string()])
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_index_is_case_insensitive() -> Result<()> {
        let dir = TempDir::new()?;
        touch(&dir.path().join("Unit4/IMG_0001.JPG"));
        touch(&dir.path().join("Unit4/notes.txt"));
        touch(&dir.path().join("img_0002.jpeg"));

        let index = locator().build_index(&[dir.path().to_path_buf()])?;

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.resolve("img_0001.jpg"),
            Some(dir.path().join("Unit4/IMG_0001.JPG").as_path())
        );
        assert!(index.resolve("IMG_0002.JPEG").is_some());
        assert!(index.resolve("notes.txt").is_none());
        Ok(())
    }

    #[test]
    fn test_unreferenced_set_difference() -> Result<()> {
        let dir = TempDir::new()?;
        touch(&dir.path().join("A.jpg"));
        touch(&dir.path().join("b.JPG"));
        touch(&dir.path().join("Burn/C.jpg"));

        let index = locator().build_index(&[dir.path().to_path_buf()])?;
        let catalog: HashSet<String> = ["a.jpg", "b.jpg"].iter().map(|s| s.to_string()).collect();

        let unreferenced = index.unreferenced(&catalog);

        assert_eq!(unreferenced.len(), 1);
        assert_eq!(unreferenced[0].name, "c.jpg");
        assert_eq!(unreferenced[0].image.relative_folder(), "Burn");
        Ok(())
    }

    #[test]
    fn test_collisions_last_writer_wins() -> Result<()> {
        let first = TempDir::new()?;
        let second = TempDir::new()?;
        touch(&first.path().join("dup.jpg"));
        touch(&second.path().join("DUP.JPG"));

        let index =
            locator().build_index(&[first.path().to_path_buf(), second.path().to_path_buf()])?;

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.resolve("dup.jpg"),
            Some(second.path().join("DUP.JPG").as_path())
        );
        assert_eq!(index.collisions().len(), 1);
        assert_eq!(index.collisions()[0].replaced, first.path().join("dup.jpg"));
        Ok(())
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = locator().build_index(&[PathBuf::from("/nonexistent/photos")]);
        assert!(matches!(result, Err(ProcessingError::MissingSource(_))));
    }

    #[test]
    fn test_relative_folder_at_root() {
        let image = IndexedImage {
            path: PathBuf::from("/photos/a.jpg"),
            root: PathBuf::from("/photos"),
        };
        assert_eq!(image.relative_folder(), ".");
    }
}
