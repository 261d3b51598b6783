pub mod catalog_reader;
pub mod image_locator;

pub use catalog_reader::CatalogReader;
pub use image_locator::{Collision, ImageIndex, ImageLocator, IndexedImage, UnreferencedImage};
