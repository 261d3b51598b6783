pub mod block;
pub mod jpeg;

pub use block::ImageMetadataBlock;
