pub mod audit;
pub mod geo;
pub mod outcome;
pub mod photo_point;
pub mod photo_record;

pub use audit::AuditLogEntry;
pub use geo::{Axis, Dms, GeoCoordinate, Hemisphere};
pub use outcome::{Outcome, RowReport};
pub use photo_point::{InvalidPhoto, PhotoPoint};
pub use photo_record::{Catalog, PhotoRecord};
