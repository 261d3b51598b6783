pub mod audit_log;
pub mod catalog_writer;

pub use audit_log::AuditLog;
pub use catalog_writer::CatalogWriter;
