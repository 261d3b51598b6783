use crate::error::Result;
use crate::models::AuditLogEntry;
use crate::utils::constants::{AUDIT_COLUMNS_RENAMED, AUDIT_COLUMNS_SAME_NAME};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const ISO_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Append-only CSV audit trail, flushed after every entry
pub struct AuditLog {
    writer: csv::Writer<File>,
    path: PathBuf,
    with_new_name: bool,
    entries: usize,
}

impl AuditLog {
    /// Create the log and write its header.
    ///
    /// `with_new_name` selects the five column layout; without it the
    /// `new_name` column is left out.
    pub fn create(path: &Path, with_new_name: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        if with_new_name {
            writer.write_record(AUDIT_COLUMNS_RENAMED)?;
        } else {
            writer.write_record(AUDIT_COLUMNS_SAME_NAME)?;
        }
        writer.flush()?;

        debug!("Audit log opened at {}", path.display());
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            with_new_name,
            entries: 0,
        })
    }

    pub fn append(&mut self, entry: &AuditLogEntry) -> Result<()> {
        let timestamp = entry.timestamp.format(ISO_TIMESTAMP).to_string();
        if self.with_new_name {
            self.writer.write_record([
                timestamp.as_str(),
                entry.original_name.as_str(),
                entry.new_name.as_deref().unwrap_or_default(),
                entry.success_label(),
                entry.message.as_str(),
            ])?;
        } else {
            self.writer.write_record([
                timestamp.as_str(),
                entry.original_name.as_str(),
                entry.success_label(),
                entry.message.as_str(),
            ])?;
        }
        self.writer.flush()?;
        self.entries += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> usize {
        self.entries
    }
}
