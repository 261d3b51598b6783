use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::outcome::RowReport;

/// One line of the audit trail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Local>,
    pub original_name: String,
    pub new_name: Option<String>,
    pub success: bool,
    pub message: String,
}

impl AuditLogEntry {
    pub fn new(
        original_name: impl Into<String>,
        new_name: Option<String>,
        success: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            original_name: original_name.into(),
            new_name,
            success,
            message: message.into(),
        }
    }

    /// Entry for a finished row.
    ///
    /// `new_name` is passed once the file sits under that name, so it is
    /// recorded even when a later step of the row failed.
    pub fn from_report(original_name: &str, new_name: Option<&str>, report: &RowReport) -> Self {
        Self::new(
            original_name,
            new_name.map(str::to_string),
            report.outcome.is_success(),
            report.message.clone(),
        )
    }

    /// Spelled `True`/`False` so existing log consumers keep parsing it
    pub fn success_label(&self) -> &'static str {
        if self.success {
            "True"
        } else {
            "False"
        }
    }
}
