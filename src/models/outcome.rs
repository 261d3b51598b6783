use serde::Serialize;
use std::fmt;

/// Result classification for one catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Filled,
    SkippedPresent,
    SkippedMissingSource,
    SkippedInvalidCoordinate,
    Error(String),
}

impl Outcome {
    /// Whether the row counts as successful in the audit log.
    ///
    /// Skips are successes: the photo was handled and nothing was lost.
    /// Only a missing source or a hard failure is reported as unsuccessful.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::SkippedMissingSource | Outcome::Error(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Filled => "filled",
            Outcome::SkippedPresent => "skipped-present",
            Outcome::SkippedMissingSource => "skipped-missing-source",
            Outcome::SkippedInvalidCoordinate => "skipped-invalid-coordinate",
            Outcome::Error(_) => "error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Error(reason) => write!(f, "error({})", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// An outcome with the human readable message that goes into the audit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub outcome: Outcome,
    pub message: String,
}

impl RowReport {
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            message: reason.clone(),
            outcome: Outcome::Error(reason),
        }
    }

    /// Prefix the message with an earlier step, e.g. `Copied; GPS inserted`
    pub fn after(mut self, step: &str) -> Self {
        self.message = format!("{}; {}", step, self.message);
        self
    }
}
