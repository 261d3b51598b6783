use crate::models::Outcome;
use serde::Serialize;

/// A row that ended in a hard error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub file_name: String,
    pub reason: String,
}

/// Per-outcome counters for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub operation: String,
    pub total_rows: usize,
    pub filled: usize,
    pub skipped_present: usize,
    pub skipped_missing_source: usize,
    pub skipped_invalid_coordinate: usize,
    pub errors: usize,
    pub unreferenced_images: usize,
    pub name_collisions: usize,
    pub failures: Vec<RowFailure>,
}

impl RunSummary {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, file_name: &str, outcome: &Outcome) {
        self.total_rows += 1;
        match outcome {
            Outcome::Filled => self.filled += 1,
            Outcome::SkippedPresent => self.skipped_present += 1,
            Outcome::SkippedMissingSource => self.skipped_missing_source += 1,
            Outcome::SkippedInvalidCoordinate => self.skipped_invalid_coordinate += 1,
            Outcome::Error(reason) => {
                self.errors += 1;
                self.failures.push(RowFailure {
                    file_name: file_name.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    pub fn succeeded(&self) -> usize {
        self.total_rows - self.skipped_missing_source - self.errors
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("=== {} Summary ===\n", self.operation));
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Filled: {} ({:.1}%)\n",
            self.filled,
            percent(self.filled, self.total_rows)
        ));
        summary.push_str(&format!("Already Present: {}\n", self.skipped_present));
        summary.push_str(&format!("Missing Source: {}\n", self.skipped_missing_source));
        summary.push_str(&format!(
            "Invalid Coordinates: {}\n",
            self.skipped_invalid_coordinate
        ));
        summary.push_str(&format!("Errors: {}\n", self.errors));

        if self.unreferenced_images > 0 {
            summary.push_str(&format!(
                "Images Not In Catalog: {}\n",
                self.unreferenced_images
            ));
        }
        if self.name_collisions > 0 {
            summary.push_str(&format!("Name Collisions: {}\n", self.name_collisions));
        }

        if !self.failures.is_empty() {
            summary.push_str("\nTop 10 Errors:\n");
            for (i, failure) in self.failures.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    failure.file_name,
                    failure.reason
                ));
            }
        }

        summary
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
