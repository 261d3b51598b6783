use crate::error::Result;
use crate::metadata::ImageMetadataBlock;
use crate::models::{AuditLogEntry, Catalog, Outcome, PhotoRecord, RowReport};
use crate::processors::file_ops::{copy_to, rename_in_place};
use crate::processors::reconciler::write_to_image;
use crate::processors::RunSummary;
use crate::readers::ImageIndex;
use crate::utils::progress::ProgressReporter;
use crate::writers::AuditLog;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// How each catalogued photo reaches the work folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InsertMode {
    /// Copy `Origin/Original_File_Name` to `New_File_Name` in the work folder
    #[default]
    Copy,
    /// Copy into the work folder under the original name
    CopyKeepName,
    /// Rename files already in the work folder to `New_File_Name`
    Rename,
}

impl InsertMode {
    /// Whether the audit log carries the `new_name` column
    pub fn records_new_name(&self) -> bool {
        !matches!(self, InsertMode::CopyKeepName)
    }

    fn step(&self) -> &'static str {
        match self {
            InsertMode::Copy | InsertMode::CopyKeepName => "Copied",
            InsertMode::Rename => "Renamed",
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Copy => write!(f, "copy"),
            InsertMode::CopyKeepName => write!(f, "copy-keep-name"),
            InsertMode::Rename => write!(f, "rename"),
        }
    }
}

/// Places each catalogued photo in the work folder and writes its catalog
/// coordinates into the GPS group when the image has none yet
pub struct InsertRunner {
    mode: InsertMode,
    work_dir: PathBuf,
    index: Option<ImageIndex>,
}

impl InsertRunner {
    pub fn new(mode: InsertMode, work_dir: &Path) -> Self {
        Self {
            mode,
            work_dir: work_dir.to_path_buf(),
            index: None,
        }
    }

    /// Locate sources by name when a row has no `Origin`
    pub fn with_index(mut self, index: ImageIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Process every row in catalog order, one audit entry per row.
    ///
    /// Only a failure to write the audit log itself stops the run.
    pub fn run(
        &self,
        catalog: &Catalog,
        log: &mut AuditLog,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::new("Insert");
        if let Some(index) = &self.index {
            summary.name_collisions = index.collisions().len();
        }

        info!(
            "Inserting GPS for {} rows ({} mode) into {}",
            catalog.len(),
            self.mode,
            self.work_dir.display()
        );

        for record in &catalog.records {
            let (report, new_name) = self.process_record(record);
            debug!("{}: {} ({})", record.original_file_name, report.outcome, report.message);

            summary.record(&record.original_file_name, &report.outcome);
            log.append(&AuditLogEntry::from_report(
                &record.original_file_name,
                new_name.as_deref().filter(|_| self.mode.records_new_name()),
                &report,
            ))?;

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            "Insert complete: {} GPS written, {} already tagged, {} missing, {} errors",
            summary.filled, summary.skipped_present, summary.skipped_missing_source, summary.errors
        );
        Ok(summary)
    }

    /// Handle one row; never fails, every problem lands in the report.
    ///
    /// The name is returned once the file sits in the work folder under it,
    /// whatever the GPS step then reports.
    pub fn process_record(&self, record: &PhotoRecord) -> (RowReport, Option<String>) {
        let source = match self.resolve_source(record) {
            Some(path) if path.is_file() => path,
            Some(path) => {
                warn!("Source missing: {}", path.display());
                return (
                    RowReport::new(
                        Outcome::SkippedMissingSource,
                        format!("Source missing: {}", path.display()),
                    ),
                    None,
                );
            }
            None => {
                warn!("Source missing: {}", record.original_file_name);
                return (
                    RowReport::new(
                        Outcome::SkippedMissingSource,
                        format!("Source missing: {}", record.original_file_name),
                    ),
                    None,
                );
            }
        };

        let target_name = match self.mode {
            InsertMode::Copy | InsertMode::Rename => record.target_file_name(),
            InsertMode::CopyKeepName => record.original_file_name.clone(),
        };

        let placed = match self.mode {
            InsertMode::Copy | InsertMode::CopyKeepName => {
                copy_to(&source, &self.work_dir, &target_name)
            }
            InsertMode::Rename => rename_in_place(&source, &target_name),
        };
        let target = match placed {
            Ok(path) => path,
            Err(e) => {
                error!("{}", e);
                return (RowReport::error(e.to_string()), None);
            }
        };

        let report = insert_gps(record, &target).after(self.mode.step());
        (report, Some(target_name))
    }

    fn resolve_source(&self, record: &PhotoRecord) -> Option<PathBuf> {
        let name = record.original_file_name.as_str();
        match self.mode {
            InsertMode::Rename => Some(self.work_dir.join(name)),
            InsertMode::Copy | InsertMode::CopyKeepName => match &record.origin {
                Some(origin) => Some(Path::new(origin.trim()).join(name)),
                None => self
                    .index
                    .as_ref()
                    .and_then(|index| index.resolve(name))
                    .map(Path::to_path_buf),
            },
        }
    }
}

/// Merge the row's coordinates into the image at `target` and persist them
fn insert_gps(record: &PhotoRecord, target: &Path) -> RowReport {
    let mut block = match ImageMetadataBlock::load(target) {
        Ok(block) => block,
        Err(e) => {
            warn!(
                "Unreadable metadata in {}, treating as untagged: {}",
                target.display(),
                e
            );
            ImageMetadataBlock::empty()
        }
    };

    let report = write_to_image(record, &mut block);
    if report.outcome != Outcome::Filled {
        return report;
    }

    match block.save_into(target) {
        Ok(()) => report,
        Err(e) => {
            error!("GPS write failed for {}: {}", target.display(), e);
            RowReport::error(e.to_string())
        }
    }
}
