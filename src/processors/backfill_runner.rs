use crate::error::{ProcessingError, Result};
use crate::metadata::ImageMetadataBlock;
use crate::models::{AuditLogEntry, Catalog, PhotoRecord};
use crate::processors::reconciler::backfill_from_image;
use crate::processors::RunSummary;
use crate::readers::ImageIndex;
use crate::utils::progress::ProgressReporter;
use crate::writers::AuditLog;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Fills empty catalog coordinates from the GPS tags of the indexed images
pub struct BackfillRunner {
    max_workers: usize,
}

impl BackfillRunner {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Backfill every row in catalog order, one audit entry per row
    pub fn run(
        &self,
        catalog: &mut Catalog,
        index: &ImageIndex,
        log: &mut AuditLog,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::new("Extract");
        summary.name_collisions = index.collisions().len();

        if let Some(p) = progress {
            p.set_message("Reading embedded GPS...");
        }

        let targets: Vec<(usize, PathBuf)> = catalog
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.has_coordinates())
            .filter_map(|(row, record)| {
                index
                    .resolve(&record.original_file_name)
                    .map(|path| (row, path.to_path_buf()))
            })
            .collect();
        debug!("{} rows need GPS from their image", targets.len());

        let mut prefetched: HashMap<usize, Result<ImageMetadataBlock>> = self
            .read_blocks(&targets)?
            .into_iter()
            .collect();

        if let Some(p) = progress {
            p.set_message("Backfilling coordinates...");
        }

        for (row, record) in catalog.records.iter_mut().enumerate() {
            let image = prefetched.remove(&row);
            let report = backfill_from_image(record, image.as_ref());
            debug!("{}: {} ({})", record.original_file_name, report.outcome, report.message);

            summary.record(&record.original_file_name, &report.outcome);
            log.append(&AuditLogEntry::from_report(
                &record.original_file_name,
                None,
                &report,
            ))?;

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            "Backfill complete: {} filled, {} already present, {} without source",
            summary.filled, summary.skipped_present, summary.skipped_missing_source
        );
        Ok(summary)
    }

    /// Catalog of indexed images no row refers to, coordinates filled when the image has them
    pub fn unreferenced_catalog(&self, catalog: &Catalog, index: &ImageIndex) -> Result<Catalog> {
        let unreferenced = index.unreferenced(&catalog.file_names());
        info!("{} images are not in the catalog", unreferenced.len());

        let targets: Vec<(usize, PathBuf)> = unreferenced
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, entry.image.path.clone()))
            .collect();
        let mut blocks: HashMap<usize, Result<ImageMetadataBlock>> =
            self.read_blocks(&targets)?.into_iter().collect();

        let mut missing = catalog.empty_like();
        for (i, entry) in unreferenced.into_iter().enumerate() {
            let mut record = PhotoRecord::new(entry.name.as_str());
            record.origin = Some(entry.image.relative_folder());

            match blocks.remove(&i).map(|block| block.and_then(|b| b.gps_coordinate())) {
                Some(Ok(Some(coordinate))) => record.set_coordinate(&coordinate),
                Some(Ok(None)) | None => {}
                Some(Err(e)) => debug!("No usable GPS in {}: {}", entry.image.path.display(), e),
            }

            missing.records.push(record);
        }

        Ok(missing)
    }

    /// Read metadata for each target on a bounded pool; results keep input order
    fn read_blocks(
        &self,
        targets: &[(usize, PathBuf)],
    ) -> Result<Vec<(usize, Result<ImageMetadataBlock>)>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(format!("Failed to start worker pool: {}", e)))?;

        Ok(pool.install(|| {
            targets
                .par_iter()
                .map(|(row, path)| {
                    let block = ImageMetadataBlock::load(path);
                    if let Err(e) = &block {
                        warn!("Cannot read metadata from {}: {}", path.display(), e);
                    }
                    (*row, block)
                })
                .collect()
        }))
    }
}

impl Default for BackfillRunner {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
