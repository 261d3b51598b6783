pub mod backfill_runner;
pub mod file_ops;
pub mod insert_runner;
pub mod points_collector;
pub mod reconciler;
pub mod run_summary;

pub use backfill_runner::BackfillRunner;
pub use file_ops::{copy_to, rename_in_place};
pub use insert_runner::{InsertMode, InsertRunner};
pub use points_collector::{IncludeOption, PointsCollector, PointsResult};
pub use reconciler::{backfill_from_image, write_to_image};
pub use run_summary::{RowFailure, RunSummary};
