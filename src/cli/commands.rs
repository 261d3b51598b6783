use crate::cli::args::{Cli, Commands};
use crate::processors::{BackfillRunner, InsertRunner, PointsCollector, RunSummary};
use crate::readers::{CatalogReader, ImageLocator};
use crate::utils::progress::ProgressReporter;
use crate::utils::{RunFileNames, Settings};
use crate::writers::{AuditLog, CatalogWriter};
use anyhow::{anyhow, Context};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let silent = cli.quiet;

    match cli.command {
        Commands::Extract {
            catalog,
            images_roots,
            output_dir,
            encoding,
            max_workers,
            summary_json,
        } => {
            let settings = settings
                .with_encoding(encoding)?
                .with_output_dir(output_dir)
                .with_max_workers(max_workers);
            let names = RunFileNames::now();
            prepare_dir(&settings.output_dir)?;

            println!("Extracting GPS into catalog...");
            println!("Catalog: {}", catalog.display());
            println!("Output directory: {}", settings.output_dir.display());
            println!("Workers: {}", settings.max_workers);

            let mut records = CatalogReader::with_encoding(&settings.encoding)?
                .read_catalog(&catalog)
                .with_context(|| format!("Cannot read catalog {}", catalog.display()))?;

            let spinner = ProgressReporter::spinner("Indexing images...", silent);
            let index = ImageLocator::new(settings.image_extensions.clone())
                .build_index(&images_roots)
                .context("Cannot index images")?;
            spinner.finish_with_message(&format!("Indexed {} images", index.len()));

            let mut log = AuditLog::create(&names.audit_log(&settings.output_dir), false)?;
            let progress = ProgressReporter::rows(records.len() as u64, "Backfilling...", silent);

            let runner = BackfillRunner::new(settings.max_workers);
            let mut summary = runner.run(&mut records, &index, &mut log, Some(&progress))?;
            progress.finish_with_message("Backfill complete");

            let unreferenced = runner.unreferenced_catalog(&records, &index)?;
            summary.unreferenced_images = unreferenced.len();

            let writer = CatalogWriter::new();
            writer.write_catalog(&records, &names.completed_catalog(&settings.output_dir))?;
            writer.write_catalog(&unreferenced, &names.unreferenced_catalog(&settings.output_dir))?;

            finish(&summary, log.path(), summary_json.as_deref())?;
        }

        Commands::Insert {
            catalog,
            work_dir,
            mode,
            images_roots,
            output_dir,
            encoding,
            summary_json,
        } => {
            let settings = settings.with_encoding(encoding)?;
            let log_dir = output_dir.unwrap_or_else(|| work_dir.clone());
            prepare_dir(&work_dir)?;
            prepare_dir(&log_dir)?;

            println!("Inserting catalog coordinates into photos...");
            println!("Catalog: {}", catalog.display());
            println!("Work folder: {} ({} mode)", work_dir.display(), mode);

            let records = CatalogReader::with_encoding(&settings.encoding)?
                .read_catalog(&catalog)
                .with_context(|| format!("Cannot read catalog {}", catalog.display()))?;

            let mut runner = InsertRunner::new(mode, &work_dir);
            if !images_roots.is_empty() {
                let index = ImageLocator::new(settings.image_extensions.clone())
                    .build_index(&images_roots)
                    .context("Cannot index images")?;
                runner = runner.with_index(index);
            }

            let names = RunFileNames::now();
            let mut log = AuditLog::create(&names.audit_log(&log_dir), mode.records_new_name())?;
            let progress = ProgressReporter::rows(records.len() as u64, "Inserting GPS...", silent);

            let summary = runner.run(&records, &mut log, Some(&progress))?;
            progress.finish_with_message("Insert complete");

            finish(&summary, log.path(), summary_json.as_deref())?;
        }

        Commands::Points {
            folders,
            output_dir,
            include,
        } => {
            let settings = settings.with_output_dir(output_dir);
            let names = RunFileNames::now();
            prepare_dir(&settings.output_dir)?;

            println!("Collecting photo points from {} folders...", folders.len());

            let progress = ProgressReporter::spinner("Reading photos...", silent);
            let result = PointsCollector::new(ImageLocator::new(settings.image_extensions.clone()))
                .with_include(include)
                .collect(&folders, Some(&progress))?;
            progress.finish_with_message(&format!("Read {} folders", folders.len()));

            let writer = CatalogWriter::new();
            let points_path = names.points(&settings.output_dir);
            writer.write_points(&result.points, &points_path)?;
            writer.write_invalid_photos(&result.invalid, &names.invalid_photos(&settings.output_dir))?;

            println!(
                "\n{} points written to {} ({} photos without usable GPS)",
                result.points.len(),
                points_path.display(),
                result.invalid.len()
            );
        }
    }

    Ok(())
}

/// Route `tracing` output to stderr, or to `log_file` without colours.
///
/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn prepare_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Cannot create directory {}", dir.display()))
}

fn finish(summary: &RunSummary, log_path: &Path, summary_json: Option<&Path>) -> anyhow::Result<()> {
    println!("\n{}", summary.generate_summary());
    println!("Audit log: {}", log_path.display());

    if summary.errors > 0 {
        warn!("{} rows failed, see the audit log", summary.errors);
    }

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_insert() {
        let cli = Cli::parse_from([
            "geophoto-processor",
            "insert",
            "--catalog",
            "photos.csv",
            "--work-dir",
            "work",
            "--mode",
            "copy-keep-name",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Insert { mode, work_dir, images_roots, .. } => {
                assert_eq!(mode, crate::processors::InsertMode::CopyKeepName);
                assert_eq!(work_dir, PathBuf::from("work"));
                assert!(images_roots.is_empty());
            }
            _ => panic!("expected insert"),
        }
    }

    #[test]
    fn test_parse_points_requires_folder() {
        assert!(Cli::try_parse_from(["geophoto-processor", "points"]).is_err());

        let cli = Cli::try_parse_from([
            "geophoto-processor",
            "points",
            "-f",
            "Unit4",
            "-f",
            "Unit7",
            "--include",
            "all",
        ])
        .unwrap();
        match cli.command {
            Commands::Points { folders, include, .. } => {
                assert_eq!(folders.len(), 2);
                assert_eq!(include, crate::processors::IncludeOption::All);
            }
            _ => panic!("expected points"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from([
            "geophoto-processor",
            "-v",
            "-q",
            "points",
            "-f",
            "x"
        ])
        .is_err());
    }
}
