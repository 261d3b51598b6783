use crate::processors::{IncludeOption, InsertMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geophoto-processor")]
#[command(about = "Batch processor for geotagged photo catalogs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors, hide progress bars"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: geophoto.toml when present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill empty catalog coordinates from embedded GPS and list images missing from the catalog
    Extract {
        #[arg(short, long, help = "Input catalog CSV")]
        catalog: PathBuf,

        #[arg(
            short = 'r',
            long = "images-root",
            required = true,
            help = "Directory tree to search for images (repeatable)"
        )]
        images_roots: Vec<PathBuf>,

        #[arg(short, long, help = "Directory for the run's output files")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Catalog text encoding, e.g. utf-8 or latin1")]
        encoding: Option<String>,

        #[arg(long, help = "Worker threads for reading image metadata")]
        max_workers: Option<usize>,

        #[arg(long, help = "Also write the run summary as JSON")]
        summary_json: Option<PathBuf>,
    },

    /// Place catalogued photos in a work folder and write catalog coordinates into their GPS tags
    Insert {
        #[arg(short, long, help = "Input catalog CSV")]
        catalog: PathBuf,

        #[arg(short, long, help = "Work folder receiving the photos")]
        work_dir: PathBuf,

        #[arg(short, long, value_enum, default_value_t = InsertMode::Copy)]
        mode: InsertMode,

        #[arg(
            short = 'r',
            long = "images-root",
            help = "Directory tree to search for rows without Origin (repeatable)"
        )]
        images_roots: Vec<PathBuf>,

        #[arg(short, long, help = "Directory for the audit log [default: work folder]")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Catalog text encoding, e.g. utf-8 or latin1")]
        encoding: Option<String>,

        #[arg(long, help = "Also write the run summary as JSON")]
        summary_json: Option<PathBuf>,
    },

    /// Export one point row per photo across several folders
    Points {
        #[arg(
            short,
            long = "folder",
            required = true,
            help = "Photo folder; its name becomes the FolderID (repeatable)"
        )]
        folders: Vec<PathBuf>,

        #[arg(short, long, help = "Directory for the points and invalid-photos tables")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = IncludeOption::OnlyGeotagged)]
        include: IncludeOption,
    },
}
