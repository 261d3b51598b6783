use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_IMAGE_EXTENSIONS, ENCODING_LATIN1, ENCODING_UTF8, ENV_PREFIX,
};

/// Run settings shared by every subcommand.
///
/// Layered as defaults, then the TOML file, then `GEOPHOTO_*` variables;
/// command line flags are applied on top by the CLI layer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub image_extensions: Vec<String>,
    pub encoding: String,
    pub output_dir: PathBuf,
    pub max_workers: usize,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("image_extensions", DEFAULT_IMAGE_EXTENSIONS.to_vec())?
            .set_default("encoding", ENCODING_UTF8)?
            .set_default("output_dir", ".")?
            .set_default("max_workers", num_cpus::get() as i64)?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("image_extensions"),
            )
            .build()?
            .try_deserialize()?;

        settings.normalised()
    }

    /// Lowercase extensions without dots, checked encoding and worker count
    pub fn normalised(mut self) -> Result<Self> {
        self.image_extensions = self
            .image_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if self.image_extensions.is_empty() {
            return Err(ProcessingError::Config(
                "At least one image extension is required".to_string(),
            ));
        }

        self.encoding = self.encoding.trim().to_lowercase();
        if !matches!(
            self.encoding.as_str(),
            ENCODING_UTF8 | "utf8" | ENCODING_LATIN1 | "iso-8859-1" | "windows-1252" | "cp1252"
        ) {
            return Err(ProcessingError::Config(format!(
                "Unsupported catalog encoding: {}",
                self.encoding
            )));
        }

        if self.max_workers == 0 {
            self.max_workers = 1;
        }

        Ok(self)
    }

    pub fn with_encoding(mut self, encoding: Option<String>) -> Result<Self> {
        if let Some(encoding) = encoding {
            self.encoding = encoding;
        }
        self.normalised()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        if let Some(workers) = max_workers {
            self.max_workers = workers.max(1);
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            encoding: ENCODING_UTF8.to_string(),
            output_dir: PathBuf::from("."),
            max_workers: num_cpus::get(),
        }
    }
}
