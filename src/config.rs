use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

const ENV_PREFIX: &str = "HURDAT";

/// Run configuration, layered as defaults, then an optional TOML file, then
/// `HURDAT_*` environment variables, then command-line overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_year_range"))]
pub struct PipelineConfig {
    /// Output root directory
    pub root: PathBuf,

    #[validate(range(min = 1851, max = 2100))]
    pub start_year: i32,

    #[validate(range(min = 1851, max = 2100))]
    pub end_year: i32,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(custom(function = "validate_compression"))]
    pub compression: String,

    #[validate(range(min = 1))]
    pub row_group_size: usize,

    pub use_mmap: bool,
}

/// Values supplied on the command line; `None` leaves the layered value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub max_workers: Option<usize>,
    pub compression: Option<String>,
    pub use_mmap: Option<bool>,
}

impl PipelineConfig {
    pub fn load(config_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("root", ".")?
            .set_default("start_year", DEFAULT_START_YEAR as i64)?
            .set_default("end_year", DEFAULT_END_YEAR as i64)?
            .set_default("max_workers", num_cpus::get() as i64)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("row_group_size", DEFAULT_ROW_GROUP_SIZE as i64)?
            .set_default("use_mmap", false)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let mut config: PipelineConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if let Some(year) = overrides.start_year {
            self.start_year = year;
        }
        if let Some(year) = overrides.end_year {
            self.end_year = year;
        }
        if let Some(workers) = overrides.max_workers {
            self.max_workers = workers;
        }
        if let Some(compression) = overrides.compression {
            self.compression = compression;
        }
        if let Some(use_mmap) = overrides.use_mmap {
            self.use_mmap = use_mmap;
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            max_workers: num_cpus::get(),
            compression: COMPRESSION_SNAPPY.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            use_mmap: false,
        }
    }
}

fn validate_year_range(config: &PipelineConfig) -> std::result::Result<(), ValidationError> {
    if config.start_year > config.end_year {
        return Err(ValidationError::new("start_year_after_end_year"));
    }
    Ok(())
}

fn validate_compression(compression: &str) -> std::result::Result<(), ValidationError> {
    match compression.to_lowercase().as_str() {
        COMPRESSION_SNAPPY | COMPRESSION_GZIP | COMPRESSION_LZ4 | COMPRESSION_ZSTD
        | COMPRESSION_NONE => Ok(()),
        _ => Err(ValidationError::new("unsupported_compression")),
    }
}

/// Final artifact locations under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub observations: PathBuf,
    pub storm_months: PathBuf,
    pub run_report: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            observations: root.join(OBSERVATIONS_FILE),
            storm_months: root.join(STORM_MONTHS_FILE),
            run_report: root.join(RUN_REPORT_FILE),
        }
    }

    /// Create the root directory if needed
    pub fn prepare(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            ProcessingError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create output root {}: {}", root.display(), e),
            ))
        })?;
        Ok(Self::new(root))
    }

    pub fn artifacts(&self) -> [&Path; 3] {
        [&self.observations, &self.storm_months, &self.run_report]
    }
}
