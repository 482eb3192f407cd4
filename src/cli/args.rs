use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hurdat-processor")]
#[command(about = "Build observation and storm-month panels from the HURDAT2 hurricane archive")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the archive and write both panels plus the run report
    Process {
        #[arg(short, long, help = "HURDAT2 archive text file")]
        input: PathBuf,

        #[arg(short, long, help = "Output root directory [default: .]")]
        root: Option<PathBuf>,

        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,

        #[arg(short, long, help = "snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, help = "First year kept [default: 1980]")]
        start_year: Option<i32>,

        #[arg(long, help = "Last year kept [default: 2022]")]
        end_year: Option<i32>,

        #[arg(long, help = "Memory-map the archive instead of buffered reads")]
        mmap: bool,
    },

    /// Run the full pipeline without writing anything
    Validate {
        #[arg(short, long, help = "HURDAT2 archive text file")]
        input: PathBuf,

        #[arg(long, help = "TOML configuration file")]
        config: Option<PathBuf>,

        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

impl Commands {
    /// Command-line values that take precedence over file and environment config
    pub fn config_overrides(&self) -> ConfigOverrides {
        match self {
            Commands::Process {
                root,
                compression,
                max_workers,
                start_year,
                end_year,
                mmap,
                ..
            } => ConfigOverrides {
                root: root.clone(),
                start_year: *start_year,
                end_year: *end_year,
                max_workers: *max_workers,
                compression: compression.clone(),
                use_mmap: mmap.then_some(true),
            },
            Commands::Validate { max_workers, .. } => ConfigOverrides {
                max_workers: *max_workers,
                ..Default::default()
            },
            Commands::Info { .. } => ConfigOverrides::default(),
        }
    }
}
