pub mod artifacts;
pub mod parquet_writer;
pub mod staging;

pub use artifacts::{write_run_report, ArtifactWriter};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter, TableKind};
pub use staging::StagingArea;
