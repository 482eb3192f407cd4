use crate::config::OutputLayout;
use crate::error::Result;
use crate::processors::{PipelineOutput, RunReport};
use crate::utils::constants::{OBSERVATIONS_FILE, RUN_REPORT_FILE, STORM_MONTHS_FILE};
use crate::writers::{ParquetWriter, StagingArea};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the two panels and the run report as one unit
pub struct ArtifactWriter {
    parquet: ParquetWriter,
}

impl ArtifactWriter {
    pub fn new(parquet: ParquetWriter) -> Self {
        Self { parquet }
    }

    /// Stage every artifact, then move them under the layout root together.
    ///
    /// A failure part-way leaves previous outputs under the root untouched.
    pub fn write_all(&self, output: &PipelineOutput, layout: &OutputLayout) -> Result<Vec<PathBuf>> {
        let mut staging = StagingArea::new(&layout.root)?;

        self.parquet
            .write_observations(&output.observations, &staging.stage(OBSERVATIONS_FILE))?;
        self.parquet
            .write_storm_months(&output.storm_months, &staging.stage(STORM_MONTHS_FILE))?;
        write_run_report(&output.report, &staging.stage(RUN_REPORT_FILE))?;

        let committed = staging.commit()?;
        info!(
            "Wrote {} artifacts to {}",
            committed.len(),
            layout.root.display()
        );
        Ok(committed)
    }
}

pub fn write_run_report(report: &RunReport, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
