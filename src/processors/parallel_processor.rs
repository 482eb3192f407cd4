use crate::error::{ProcessingError, Result};
use crate::models::{Observation, RawLine, StormMonth};
use crate::processors::{FieldDecoder, MetricsCalculator, MonthlyAggregator, RunReport};
use crate::readers::{ArchiveReader, BlockTagger, HeaderExtractor};
use crate::utils::constants::{DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

const STAGES: usize = 6;

/// Everything a successful run produces, held in memory until it is written
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub observations: Vec<Observation>,
    pub storm_months: Vec<StormMonth>,
    pub report: RunReport,
}

/// Runs the six pipeline stages, parallelising the per-line and per-group work
pub struct ParallelProcessor {
    max_workers: usize,
    start_year: i32,
    end_year: i32,
    use_mmap: bool,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            use_mmap: false,
        }
    }

    pub fn with_year_range(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read and process the archive at `path`
    pub fn process_archive(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if let Some(p) = progress {
            p.stage(1, STAGES, "Reading archive...");
        }

        let lines = ArchiveReader::with_mmap(self.use_mmap).read_lines(path)?;
        let mut output = self.process_lines(lines, progress)?;
        output.report.archive = path.display().to_string();
        Ok(output)
    }

    /// Process lines that have already been read
    pub fn process_lines(
        &self,
        lines: Vec<RawLine>,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if self.start_year > self.end_year {
            return Err(ProcessingError::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        pool.install(|| self.run_stages(lines, progress))
    }

    fn run_stages(
        &self,
        lines: Vec<RawLine>,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        let total_lines = lines.len();

        if let Some(p) = progress {
            p.stage(2, STAGES, "Extracting storm headers...");
        }
        let descriptors = HeaderExtractor::new().extract(&lines)?;

        if let Some(p) = progress {
            p.stage(3, STAGES, "Tagging storm blocks...");
        }
        let tagged = BlockTagger::new().tag(lines, &descriptors)?;
        let data_lines = tagged.len();

        if let Some(p) = progress {
            p.stage(4, STAGES, "Decoding observations...");
        }
        let batch = FieldDecoder::new()
            .with_year_range(self.start_year, self.end_year)
            .decode_all(&tagged)?;
        drop(tagged);

        if let Some(p) = progress {
            p.stage(5, STAGES, "Computing storm metrics...");
        }
        let observations = MetricsCalculator::new().enrich(batch.observations);

        if let Some(p) = progress {
            p.stage(6, STAGES, "Aggregating storm-months...");
        }
        let storm_months = MonthlyAggregator::new().aggregate(&observations);

        let storms = {
            let mut ids: Vec<&str> = observations.iter().map(|o| o.storm_id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        };

        let report = RunReport {
            archive: String::new(),
            start_year: self.start_year,
            end_year: self.end_year,
            total_lines,
            header_lines: descriptors.len(),
            data_lines,
            observations: observations.len(),
            storms,
            storm_months: storm_months.len(),
            exclusions: batch.exclusions,
            warnings: batch.warnings,
        };

        info!(
            "Processed {} lines into {} observations and {} storm-months",
            total_lines,
            report.observations,
            report.storm_months
        );

        Ok(PipelineOutput {
            observations,
            storm_months,
            report,
        })
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
