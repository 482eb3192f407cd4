use crate::cli::args::{Cli, Commands};
use crate::config::{OutputLayout, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::{CodeTable, StormMonth};
use crate::processors::{ParallelProcessor, PipelineOutput};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ArtifactWriter, ParquetWriter, TableKind};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let overrides = cli.command.config_overrides();

    match cli.command {
        Commands::Process { input, config, .. } => {
            let settings = PipelineConfig::load(config.as_deref(), overrides)?;
            println!("Processing HURDAT2 archive: {}", input.display());
            println!("Output root: {}", settings.root.display());
            println!(
                "Years: {}-{}, Workers: {}",
                settings.start_year, settings.end_year, settings.max_workers
            );

            let output = run_pipeline(input, &settings, cli.quiet).await?;
            println!("\n{}", output.report.generate_summary());

            let layout = OutputLayout::prepare(&settings.root)?;
            let writer = ParquetWriter::new()
                .with_compression(&settings.compression)?
                .with_row_group_size(settings.row_group_size);

            let written = tokio::task::spawn_blocking(move || {
                ArtifactWriter::new(writer).write_all(&output, &layout)
            })
            .await??;

            println!("Wrote:");
            for path in &written {
                println!("  {}", path.display());
            }
            println!("Processing complete!");
        }

        Commands::Validate { input, config, .. } => {
            let settings = PipelineConfig::load(config.as_deref(), overrides)?;
            println!("Validating HURDAT2 archive: {}", input.display());

            let output = run_pipeline(input, &settings, cli.quiet).await?;
            println!("\n{}", output.report.generate_summary());
            println!("Validation complete - no output files written");
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            match writer.detect_table_kind(&file)? {
                TableKind::StormMonths if sample > 0 => {
                    println!("\nSample storm-months (showing up to {}):", sample);
                    match writer.read_storm_months(&file, sample) {
                        Ok(rows) => {
                            for (i, row) in rows.iter().enumerate() {
                                println!("{}. {}", i + 1, describe_storm_month(row));
                            }
                        }
                        Err(e) => println!("Error reading sample data: {}", e),
                    }
                }
                TableKind::StormMonths => {}
                TableKind::Observations => {
                    println!("\nObservation panel columns:");
                    println!("  {}", file_info.columns.join(", "));
                }
            }
        }
    }

    Ok(())
}

/// Run the CPU-bound stages on the blocking pool
async fn run_pipeline(
    input: PathBuf,
    settings: &PipelineConfig,
    quiet: bool,
) -> Result<PipelineOutput> {
    let processor = ParallelProcessor::new(settings.max_workers)
        .with_year_range(settings.start_year, settings.end_year)
        .with_mmap(settings.use_mmap);

    let result = tokio::task::spawn_blocking(move || {
        let progress = ProgressReporter::new_spinner("Processing HURDAT2 archive...", quiet);
        match processor.process_archive(&input, Some(&progress)) {
            Ok(output) => {
                progress.finish_with_message(&format!(
                    "Decoded {} observations",
                    output.observations.len()
                ));
                Ok(output)
            }
            Err(e) => {
                progress.abandon();
                Err(e)
            }
        }
    })
    .await?;

    if let Err(ref e) = result {
        match e.line_number() {
            Some(line) => error!("Archive rejected at line {}: {}", line, e),
            None => error!("Processing failed: {}", e),
        }
    }
    result
}

fn describe_storm_month(row: &StormMonth) -> String {
    format!(
        "{} {}: {} obs, wind={} mph, pressure={} mb, status={}, category={}",
        row.storm_name,
        row.month,
        row.observation_count,
        format_value(row.wind),
        format_value(row.pressure),
        row.status.map_or("NA", |s| s.label()),
        row.category.map_or("NA", |c| c.label()),
    )
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.1}", v))
}

/// Install the tracing subscriber; `RUST_LOG` overrides the default filter
pub fn setup_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hurdat_processor={}", log_level)));

    let init_result = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    init_result.map_err(|e| ProcessingError::Config(format!("Failed to set up logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    info!("hurdat-processor {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
