use hurdat_processor::config::OutputLayout;
use hurdat_processor::models::{CodeTable, StormStatus, YearMonth};
use hurdat_processor::processors::{ParallelProcessor, PipelineOutput};
use hurdat_processor::readers::{ArchiveReader, HeaderExtractor};
use hurdat_processor::utils::MISSING_SENTINELS;
use hurdat_processor::writers::{ArtifactWriter, ParquetWriter};
use hurdat_processor::{ProcessingError, Result};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const NO_RADII: &str = " -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999,";

fn data_line(date: &str, time: &str, status: &str, lat: &str, lon: &str, wind: i32) -> String {
    format!(
        "{}, {},  , {}, {}, {}, {:>3}, -999,{}",
        date, time, status, lat, lon, wind, NO_RADII
    )
}

fn write_archive(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp archive");
    for line in lines {
        writeln!(file, "{}", line).expect("write archive line");
    }
    file
}

/// A few storms spread over two seasons, with radii on some rows
fn sample_archive() -> Vec<String> {
    vec![
        "AL011979, DAVID, 2,".to_string(),
        data_line("19790830", "0000", "HU", "15.0N", "60.0W", 150),
        data_line("19790830", "0600", "HU", "15.5N", "61.0W", 150),
        "AL041980, ALLEN, 4,".to_string(),
        data_line("19800731", "1800", "TS", "11.0N", "52.0W", 45),
        data_line("19800801", "0000", "HU", "11.5N", "54.0W", 70),
        "19800801, 1200, L, HU, 12.0N,  56.0W, 120,  945,  150,  120,  100,  130,   80,   60,   50,   70,   40,   30,   25,   35,   15"
            .to_string(),
        data_line("19800901", "0000", "EX", "35.0N", "70.0W", 50),
        "AL021980, BONNIE, 1,".to_string(),
        data_line("19800815", "0000", "TD", "20.0N", "40.0W", 30),
    ]
}

fn process(lines: &[String]) -> Result<PipelineOutput> {
    let archive = write_archive(lines);
    ParallelProcessor::new(2).process_archive(archive.path(), None)
}

#[test]
fn test_two_line_storm_end_to_end() -> Result<()> {
    let output = process(&[
        "AL011980,TEST,2".to_string(),
        data_line("19800101", "0000", "TS", "28.5N", "079.0W", 10),
        data_line("19800101", "0600", "HU", "29.0N", "080.0W", 60),
    ])?;

    assert_eq!(output.observations.len(), 2);
    let first = &output.observations[0];
    let second = &output.observations[1];

    assert_eq!(first.storm_id, "AL011980");
    assert_eq!(first.storm_name, "TEST");
    assert_eq!(second.storm_id, "AL011980");
    assert!((first.wind.unwrap() - 11.51).abs() < 0.01);
    assert!((second.wind.unwrap() - 69.05).abs() < 0.01);
    assert_eq!(first.category, None);
    assert_eq!(second.category, None);
    assert_eq!(second.status, Some(StormStatus::Hurricane));
    assert_eq!(first.latitude, 28.5);
    assert_eq!(first.longitude, -79.0);

    assert_eq!(output.storm_months.len(), 1);
    let month = &output.storm_months[0];
    assert_eq!(month.month, YearMonth::new(1980, 1));
    assert!((month.wind.unwrap() - 40.28).abs() < 0.01);
    assert_eq!(month.status, Some(StormStatus::Hurricane));
    assert_eq!(month.status.map(|s| s.label()), Some("Hurricane"));
    Ok(())
}

#[test]
fn test_short_block_fails_without_writing() -> Result<()> {
    let archive = write_archive(&[
        "AL011980, ALLEN, 2,".to_string(),
        data_line("19800801", "0000", "HU", "11.5N", "54.0W", 70),
        "AL021980, BONNIE, 1,".to_string(),
        data_line("19800815", "0000", "TD", "20.0N", "40.0W", 30),
    ]);
    let root = TempDir::new()?;
    let layout = OutputLayout::prepare(root.path())?;

    let result = ParallelProcessor::new(1)
        .process_archive(archive.path(), None)
        .and_then(|output| ArtifactWriter::new(ParquetWriter::new()).write_all(&output, &layout));

    match result {
        Err(ProcessingError::UncoveredDataLine { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected UncoveredDataLine, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(root.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_descriptor_ranges_cover_every_data_line() -> Result<()> {
    let lines = ArchiveReader::new().read_str(&sample_archive().join("\n"))?;
    let descriptors = HeaderExtractor::new().extract(&lines)?;

    let mut covered: Vec<usize> = descriptors.iter().flat_map(|d| d.data_range()).collect();
    covered.sort_unstable();
    let data_lines: Vec<usize> = lines
        .iter()
        .filter(|l| !l.is_header())
        .map(|l| l.line_number)
        .collect();

    assert_eq!(covered, data_lines);
    Ok(())
}

#[test]
fn test_year_range_and_metrics() -> Result<()> {
    let output = process(&sample_archive())?;

    // DAVID falls before the panel window
    assert!(output.observations.iter().all(|o| o.storm_name != "DAVID"));
    assert_eq!(output.report.excluded_total(), 2);
    assert_eq!(output.observations.len(), 5);
    assert_eq!(output.report.storms, 2);

    let allen: Vec<_> = output
        .observations
        .iter()
        .filter(|o| o.storm_id == "AL041980")
        .collect();
    assert_eq!(allen.len(), 4);
    for obs in &allen {
        assert_eq!(obs.exposure_time, Some(750.0));
        assert!((obs.wind_max.unwrap() - 120.0 * 1.15078).abs() < 1e-9);
    }

    let landfall = allen[2];
    assert_eq!(landfall.record_identifier.map(|r| r.code()), Some("L"));
    assert!((landfall.ts_diameter.unwrap() - 250.0 * 1.15078).abs() < 1e-9);
    assert!((landfall.hu_diameter.unwrap() - 65.0 * 1.15078).abs() < 1e-9);
    assert_eq!(landfall.radius_max_wind, Some(15.0));
    assert_eq!(landfall.pressure, Some(945.0));
    assert!(landfall.category.is_some());
    Ok(())
}

#[test]
fn test_no_sentinels_survive() -> Result<()> {
    let output = process(&sample_archive())?;

    let is_sentinel = |v: &Option<f64>| {
        v.map_or(false, |v| MISSING_SENTINELS.iter().any(|s| *s as f64 == v))
    };

    for obs in &output.observations {
        assert!(!obs.numeric_fields().iter().any(is_sentinel), "{:?}", obs);
    }
    for row in &output.storm_months {
        assert!(!row.numeric_fields().iter().any(is_sentinel), "{:?}", row);
    }
    Ok(())
}

#[test]
fn test_aggregation_conserves_observations() -> Result<()> {
    let output = process(&sample_archive())?;

    let total: usize = output.storm_months.iter().map(|m| m.observation_count).sum();
    assert_eq!(total, output.observations.len());

    let keys: Vec<(String, String)> = output
        .storm_months
        .iter()
        .map(|m| (m.storm_name.clone(), m.month.to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("ALLEN".to_string(), "1980-07".to_string()),
            ("ALLEN".to_string(), "1980-08".to_string()),
            ("ALLEN".to_string(), "1980-09".to_string()),
            ("BONNIE".to_string(), "1980-08".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_mmap_matches_buffered_read() -> Result<()> {
    let archive = write_archive(&sample_archive());

    let buffered = ParallelProcessor::new(2).process_archive(archive.path(), None)?;
    let mapped = ParallelProcessor::new(2)
        .with_mmap(true)
        .process_archive(archive.path(), None)?;

    assert_eq!(buffered.observations, mapped.observations);
    assert_eq!(buffered.storm_months, mapped.storm_months);
    Ok(())
}

#[test]
fn test_written_panels_read_back() -> Result<()> {
    let output = process(&sample_archive())?;
    let root = TempDir::new()?;
    let layout = OutputLayout::prepare(&root.path().join("panels"))?;
    let writer = ParquetWriter::new().with_compression("zstd")?;

    ArtifactWriter::new(writer).write_all(&output, &layout)?;

    let reader = ParquetWriter::new();
    assert_eq!(
        reader.get_file_info(&layout.observations)?.total_rows,
        output.observations.len() as i64
    );
    let months = reader.read_storm_months(&layout.storm_months, 100)?;
    assert_eq!(months, output.storm_months);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&layout.run_report)?)?;
    assert_eq!(report["storm_months"], 4);
    assert_eq!(report["start_year"], 1980);
    Ok(())
}
