use crate::error::{ProcessingError, Result};
use crate::models::{
    CodeTable, IntensityCategory, Observation, QuadrantRadii, RecordIdentifier, StormMonth,
    StormStatus, YearMonth,
};
use crate::utils::constants::*;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

type Column = (Field, ArrayRef);

/// Which of the two panels a Parquet file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Observations,
    StormMonths,
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the observation panel; an empty slice still yields a file with the schema
    pub fn write_observations(&self, records: &[Observation], path: &Path) -> Result<()> {
        self.write_table(records, path, observation_columns)
    }

    pub fn write_storm_months(&self, records: &[StormMonth], path: &Path) -> Result<()> {
        self.write_table(records, path, storm_month_columns)
    }

    fn write_table<T>(
        &self,
        records: &[T],
        path: &Path,
        columns: fn(&[T]) -> Vec<Column>,
    ) -> Result<()> {
        let schema = schema_of(&columns(&[]));

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in records.chunks(self.row_group_size.max(1)) {
            let arrays = columns(chunk).into_iter().map(|(_, array)| array).collect();
            let batch = RecordBatch::try_new(schema.clone(), arrays)?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    /// Read back storm-month rows, restoring the code tables from their ordinal columns
    pub fn read_storm_months(&self, path: &Path, limit: usize) -> Result<Vec<StormMonth>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut rows = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;

            let names = string_column(&batch, "storm_name")?;
            let months = typed_column::<Date32Array>(&batch, "month")?;
            let counts = typed_column::<UInt64Array>(&batch, "observation_count")?;
            let wind = typed_column::<Float64Array>(&batch, "wind")?;
            let latitude = typed_column::<Float64Array>(&batch, "latitude")?;
            let longitude = typed_column::<Float64Array>(&batch, "longitude")?;
            let ts_diameter = typed_column::<Float64Array>(&batch, "ts_diameter")?;
            let hu_diameter = typed_column::<Float64Array>(&batch, "hu_diameter")?;
            let pressure = typed_column::<Float64Array>(&batch, "pressure")?;
            let status = typed_column::<UInt8Array>(&batch, "status")?;
            let category = typed_column::<UInt8Array>(&batch, "category")?;
            let record_identifier = typed_column::<UInt8Array>(&batch, "record_identifier")?;
            let exposure_time = typed_column::<Float64Array>(&batch, "exposure_time")?;
            let wind_max = typed_column::<Float64Array>(&batch, "wind_max")?;
            let wind_sd = typed_column::<Float64Array>(&batch, "wind_sd")?;

            for i in 0..batch.num_rows() {
                if rows.len() >= limit {
                    return Ok(rows);
                }

                let month = NaiveDate::from_num_days_from_ce_opt(
                    months.value(i) + UNIX_EPOCH_DAYS_FROM_CE,
                )
                .map(|d| YearMonth::new(d.year(), d.month()))
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid month in Parquet file".to_string())
                })?;

                rows.push(StormMonth {
                    storm_name: names.value(i).to_string(),
                    month,
                    observation_count: counts.value(i) as usize,
                    wind: opt_f64(wind, i),
                    latitude: opt_f64(latitude, i),
                    longitude: opt_f64(longitude, i),
                    ts_diameter: opt_f64(ts_diameter, i),
                    hu_diameter: opt_f64(hu_diameter, i),
                    pressure: opt_f64(pressure, i),
                    status: opt_code(status, i),
                    category: opt_code(category, i),
                    record_identifier: opt_code(record_identifier, i),
                    exposure_time: opt_f64(exposure_time, i),
                    wind_max: opt_f64(wind_max, i),
                    wind_sd: opt_f64(wind_sd, i),
                });
            }
        }

        Ok(rows)
    }

    /// Tell the two panels apart by their schema
    pub fn detect_table_kind(&self, path: &Path) -> Result<TableKind> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema();

        if schema.field_with_name("observation_count").is_ok() {
            Ok(TableKind::StormMonths)
        } else if schema.field_with_name("source_line").is_ok() {
            Ok(TableKind::Observations)
        } else {
            Err(ProcessingError::InvalidFormat(format!(
                "{} is not a HURDAT panel file",
                path.display()
            )))
        }
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();
        let columns = metadata
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Info:\n  Total rows: {}\n  Row groups: {}\n  Columns: {}\n  File size: {:.2} MB\n  Average row group size: {:.0} rows",
            self.total_rows,
            self.row_groups,
            self.columns.len(),
            self.file_size as f64 / 1_048_576.0,
            if self.row_groups > 0 {
                self.total_rows as f64 / self.row_groups as f64
            } else {
                0.0
            }
        )
    }
}

fn schema_of(columns: &[Column]) -> SchemaRef {
    Arc::new(Schema::new(
        columns.iter().map(|(field, _)| field.clone()).collect::<Vec<_>>(),
    ))
}

fn f64_column(name: &str, values: Vec<Option<f64>>) -> Column {
    (
        Field::new(name, DataType::Float64, true),
        Arc::new(Float64Array::from(values)),
    )
}

fn month_columns(months: Vec<YearMonth>) -> Vec<Column> {
    let days: Vec<i32> = months
        .iter()
        .map(|m| {
            m.first_day()
                .map_or(0, |d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        })
        .collect();
    let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
    vec![
        (
            Field::new("month", DataType::Date32, false),
            Arc::new(Date32Array::from(days)),
        ),
        (
            Field::new("month_label", DataType::Utf8, false),
            Arc::new(StringArray::from(labels)),
        ),
    ]
}

/// Ordinal, short code and label columns for one code table
fn code_columns<T: CodeTable>(name: &str, values: Vec<Option<T>>) -> Vec<Column> {
    let ordinals: Vec<Option<u8>> = values.iter().map(|v| v.map(|c| c.ordinal())).collect();
    let codes: Vec<Option<&str>> = values.iter().map(|v| v.map(|c| c.code())).collect();
    let labels: Vec<Option<&str>> = values.iter().map(|v| v.map(|c| c.label())).collect();
    vec![
        (
            Field::new(name, DataType::UInt8, true),
            Arc::new(UInt8Array::from(ordinals)),
        ),
        (
            Field::new(format!("{}_code", name), DataType::Utf8, true),
            Arc::new(StringArray::from(codes)),
        ),
        (
            Field::new(format!("{}_label", name), DataType::Utf8, true),
            Arc::new(StringArray::from(labels)),
        ),
    ]
}

fn observation_columns(records: &[Observation]) -> Vec<Column> {
    let f64s = |get: fn(&Observation) -> Option<f64>| -> Vec<Option<f64>> {
        records.iter().map(get).collect()
    };

    let mut columns: Vec<Column> = vec![
        (
            Field::new("storm_id", DataType::Utf8, false),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.storm_id.as_str()),
            )),
        ),
        (
            Field::new("storm_name", DataType::Utf8, false),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.storm_name.as_str()),
            )),
        ),
        (
            Field::new("source_line", DataType::UInt64, false),
            Arc::new(UInt64Array::from_iter_values(
                records.iter().map(|r| r.source_line as u64),
            )),
        ),
        (
            Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None), false),
            Arc::new(TimestampSecondArray::from_iter_values(
                records.iter().map(|r| r.timestamp.and_utc().timestamp()),
            )),
        ),
    ];

    columns.extend(month_columns(records.iter().map(|r| r.month).collect()));
    columns.extend(code_columns(
        "record_identifier",
        records.iter().map(|r| r.record_identifier).collect::<Vec<Option<RecordIdentifier>>>(),
    ));
    columns.extend(code_columns(
        "status",
        records.iter().map(|r| r.status).collect::<Vec<Option<StormStatus>>>(),
    ));

    columns.push(f64_column("latitude", f64s(|r| Some(r.latitude))));
    columns.push(f64_column("longitude", f64s(|r| Some(r.longitude))));
    columns.push(f64_column("wind", f64s(|r| r.wind)));
    columns.push(f64_column("pressure", f64s(|r| r.pressure)));

    let thresholds: [(&str, fn(&Observation) -> QuadrantRadii); 3] = [
        ("34", |r| r.wind_radii.kt34),
        ("50", |r| r.wind_radii.kt50),
        ("64", |r| r.wind_radii.kt64),
    ];
    for (threshold, radii) in thresholds {
        for (q, quadrant) in ["ne", "se", "sw", "nw"].iter().enumerate() {
            let values = records.iter().map(|r| radii(r).values()[q]).collect();
            columns.push(f64_column(&format!("radius_{}kt_{}", threshold, quadrant), values));
        }
    }
    columns.push(f64_column("radius_max_wind", f64s(|r| r.radius_max_wind)));

    columns.extend(code_columns(
        "category",
        records.iter().map(|r| r.category).collect::<Vec<Option<IntensityCategory>>>(),
    ));
    columns.push(f64_column("ts_diameter", f64s(|r| r.ts_diameter)));
    columns.push(f64_column("hu_diameter", f64s(|r| r.hu_diameter)));
    columns.push(f64_column("exposure_time", f64s(|r| r.exposure_time)));
    columns.push(f64_column("wind_max", f64s(|r| r.wind_max)));
    columns.push(f64_column("wind_sd", f64s(|r| r.wind_sd)));

    columns
}

fn storm_month_columns(records: &[StormMonth]) -> Vec<Column> {
    let f64s = |get: fn(&StormMonth) -> Option<f64>| -> Vec<Option<f64>> {
        records.iter().map(get).collect()
    };

    let mut columns: Vec<Column> = vec![(
        Field::new("storm_name", DataType::Utf8, false),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.storm_name.as_str()),
        )),
    )];
    columns.extend(month_columns(records.iter().map(|r| r.month).collect()));
    columns.push((
        Field::new("observation_count", DataType::UInt64, false),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.observation_count as u64),
        )),
    ));

    columns.push(f64_column("wind", f64s(|r| r.wind)));
    columns.push(f64_column("latitude", f64s(|r| r.latitude)));
    columns.push(f64_column("longitude", f64s(|r| r.longitude)));
    columns.push(f64_column("ts_diameter", f64s(|r| r.ts_diameter)));
    columns.push(f64_column("hu_diameter", f64s(|r| r.hu_diameter)));
    columns.push(f64_column("pressure", f64s(|r| r.pressure)));

    columns.extend(code_columns(
        "status",
        records.iter().map(|r| r.status).collect::<Vec<Option<StormStatus>>>(),
    ));
    columns.extend(code_columns(
        "category",
        records.iter().map(|r| r.category).collect::<Vec<Option<IntensityCategory>>>(),
    ));
    columns.extend(code_columns(
        "record_identifier",
        records.iter().map(|r| r.record_identifier).collect::<Vec<Option<RecordIdentifier>>>(),
    ));
    columns.push(f64_column("exposure_time", f64s(|r| r.exposure_time)));
    columns.push(f64_column("wind_max", f64s(|r| r.wind_max)));
    columns.push(f64_column("wind_sd", f64s(|r| r.wind_sd)));

    columns
}

fn typed_column<'a, A: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a A> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<A>())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid or missing {} column", name)))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    typed_column::<StringArray>(batch, name)
}

fn opt_f64(array: &Float64Array, i: usize) -> Option<f64> {
    (!array.is_null(i)).then(|| array.value(i))
}

fn opt_code<T: CodeTable>(array: &UInt8Array, i: usize) -> Option<T> {
    if array.is_null(i) {
        None
    } else {
        T::from_ordinal(array.value(i))
    }
}
