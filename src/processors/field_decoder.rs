use crate::error::{ProcessingError, Result};
use crate::models::{
    CodeTable, Observation, QuadrantRadii, RecordIdentifier, StormStatus, TaggedLine, WindRadii,
    YearMonth,
};
use crate::processors::run_report::{DecodeWarning, ExclusionReason, WarningKind};
use crate::utils::constants::*;
use crate::utils::coordinates::split_coordinate;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;
use validator::Validate;

/// Result of decoding one tagged line
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Kept {
        observation: Observation,
        warnings: Vec<DecodeWarning>,
    },
    Excluded {
        line: usize,
        reason: ExclusionReason,
    },
}

/// Decoded observations in line order, plus what was dropped and why
#[derive(Debug, Clone, Default)]
pub struct DecodeBatch {
    pub observations: Vec<Observation>,
    pub warnings: Vec<DecodeWarning>,
    pub exclusions: BTreeMap<ExclusionReason, usize>,
}

/// Turns tagged HURDAT2 data lines into typed observations
pub struct FieldDecoder {
    start_year: i32,
    end_year: i32,
}

impl FieldDecoder {
    pub fn new() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
        }
    }

    pub fn with_year_range(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Decode every line in parallel; output keeps the input order
    pub fn decode_all(&self, lines: &[TaggedLine]) -> Result<DecodeBatch> {
        let decoded = lines
            .par_iter()
            .map(|line| self.decode_line(line))
            .collect::<Result<Vec<_>>>()?;

        let mut batch = DecodeBatch {
            observations: Vec::with_capacity(decoded.len()),
            ..Default::default()
        };

        for item in decoded {
            match item {
                Decoded::Kept {
                    observation,
                    warnings,
                } => {
                    batch.observations.push(observation);
                    batch.warnings.extend(warnings);
                }
                Decoded::Excluded { reason, .. } => {
                    *batch.exclusions.entry(reason).or_default() += 1;
                }
            }
        }

        debug!(
            "Decoded {} observations ({} excluded, {} warnings)",
            batch.observations.len(),
            batch.exclusions.values().sum::<usize>(),
            batch.warnings.len()
        );
        Ok(batch)
    }

    /// Decode a single tagged line. Pure: the same line always decodes the same way.
    pub fn decode_line(&self, tagged: &TaggedLine) -> Result<Decoded> {
        let line = &tagged.line;
        let line_number = line.physical_line;
        let mut warnings = Vec::new();

        let timestamp = parse_timestamp(line_number, line.field(FIELD_DATE), line.field(FIELD_TIME))?;

        let record_identifier = match line.field(FIELD_RECORD_ID) {
            "" => None,
            code => RecordIdentifier::from_code(code).or_else(|| {
                warnings.push(DecodeWarning::new(
                    line_number,
                    WarningKind::UnknownRecordCode,
                    code,
                ));
                None
            }),
        };

        let status_code = line.field(FIELD_STATUS);
        let status = StormStatus::from_code(status_code).or_else(|| {
            warnings.push(DecodeWarning::new(
                line_number,
                WarningKind::UnknownStatusCode,
                status_code,
            ));
            None
        });

        let latitude = parse_coordinate(line_number, line.field(FIELD_LATITUDE), true)?;
        let longitude = parse_coordinate(line_number, line.field(FIELD_LONGITUDE), false)?;

        let wind = parse_numeric(line_number, "wind", line.field(FIELD_WIND))?
            .map(|knots| knots * KNOTS_TO_MPH);
        let pressure = parse_numeric(line_number, "pressure", line.field(FIELD_PRESSURE))?;

        let wind_radii = WindRadii {
            kt34: parse_quadrants(line_number, line.fields.as_slice(), FIELD_RADII_34KT)?,
            kt50: parse_quadrants(line_number, line.fields.as_slice(), FIELD_RADII_50KT)?,
            kt64: parse_quadrants(line_number, line.fields.as_slice(), FIELD_RADII_64KT)?,
        };

        // Only present in the post-2022 layout
        let radius_max_wind = parse_numeric(
            line_number,
            "radius of maximum wind",
            line.field(FIELD_RADIUS_MAX_WIND),
        )?;

        let year = timestamp.year();
        if year < self.start_year {
            return Ok(Decoded::Excluded {
                line: line_number,
                reason: ExclusionReason::BeforeStartYear,
            });
        }
        if year > self.end_year {
            return Ok(Decoded::Excluded {
                line: line_number,
                reason: ExclusionReason::AfterEndYear,
            });
        }

        let observation = Observation {
            storm_id: tagged.storm_id.clone(),
            storm_name: tagged.storm_name.clone(),
            source_line: line_number,
            timestamp,
            month: YearMonth::from_datetime(&timestamp),
            record_identifier,
            status,
            latitude,
            longitude,
            wind,
            pressure,
            wind_radii,
            radius_max_wind,
            category: None,
            ts_diameter: None,
            hu_diameter: None,
            exposure_time: None,
            wind_max: None,
            wind_sd: None,
        };

        if observation.validate().is_err() {
            return Ok(Decoded::Excluded {
                line: line_number,
                reason: ExclusionReason::CoordinateOutOfRange,
            });
        }

        Ok(Decoded::Kept {
            observation,
            warnings,
        })
    }
}

impl Default for FieldDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine `YYYYMMDD` and `HHMM` into a minute-resolution timestamp
fn parse_timestamp(line: usize, date: &str, time: &str) -> Result<NaiveDateTime> {
    let invalid = || ProcessingError::InvalidTimestamp {
        line,
        value: format!("{} {}", date, time),
    };

    let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(date, 8) || !all_digits(time, 4) {
        return Err(invalid());
    }

    // Slices are ASCII digits, so these parses cannot fail
    let year = date[0..4].parse::<i32>().map_err(|_| invalid())?;
    let month = date[4..6].parse::<u32>().map_err(|_| invalid())?;
    let day = date[6..8].parse::<u32>().map_err(|_| invalid())?;
    let hour = time[0..2].parse::<u32>().map_err(|_| invalid())?;
    let minute = time[2..4].parse::<u32>().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(invalid)
}

fn parse_coordinate(line: usize, raw: &str, expect_latitude: bool) -> Result<f64> {
    match split_coordinate(raw) {
        Some((hemisphere, magnitude)) if hemisphere.is_latitude() == expect_latitude => {
            Ok(hemisphere.sign() * magnitude)
        }
        _ => Err(ProcessingError::InvalidCoordinate {
            line,
            value: raw.to_string(),
        }),
    }
}

/// Parse a numeric column, mapping sentinels and blanks to missing
fn parse_numeric(line: usize, field: &'static str, raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = || ProcessingError::InvalidNumeric {
        line,
        field,
        value: raw.to_string(),
    };

    // f64 parsing also accepts "NaN" and "inf", which are not archive values
    if !is_plain_number(raw) {
        return Err(invalid());
    }
    let value = raw.parse::<f64>().map_err(|_| invalid())?;

    if MISSING_SENTINELS.iter().any(|&s| value == s as f64) {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Optional sign, then digits with at most one decimal point
fn is_plain_number(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let mut digits = 0;
    let mut points = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

fn parse_quadrants(line: usize, fields: &[String], start: usize) -> Result<QuadrantRadii> {
    let get = |offset: usize| fields.get(start + offset).map(String::as_str).unwrap_or("");
    Ok(QuadrantRadii::new(
        parse_numeric(line, "wind radius", get(0))?,
        parse_numeric(line, "wind radius", get(1))?,
        parse_numeric(line, "wind radius", get(2))?,
        parse_numeric(line, "wind radius", get(3))?,
    ))
}
