use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::codes::{IntensityCategory, RecordIdentifier, StormStatus};
use crate::utils::constants::NM_TO_MILES;

/// Calendar month key used for storm-month grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_datetime(timestamp: &NaiveDateTime) -> Self {
        Self::new(timestamp.year(), timestamp.month())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Wind extent in nautical miles for the four quadrants at one threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadrantRadii {
    pub ne: Option<f64>,
    pub se: Option<f64>,
    pub sw: Option<f64>,
    pub nw: Option<f64>,
}

impl QuadrantRadii {
    pub fn new(ne: Option<f64>, se: Option<f64>, sw: Option<f64>, nw: Option<f64>) -> Self {
        Self { ne, se, sw, nw }
    }

    /// Widest opposite-quadrant span, converted to statute miles.
    ///
    /// Any missing quadrant makes the diameter missing.
    pub fn diameter_miles(&self) -> Option<f64> {
        let ne_sw = self.ne? + self.sw?;
        let nw_se = self.nw? + self.se?;
        Some(ne_sw.max(nw_se) * NM_TO_MILES)
    }

    pub fn values(&self) -> [Option<f64>; 4] {
        [self.ne, self.se, self.sw, self.nw]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindRadii {
    pub kt34: QuadrantRadii,
    pub kt50: QuadrantRadii,
    pub kt64: QuadrantRadii,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    pub storm_id: String,
    pub storm_name: String,
    pub source_line: usize,
    pub timestamp: NaiveDateTime,
    pub month: YearMonth,

    pub record_identifier: Option<RecordIdentifier>,
    pub status: Option<StormStatus>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    // mph
    pub wind: Option<f64>,
    // mb
    pub pressure: Option<f64>,
    pub wind_radii: WindRadii,
    pub radius_max_wind: Option<f64>,

    // Filled in by the metrics pass
    pub category: Option<IntensityCategory>,
    pub ts_diameter: Option<f64>,
    pub hu_diameter: Option<f64>,
    pub exposure_time: Option<f64>,
    pub wind_max: Option<f64>,
    pub wind_sd: Option<f64>,
}

impl Observation {
    /// Every optional numeric field, in a fixed order
    pub fn numeric_fields(&self) -> Vec<Option<f64>> {
        let mut values = vec![
            Some(self.latitude),
            Some(self.longitude),
            self.wind,
            self.pressure,
            self.radius_max_wind,
            self.ts_diameter,
            self.hu_diameter,
            self.exposure_time,
            self.wind_max,
            self.wind_sd,
        ];
        values.extend(self.wind_radii.kt34.values());
        values.extend(self.wind_radii.kt50.values());
        values.extend(self.wind_radii.kt64.values());
        values
    }
}
