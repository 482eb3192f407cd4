use serde::{Deserialize, Serialize};

use crate::models::codes::{IntensityCategory, RecordIdentifier, StormStatus};
use crate::models::observation::YearMonth;

/// All observations of one storm name within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormMonth {
    pub storm_name: String,
    pub month: YearMonth,
    pub observation_count: usize,

    // Means over non-missing values
    pub wind: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ts_diameter: Option<f64>,
    pub hu_diameter: Option<f64>,
    pub pressure: Option<f64>,

    // Maxima over non-missing values
    pub status: Option<StormStatus>,
    pub category: Option<IntensityCategory>,
    pub record_identifier: Option<RecordIdentifier>,
    pub exposure_time: Option<f64>,
    pub wind_max: Option<f64>,
    pub wind_sd: Option<f64>,
}

impl StormMonth {
    pub fn numeric_fields(&self) -> [Option<f64>; 9] {
        [
            self.wind,
            self.latitude,
            self.longitude,
            self.ts_diameter,
            self.hu_diameter,
            self.pressure,
            self.exposure_time,
            self.wind_max,
            self.wind_sd,
        ]
    }
}
