/// Unit conversions
pub const KNOTS_TO_MPH: f64 = 1.15078;
pub const NM_TO_MILES: f64 = 1.15078;

/// Missing-value sentinels used throughout HURDAT2
pub const MISSING_SENTINELS: [i32; 2] = [-99, -999];

/// HURDAT2 data line layout (0-based field positions)
pub const FIELD_DATE: usize = 0;
pub const FIELD_TIME: usize = 1;
pub const FIELD_RECORD_ID: usize = 2;
pub const FIELD_STATUS: usize = 3;
pub const FIELD_LATITUDE: usize = 4;
pub const FIELD_LONGITUDE: usize = 5;
pub const FIELD_WIND: usize = 6;
pub const FIELD_PRESSURE: usize = 7;
pub const FIELD_RADII_34KT: usize = 8;
pub const FIELD_RADII_50KT: usize = 12;
pub const FIELD_RADII_64KT: usize = 16;
pub const FIELD_RADIUS_MAX_WIND: usize = 20;

/// Date through the 64-kt NW radius
pub const MIN_DATA_FIELDS: usize = 20;

/// Panel coverage
pub const DEFAULT_START_YEAR: i32 = 1980;
pub const DEFAULT_END_YEAR: i32 = 2022;

/// Output file names
pub const OBSERVATIONS_FILE: &str = "hurdat_observations.parquet";
pub const STORM_MONTHS_FILE: &str = "hurdat_storm_months.parquet";
pub const RUN_REPORT_FILE: &str = "run_report.json";
pub const STAGING_PREFIX: &str = ".hurdat-staging-";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
