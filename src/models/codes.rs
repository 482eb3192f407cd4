use serde::{Deserialize, Serialize};

/// Fixed enumeration with a stable ordinal and a human-readable label.
///
/// Ordinals are what aggregation compares; `from_ordinal` puts the label
/// back after a max has been taken.
pub trait CodeTable: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn code(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn ordinal(&self) -> u8;

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.ordinal() == ordinal)
    }
}

/// Special-entry identifier in column 3 of a HURDAT2 data line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordIdentifier {
    ClosestApproach = 1,
    Genesis = 2,
    IntensityPeak = 3,
    Landfall = 4,
    MinimumPressure = 5,
    RapidChange = 6,
    StatusChange = 7,
    TrackDetail = 8,
    MaximumWind = 9,
}

impl CodeTable for RecordIdentifier {
    const ALL: &'static [Self] = &[
        RecordIdentifier::ClosestApproach,
        RecordIdentifier::Genesis,
        RecordIdentifier::IntensityPeak,
        RecordIdentifier::Landfall,
        RecordIdentifier::MinimumPressure,
        RecordIdentifier::RapidChange,
        RecordIdentifier::StatusChange,
        RecordIdentifier::TrackDetail,
        RecordIdentifier::MaximumWind,
    ];

    fn code(&self) -> &'static str {
        match self {
            RecordIdentifier::ClosestApproach => "C",
            RecordIdentifier::Genesis => "G",
            RecordIdentifier::IntensityPeak => "I",
            RecordIdentifier::Landfall => "L",
            RecordIdentifier::MinimumPressure => "P",
            RecordIdentifier::RapidChange => "R",
            RecordIdentifier::StatusChange => "S",
            RecordIdentifier::TrackDetail => "T",
            RecordIdentifier::MaximumWind => "W",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RecordIdentifier::ClosestApproach => "Closest approach to a coast",
            RecordIdentifier::Genesis => "Genesis",
            RecordIdentifier::IntensityPeak => "Intensity peak",
            RecordIdentifier::Landfall => "Landfall",
            RecordIdentifier::MinimumPressure => "Minimum central pressure",
            RecordIdentifier::RapidChange => "Rapid intensity change",
            RecordIdentifier::StatusChange => "Change of status",
            RecordIdentifier::TrackDetail => "Additional track detail",
            RecordIdentifier::MaximumWind => "Maximum sustained wind",
        }
    }

    fn ordinal(&self) -> u8 {
        *self as u8
    }
}

/// System status in column 4, ordered weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StormStatus {
    Disturbance = 1,
    TropicalWave = 2,
    Low = 3,
    Extratropical = 4,
    SubtropicalDepression = 5,
    TropicalDepression = 6,
    SubtropicalStorm = 7,
    TropicalStorm = 8,
    Hurricane = 9,
}

impl CodeTable for StormStatus {
    const ALL: &'static [Self] = &[
        StormStatus::Disturbance,
        StormStatus::TropicalWave,
        StormStatus::Low,
        StormStatus::Extratropical,
        StormStatus::SubtropicalDepression,
        StormStatus::TropicalDepression,
        StormStatus::SubtropicalStorm,
        StormStatus::TropicalStorm,
        StormStatus::Hurricane,
    ];

    fn code(&self) -> &'static str {
        match self {
            StormStatus::Disturbance => "DB",
            StormStatus::TropicalWave => "WV",
            StormStatus::Low => "LO",
            StormStatus::Extratropical => "EX",
            StormStatus::SubtropicalDepression => "SD",
            StormStatus::TropicalDepression => "TD",
            StormStatus::SubtropicalStorm => "SS",
            StormStatus::TropicalStorm => "TS",
            StormStatus::Hurricane => "HU",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StormStatus::Disturbance => "Disturbance",
            StormStatus::TropicalWave => "Tropical wave",
            StormStatus::Low => "Low",
            StormStatus::Extratropical => "Extratropical cyclone",
            StormStatus::SubtropicalDepression => "Subtropical depression",
            StormStatus::TropicalDepression => "Tropical depression",
            StormStatus::SubtropicalStorm => "Subtropical storm",
            StormStatus::TropicalStorm => "Tropical storm",
            StormStatus::Hurricane => "Hurricane",
        }
    }

    fn ordinal(&self) -> u8 {
        *self as u8
    }
}

/// Saffir-Simpson category, derived from wind speed in mph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntensityCategory {
    Category1 = 1,
    Category2 = 2,
    Category3 = 3,
    Category4 = 4,
    Category5 = 5,
}

impl IntensityCategory {
    /// Category for a sustained wind in mph; `None` below hurricane strength
    pub fn from_wind_mph(wind: f64) -> Option<Self> {
        if wind >= 157.0 {
            Some(IntensityCategory::Category5)
        } else if wind >= 130.0 {
            Some(IntensityCategory::Category4)
        } else if wind >= 111.0 {
            Some(IntensityCategory::Category3)
        } else if wind >= 96.0 {
            Some(IntensityCategory::Category2)
        } else if wind >= 74.0 {
            Some(IntensityCategory::Category1)
        } else {
            None
        }
    }
}

impl CodeTable for IntensityCategory {
    const ALL: &'static [Self] = &[
        IntensityCategory::Category1,
        IntensityCategory::Category2,
        IntensityCategory::Category3,
        IntensityCategory::Category4,
        IntensityCategory::Category5,
    ];

    fn code(&self) -> &'static str {
        match self {
            IntensityCategory::Category1 => "1",
            IntensityCategory::Category2 => "2",
            IntensityCategory::Category3 => "3",
            IntensityCategory::Category4 => "4",
            IntensityCategory::Category5 => "5",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IntensityCategory::Category1 => "Category 1",
            IntensityCategory::Category2 => "Category 2",
            IntensityCategory::Category3 => "Category 3",
            IntensityCategory::Category4 => "Category 4",
            IntensityCategory::Category5 => "Category 5",
        }
    }

    fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for StormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}
