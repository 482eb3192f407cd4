pub mod codes;
pub mod line;
pub mod observation;
pub mod storm_month;

pub use codes::{CodeTable, IntensityCategory, RecordIdentifier, StormStatus};
pub use line::{HeaderDescriptor, RawLine, TaggedLine};
pub use observation::{Observation, QuadrantRadii, WindRadii, YearMonth};
pub use storm_month::StormMonth;
