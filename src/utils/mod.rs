pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::{decode_coordinate, split_coordinate, Hemisphere};
pub use progress::ProgressReporter;
