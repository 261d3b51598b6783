pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;
pub mod settings;

pub use constants::*;
pub use coordinates::{decimal_to_dms, dms_to_decimal, parse_coordinate, validate_coordinates};
pub use filename::{ensure_jpg_extension, RunFileNames};
pub use progress::ProgressReporter;
pub use settings::Settings;
