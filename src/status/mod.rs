//! Status snapshot derived from the latest sensor readings.
//!
//! Computation is split into a typed step ([`SensorStatus::from_readings`])
//! that applies the defaulting and detection rules, and a rendering step
//! ([`SensorStatus::render`]) that turns it into the dashboard's text labels.

pub mod labels;
pub mod snapshot;

pub use labels::{Labels, Locale};
pub use snapshot::{
    DISTANCE_THRESHOLD_CM, PLACEHOLDER, SensorStatus, StatusSnapshot, compute_snapshot,
};
