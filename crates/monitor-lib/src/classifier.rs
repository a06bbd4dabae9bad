//! Threshold classification of CPU readings

use crate::models::{Classification, Reading, Status};

/// Classify a reading against a threshold
///
/// A reading is `HIGH`, and raises an alert, only when it is strictly above
/// the threshold. A reading equal to the threshold is `NORMAL`, as is a NaN
/// reading since it never compares greater.
pub fn classify(reading: Reading, threshold: f64) -> Classification {
    let is_alert = reading.percent() > threshold;
    let status = if is_alert { Status::High } else { Status::Normal };

    Classification { status, is_alert }
}
