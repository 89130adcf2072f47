//! Approximate confusion matrix estimation
//!
//! Derives a 2x2 matrix from accuracy and precision alone, assuming a balanced
//! 50/50 class split. The result is a display approximation for records that
//! arrive without an explicit matrix; it is never a measurement.

use metrics_common::db::ConfusionMatrix;
use tracing::debug;

/// Number of samples the estimated cells are spread over
pub const DEFAULT_TOTAL: u32 = 100;

/// Returned whenever an input is missing or the arithmetic is unusable
pub const FALLBACK_MATRIX: ConfusionMatrix = ConfusionMatrix {
    tn: 40,
    fp: 10,
    fn_: 5,
    tp: 45,
};

const CLAMP_MIN: f64 = 0.01;
const CLAMP_MAX: f64 = 0.99;

/// Estimate cell counts over `total` samples
///
/// Accuracy and precision are clamped into [0.01, 0.99] first, infinities
/// included. A missing or NaN input yields [`FALLBACK_MATRIX`]. Never fails.
pub fn estimate(accuracy: Option<f64>, precision: Option<f64>, total: u32) -> ConfusionMatrix {
    match try_estimate(accuracy, precision, total) {
        Some(matrix) => matrix,
        None => {
            debug!(?accuracy, ?precision, "Using fallback confusion matrix");
            FALLBACK_MATRIX
        }
    }
}

/// [`estimate`] over [`DEFAULT_TOTAL`] samples
pub fn estimate_default(accuracy: Option<f64>, precision: Option<f64>) -> ConfusionMatrix {
    estimate(accuracy, precision, DEFAULT_TOTAL)
}

fn try_estimate(accuracy: Option<f64>, precision: Option<f64>, total: u32) -> Option<ConfusionMatrix> {
    let accuracy = accuracy.filter(|v| !v.is_nan())?.clamp(CLAMP_MIN, CLAMP_MAX);
    let precision = precision.filter(|v| !v.is_nan())?.clamp(CLAMP_MIN, CLAMP_MAX);

    let total_f = f64::from(total);
    let tp = (total_f * precision * accuracy).floor() as i64;
    let fp = (total_f * (1.0 - precision) * (1.0 - accuracy)).floor() as i64;
    let fn_ = (total_f * (1.0 - accuracy) * precision).floor() as i64;
    let tn = i64::from(total).checked_sub(tp.checked_add(fp)?.checked_add(fn_)?)?;

    Some(ConfusionMatrix {
        tn: tn.max(0),
        fp: fp.max(0),
        fn_: fn_.max(0),
        tp: tp.max(0),
    })
}
