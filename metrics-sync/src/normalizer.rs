//! Record normalization
//!
//! Maps one loosely-structured [`MetricRecord`] onto the fixed
//! [`PersistedMetric`] row shape, repairing missing or invalid fields.

use chrono::NaiveDateTime;
use metrics_common::db::PersistedMetric;
use metrics_common::time::{format_record_timestamp, local_now};

use crate::confusion;
use crate::record::MetricRecord;
use crate::sanitizer::{sanitize_numeric, sanitize_text};

pub const DEFAULT_MODEL_VERSION: &str = "v1.0";
pub const DEFAULT_MODEL_TYPE: &str = "SVC";

/// Normalize a record, defaulting its timestamp to the current local time
pub fn normalize(record: &MetricRecord) -> PersistedMetric {
    normalize_at(record, local_now())
}

/// Normalize a record, defaulting its timestamp to `now`
///
/// An explicit, complete confusion matrix always wins. Otherwise the matrix is
/// estimated from the raw accuracy/precision (before sentinel substitution), so a
/// missing metric yields the fixed fallback matrix rather than an estimate built
/// on the sentinel.
pub fn normalize_at(record: &MetricRecord, now: NaiveDateTime) -> PersistedMetric {
    let raw_accuracy = record.numeric("accuracy");
    let raw_precision = record.numeric("precision");

    let matrix = record
        .confusion_matrix()
        .unwrap_or_else(|| confusion::estimate_default(raw_accuracy, raw_precision));

    PersistedMetric {
        accuracy: sanitize_numeric(raw_accuracy),
        precision: sanitize_numeric(raw_precision),
        recall: sanitize_numeric(record.numeric("recall")),
        f1_score: sanitize_numeric(record.numeric("f1_score")),
        tn: matrix.tn,
        fp: matrix.fp,
        fn_: matrix.fn_,
        tp: matrix.tp,
        model_version: sanitize_text(record.text("model_version", DEFAULT_MODEL_VERSION)),
        model_type: sanitize_text(record.text("model_type", DEFAULT_MODEL_TYPE)),
        timestamp: sanitize_text(record.text("timestamp", &format_record_timestamp(&now))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confusion::{estimate_default, FALLBACK_MATRIX};
    use crate::sanitizer::NUMERIC_SENTINEL;
    use chrono::NaiveDate;
    use metrics_common::db::ConfusionMatrix;
    use serde_json::json;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn normalize_json(value: serde_json::Value) -> PersistedMetric {
        normalize_at(&MetricRecord::from(value), fixed_now())
    }

    #[test]
    fn test_explicit_matrix_wins_over_estimation() {
        let m = normalize_json(json!({
            "accuracy": 0.9,
            "precision": 0.8,
            "confusion_matrix": {"tn": 1, "fp": 2, "fn": 3, "tp": 4}
        }));

        assert_eq!(m.confusion_matrix(), ConfusionMatrix { tn: 1, fp: 2, fn_: 3, tp: 4 });
        assert_eq!(m.accuracy, 0.9);
        assert_eq!(m.precision, 0.8);
    }

    #[test]
    fn test_zero_accuracy_gets_sentinel_and_clamped_estimate() {
        let m = normalize_json(json!({"accuracy": 0, "precision": 0.8}));

        assert_eq!(m.accuracy, NUMERIC_SENTINEL);
        assert_eq!(m.precision, 0.8);
        assert_eq!(m.confusion_matrix(), estimate_default(Some(0.0), Some(0.8)));
        assert_eq!(m.confusion_matrix(), estimate_default(Some(0.01), Some(0.8)));
    }

    #[test]
    fn test_missing_metrics_use_fallback_matrix() {
        let m = normalize_json(json!({"precision": 0.8}));

        assert_eq!(m.accuracy, NUMERIC_SENTINEL);
        assert_eq!(m.recall, NUMERIC_SENTINEL);
        assert_eq!(m.f1_score, NUMERIC_SENTINEL);
        assert_eq!(m.confusion_matrix(), FALLBACK_MATRIX);
    }

    #[test]
    fn test_empty_record_defaults() {
        let m = normalize_json(json!({}));

        assert_eq!(m.model_version, "v1.0");
        assert_eq!(m.model_type, "SVC");
        assert_eq!(m.timestamp, "2024-05-17 14:30:00");
        assert_eq!(m.confusion_matrix(), FALLBACK_MATRIX);
    }

    #[test]
    fn test_null_strings_become_text_sentinel() {
        let m = normalize_json(json!({
            "model_version": null,
            "model_type": null,
            "timestamp": null
        }));

        assert_eq!(m.model_version, "N/A");
        assert_eq!(m.model_type, "N/A");
        assert_eq!(m.timestamp, "N/A");
    }

    #[test]
    fn test_explicit_strings_pass_through_unvalidated() {
        let m = normalize_json(json!({
            "model_version": "experimental build",
            "model_type": "LinearSVC",
            "timestamp": "yesterday"
        }));

        assert_eq!(m.model_version, "experimental build");
        assert_eq!(m.model_type, "LinearSVC");
        assert_eq!(m.timestamp, "yesterday");
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let m = normalize_json(json!({"accuracy": "0.91", "recall": "n/a"}));

        assert_eq!(m.accuracy, 0.91);
        assert_eq!(m.recall, NUMERIC_SENTINEL);
    }

    #[test]
    fn test_infinite_accuracy_string_is_clamped_for_estimate() {
        let m = normalize_json(json!({"accuracy": "inf", "precision": 0.8}));

        assert_eq!(m.confusion_matrix(), estimate_default(Some(0.99), Some(0.8)));
        assert_ne!(m.confusion_matrix(), FALLBACK_MATRIX);
    }

    #[test]
    fn test_incomplete_matrix_falls_back_to_estimate() {
        let m = normalize_json(json!({
            "accuracy": 0.5,
            "precision": 0.5,
            "confusion_matrix": {"tn": 1, "fp": 2}
        }));

        assert_eq!(m.confusion_matrix(), ConfusionMatrix { tn: 25, fp: 25, fn_: 25, tp: 25 });
    }

    #[test]
    fn test_default_timestamp_uses_record_format() {
        let m = normalize(&MetricRecord::default());
        assert!(
            NaiveDateTime::parse_from_str(&m.timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "unexpected timestamp {}",
            m.timestamp
        );
    }
}
