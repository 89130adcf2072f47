//! Database models

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};

/// 2x2 confusion matrix cell counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: i64,
    pub fp: i64,
    #[serde(rename = "fn")]
    pub fn_: i64,
    pub tp: i64,
}

impl ConfusionMatrix {
    pub fn total(&self) -> i64 {
        self.tn + self.fp + self.fn_ + self.tp
    }
}

/// One row of the `metrics` table
///
/// Every field is populated: scalar metrics carry the 0.0001 sentinel instead of
/// null/zero/NaN and text columns carry "N/A" instead of null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedMetric {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub tn: i64,
    pub fp: i64,
    #[serde(rename = "fn")]
    pub fn_: i64,
    pub tp: i64,
    pub model_version: String,
    pub model_type: String,
    pub timestamp: String,
}

impl PersistedMetric {
    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        ConfusionMatrix {
            tn: self.tn,
            fp: self.fp,
            fn_: self.fn_,
            tp: self.tp,
        }
    }

    /// Decode a row selected with [`METRIC_COLUMNS`]
    pub fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            accuracy: row.try_get("accuracy")?,
            precision: row.try_get("precision")?,
            recall: row.try_get("recall")?,
            f1_score: row.try_get("f1_score")?,
            tn: row.try_get("tn")?,
            fp: row.try_get("fp")?,
            fn_: row.try_get("fn")?,
            tp: row.try_get("tp")?,
            model_version: row.try_get("model_version")?,
            model_type: row.try_get("model_type")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}

/// Column list of the `metrics` table, in insert order
pub const METRIC_COLUMNS: &str =
    "accuracy, precision, recall, f1_score, tn, fp, fn, tp, model_version, model_type, timestamp";
