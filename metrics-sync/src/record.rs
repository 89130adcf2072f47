//! Loosely-typed metric record as it appears in the feed

use metrics_common::db::ConfusionMatrix;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One element of the feed array
///
/// Keys are all optional. Elements that are not JSON objects decode as an empty
/// record, so every field falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct MetricRecord {
    fields: Map<String, Value>,
}

impl From<Value> for MetricRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl MetricRecord {
    /// Read a metric as a plain float
    ///
    /// JSON numbers are used directly and numeric strings ("0.93") are parsed.
    /// Null, booleans, containers and unparseable strings count as absent.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Read a text field
    ///
    /// Returns `Some(default)` when the key is absent and `None` when it is present
    /// but null. Non-string scalars are rendered as their JSON text.
    pub fn text(&self, key: &str, default: &str) -> Option<String> {
        match self.fields.get(key) {
            None => Some(default.to_string()),
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Explicit confusion matrix, if complete
    ///
    /// Requires an object with all of `tn`, `fp`, `fn`, `tp`, each a non-negative
    /// integer (integral floats such as `12.0` are accepted).
    pub fn confusion_matrix(&self) -> Option<ConfusionMatrix> {
        let matrix = self.fields.get("confusion_matrix")?.as_object()?;
        Some(ConfusionMatrix {
            tn: cell(matrix, "tn")?,
            fp: cell(matrix, "fp")?,
            fn_: cell(matrix, "fn")?,
            tp: cell(matrix, "tp")?,
        })
    }
}

fn cell(matrix: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = matrix.get(key)?;
    if let Some(n) = value.as_i64() {
        return (n >= 0).then_some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64).then(|| f as i64)
}
