//! Per-cutoff accuracy report.

use crate::error::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Metric name reported for cutoff `k`.
pub fn metric_name(k: usize) -> String {
    format!("top_{}_categorical_accuracy", k)
}

/// Accuracy per cutoff, in the order the cutoffs were configured.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyResult {
    entries: Vec<(usize, f64)>,
}

impl AccuracyResult {
    pub(crate) fn new(entries: Vec<(usize, f64)>) -> Self {
        Self { entries }
    }

    /// Accuracy for cutoff `k`, if it was configured.
    pub fn get(&self, k: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|(cutoff, _)| *cutoff == k)
            .map(|(_, value)| *value)
    }

    /// `(k, accuracy)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Accuracies in configured order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object mapping metric name to accuracy.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for AccuracyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, value) in &self.entries {
            map.serialize_entry(&metric_name(*k), value)?;
        }
        map.end()
    }
}
