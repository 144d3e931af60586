//! Read access to the metrics a host reports for one epoch of a trial.

use core::hash::BuildHasher;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// A single epoch's results, looked up by metric name.
///
/// Implemented for the usual string-keyed maps, for `(name, value)` slices
/// and arrays, and with the `serde` feature for JSON objects.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use tune_stoppers::Report;
///
/// let mut result = HashMap::new();
/// result.insert("loss".to_string(), 0.25);
/// assert_eq!(result.metric("loss"), Some(0.25));
/// assert_eq!([("acc", 0.9)].metric("loss"), None);
/// ```
pub trait Report {
    /// The value reported for `name`, if any.
    fn metric(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Report for HashMap<String, f64, S> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> Report for HashMap<&str, f64, S> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Report for BTreeMap<String, f64> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Report for [(&str, f64)] {
    fn metric(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| *key == name).map(|&(_, value)| value)
    }
}

impl<const N: usize> Report for [(&str, f64); N] {
    fn metric(&self, name: &str) -> Option<f64> {
        self.as_slice().metric(name)
    }
}

impl Report for Vec<(String, f64)> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| key == name).map(|&(_, value)| value)
    }
}

impl<R: Report + ?Sized> Report for &R {
    fn metric(&self, name: &str) -> Option<f64> {
        (**self).metric(name)
    }
}

#[cfg(feature = "serde")]
impl Report for serde_json::Map<String, serde_json::Value> {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(serde_json::Value::as_f64)
    }
}

#[cfg(feature = "serde")]
impl Report for serde_json::Value {
    fn metric(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(serde_json::Value::as_f64)
    }
}

/// Look up `metric`, failing with [`Error::MissingMetric`] if it is absent.
pub(crate) fn require(result: &dyn Report, metric: &str) -> Result<f64> {
    result.metric(metric).ok_or_else(|| Error::MissingMetric {
        metric: metric.to_owned(),
    })
}
