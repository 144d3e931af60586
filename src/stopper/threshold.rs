//! Threshold stopper: stop trials that miss a per-epoch target.
//!
//! Thresholds are given as an epoch schedule. The first report of a trial is
//! epoch 1; at each epoch the threshold of the latest breakpoint at or below
//! it applies, and epochs before the first breakpoint are unconstrained.
//!
//! # Example
//!
//! ```
//! use tune_stoppers::Mode;
//! use tune_stoppers::stopper::{Stopper, ThresholdStopper};
//!
//! // From the third report on, accuracy must stay above 0.5.
//! let stopper: ThresholdStopper = ThresholdStopper::new("acc").threshold(3, 0.5);
//!
//! assert!(!stopper.should_stop(&0, &[("acc", 0.1)]).unwrap());
//! assert!(!stopper.should_stop(&0, &[("acc", 0.2)]).unwrap());
//! assert!(stopper.should_stop(&0, &[("acc", 0.3)]).unwrap());
//! ```

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use super::Stopper;
use crate::error::Result;
use crate::quantity::EpochQuantity;
use crate::report::{self, Report};
use crate::types::{Mode, TrialId, TrialKey};

/// Stop a trial as soon as its metric fails to clear the threshold in
/// effect for the current epoch.
///
/// In max mode the metric must be strictly greater than the threshold, in
/// min mode strictly less. A NaN threshold means no threshold is active.
/// Without thresholds the stopper never stops.
pub struct ThresholdStopper<K = TrialId> {
    metric: String,
    thresholds: Option<EpochQuantity<f64>>,
    mode: Mode,
    epochs: Mutex<HashMap<K, u64>>,
}

impl<K> ThresholdStopper<K> {
    /// Create a stopper for `metric` with no thresholds, in max mode.
    #[must_use]
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            thresholds: None,
            mode: Mode::Max,
            epochs: Mutex::new(HashMap::new()),
        }
    }

    /// Replace all thresholds. `None` disables the stopper.
    #[must_use]
    pub fn thresholds(mut self, thresholds: impl Into<Option<EpochQuantity<f64>>>) -> Self {
        self.thresholds = thresholds.into();
        self
    }

    /// Require the metric to clear `threshold` from `epoch` on.
    ///
    /// A previously set constant threshold is discarded.
    #[must_use]
    pub fn threshold(mut self, epoch: u64, threshold: f64) -> Self {
        let mut breakpoints = match self.thresholds.take() {
            Some(EpochQuantity::Schedule(breakpoints)) => breakpoints,
            _ => BTreeMap::new(),
        };
        breakpoints.insert(epoch, threshold);
        self.thresholds = Some(EpochQuantity::Schedule(breakpoints));
        self
    }

    /// Set whether higher or lower values are better.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The name of the tracked metric.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// The threshold in effect at `epoch`, or NaN if none is.
    #[must_use]
    pub fn threshold_at(&self, epoch: u64) -> f64 {
        self.thresholds
            .as_ref()
            .and_then(|q| q.resolve(epoch, Some(f64::NAN)).ok())
            .unwrap_or(f64::NAN)
    }

    fn decide(&self, epoch: u64, result: &dyn Report) -> Result<bool> {
        let threshold = self.threshold_at(epoch);
        if threshold.is_nan() {
            return Ok(false);
        }
        let value = report::require(result, &self.metric)?;
        let stop = !self.mode.is_better(value, threshold);
        if stop {
            trace_debug!(metric = %self.metric, epoch, value, threshold, "threshold not cleared");
        }
        Ok(stop)
    }
}

impl<K: TrialKey> ThresholdStopper<K> {
    /// Number of reports seen for `trial`.
    #[must_use]
    pub fn epoch(&self, trial: &K) -> u64 {
        self.epochs.lock().get(trial).copied().unwrap_or(0)
    }
}

impl<K: TrialKey> Stopper<K> for ThresholdStopper<K> {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        let epoch = {
            let mut epochs = self.epochs.lock();
            let epoch = epochs.entry(trial.clone()).or_insert(0);
            *epoch += 1;
            *epoch
        };
        self.decide(epoch, result)
    }
}
