//! No-improvement stopper: stop a trial once its metric has plateaued.
//!
//! Unlike a plateau detector that looks at the spread of recent values, this
//! stopper only asks whether any report beat the trial's best value so far by
//! a relative margin. That makes it robust to metrics that oscillate without
//! converging.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `rel_change_threshold` | `0.01` | Relative change needed to count as an improvement; `0` accepts any change |
//! | `mode` | [`Mode::Max`] | Whether higher or lower values are better |
//! | `patience` | `6` | Consecutive non-improving reports after which the trial stops |
//! | `grace_period` | `4` | Reports during which stopping is suppressed |
//!
//! Both `rel_change_threshold` and `patience` accept an [`EpochQuantity`], so
//! they can tighten as training progresses.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::Stopper;
use crate::error::{Error, Result};
use crate::quantity::EpochQuantity;
use crate::report::{self, Report};
use crate::types::{Mode, TrialId, TrialKey};

/// Per-trial bookkeeping of a [`NoImprovementStopper`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoImprovementState {
    /// Number of reports seen for the trial.
    pub epoch: u64,
    /// Best metric value so far; `None` before the first report.
    pub best: Option<f64>,
    /// Consecutive reports without a sufficient improvement.
    pub stagnant: u64,
}

/// Relative change of `candidate` against `baseline`.
///
/// Returns `None` when `baseline` is zero, since the ratio is undefined;
/// callers treat that as "no improvement".
#[must_use]
pub fn improvement_ratio(candidate: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some(candidate / baseline)
    }
}

/// Stop a trial when no report improved on its best value for `patience`
/// consecutive reports.
///
/// A report counts as an improvement if `value / best` exceeds
/// `1 + rel_change_threshold` (max mode) or falls below
/// `1 - rel_change_threshold` (min mode). The first report of a trial only
/// records its value and never stops.
///
/// # Examples
///
/// ```
/// use tune_stoppers::Mode;
/// use tune_stoppers::stopper::{NoImprovementStopper, Stopper};
///
/// let stopper: NoImprovementStopper = NoImprovementStopper::builder("loss")
///     .mode(Mode::Max)
///     .rel_change_threshold(0.0)
///     .patience(3)
///     .grace_period(0)
///     .build()
///     .unwrap();
///
/// let decisions: Vec<bool> = [4.0, 3.0, 2.0, 1.0]
///     .into_iter()
///     .map(|loss| stopper.should_stop(&0, &[("loss", loss)]).unwrap())
///     .collect();
/// assert_eq!(decisions, [false, false, false, true]);
/// ```
pub struct NoImprovementStopper<K = TrialId> {
    metric: String,
    rel_change_threshold: EpochQuantity<f64>,
    mode: Mode,
    patience: EpochQuantity<u64>,
    grace_period: u64,
    trials: Mutex<HashMap<K, NoImprovementState>>,
}

impl NoImprovementStopper {
    /// Start configuring a stopper that tracks `metric`.
    #[must_use]
    pub fn builder(metric: impl Into<String>) -> NoImprovementStopperBuilder {
        NoImprovementStopperBuilder::new(metric)
    }
}

impl<K> NoImprovementStopper<K> {
    /// The name of the tracked metric.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// The comparison mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The configured patience.
    #[must_use]
    pub fn patience(&self) -> &EpochQuantity<u64> {
        &self.patience
    }

    /// The configured grace period.
    #[must_use]
    pub fn grace_period(&self) -> u64 {
        self.grace_period
    }

    /// Whether `candidate` improves on `baseline` at `epoch`.
    ///
    /// A zero baseline never improves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValueForEpoch`] if the relative change threshold
    /// has no value at `epoch`.
    pub fn is_better(&self, candidate: f64, baseline: f64, epoch: u64) -> Result<bool> {
        let Some(ratio) = improvement_ratio(candidate, baseline) else {
            return Ok(false);
        };
        let threshold = self.rel_change_threshold.resolve(epoch, None)?;
        Ok(match self.mode {
            Mode::Max => ratio > 1.0 + threshold,
            Mode::Min => ratio < 1.0 - threshold,
        })
    }
}

impl<K: TrialKey> NoImprovementStopper<K> {
    /// Snapshot of the bookkeeping for `trial`, or `None` if it has never
    /// been reported.
    #[must_use]
    pub fn state(&self, trial: &K) -> Option<NoImprovementState> {
        self.trials.lock().get(trial).copied()
    }

    /// Fold `value` into `state`, whose epoch has already been counted.
    fn advance(&self, state: NoImprovementState, value: f64) -> Result<(NoImprovementState, bool)> {
        let epoch = state.epoch;
        let mut next = state;

        let Some(best) = state.best else {
            next.best = Some(value);
            return Ok((next, false));
        };
        if self.is_better(value, best, epoch)? {
            next.best = Some(value);
            next.stagnant = 0;
            return Ok((next, false));
        }

        next.stagnant += 1;
        if epoch < self.grace_period {
            return Ok((next, false));
        }
        let patience = self.patience.resolve(epoch, None)?;
        Ok((next, next.stagnant >= patience))
    }
}

impl<K: TrialKey> Stopper<K> for NoImprovementStopper<K> {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        let mut trials = self.trials.lock();
        let state = trials.entry(trial.clone()).or_default();
        // Every report is an epoch, even one that fails below.
        state.epoch += 1;

        let value = report::require(result, &self.metric)?;
        let (next, stop) = self.advance(*state, value)?;
        *state = next;

        if stop {
            trace_debug!(
                metric = %self.metric,
                epoch = next.epoch,
                stagnant = next.stagnant,
                "no improvement within patience"
            );
        }
        Ok(stop)
    }
}

/// Builder for [`NoImprovementStopper`].
///
/// Validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct NoImprovementStopperBuilder {
    metric: String,
    rel_change_threshold: EpochQuantity<f64>,
    mode: Mode,
    patience: EpochQuantity<u64>,
    grace_period: u64,
}

impl NoImprovementStopperBuilder {
    /// Create a builder with the default configuration.
    #[must_use]
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            rel_change_threshold: EpochQuantity::Constant(0.01),
            mode: Mode::Max,
            patience: EpochQuantity::Constant(6),
            grace_period: 4,
        }
    }

    /// Set the relative change a report needs to count as an improvement.
    #[must_use]
    pub fn rel_change_threshold(mut self, threshold: impl Into<EpochQuantity<f64>>) -> Self {
        self.rel_change_threshold = threshold.into();
        self
    }

    /// Set whether higher or lower values are better.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of consecutive non-improving reports tolerated.
    #[must_use]
    pub fn patience(mut self, patience: impl Into<EpochQuantity<u64>>) -> Self {
        self.patience = patience.into();
        self
    }

    /// Set the number of reports during which stopping is suppressed.
    ///
    /// Stagnation still accumulates during the grace period.
    #[must_use]
    pub fn grace_period(mut self, grace_period: u64) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Validate the configuration and build the stopper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPatience`] if any configured patience is
    /// below 1, or if the patience schedule is empty.
    pub fn build<K>(self) -> Result<NoImprovementStopper<K>> {
        let min = self.patience.min_value().unwrap_or(0);
        if min < 1 {
            return Err(Error::InvalidPatience { min });
        }
        Ok(NoImprovementStopper {
            metric: self.metric,
            rel_change_threshold: self.rel_change_threshold,
            mode: self.mode,
            patience: self.patience,
            grace_period: self.grace_period,
            trials: Mutex::new(HashMap::new()),
        })
    }
}
