use core::fmt::Debug;

use super::Stopper;
use crate::error::Result;
use crate::report::Report;

/// Wraps a stopper and logs every decision to stop.
///
/// Decisions pass through unchanged. With the `tracing` feature enabled, an
/// `info` event carrying the label and trial key is emitted whenever the
/// inner stopper stops a trial or the experiment; without it this wrapper
/// only forwards.
///
/// # Examples
///
/// ```
/// use tune_stoppers::stopper::{LoggedStopper, Stopper, ThresholdStopper};
///
/// let inner: ThresholdStopper = ThresholdStopper::new("loss").threshold(1, 0.0);
/// let stopper = LoggedStopper::new("positive-loss", inner);
/// assert!(stopper.should_stop(&0, &[("loss", -1.0)]).unwrap());
/// ```
pub struct LoggedStopper<S> {
    label: String,
    inner: S,
}

impl<S> LoggedStopper<S> {
    /// Wrap `inner`, tagging its log events with `label`.
    #[must_use]
    pub fn new(label: impl Into<String>, inner: S) -> Self {
        Self {
            label: label.into(),
            inner,
        }
    }

    /// The label attached to log events.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The wrapped stopper.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner stopper.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<K: Debug, S: Stopper<K>> Stopper<K> for LoggedStopper<S> {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        let stop = match self.inner.should_stop(trial, result) {
            Ok(stop) => stop,
            Err(e) => {
                trace_debug!(stopper = %self.label, ?trial, error = %e, "stopper failed");
                return Err(e);
            }
        };
        if stop {
            trace_info!(stopper = %self.label, ?trial, "trial stopped");
        }
        Ok(stop)
    }

    fn stop_all(&self) -> bool {
        let stop = self.inner.stop_all();
        if stop {
            trace_info!(stopper = %self.label, "experiment stopped");
        }
        stop
    }
}
