//! AND composition: stop only when every wrapped stopper agrees.

use super::Stopper;
use crate::error::{Error, Result};
use crate::report::Report;
use crate::types::TrialId;

/// Stop a trial (or the experiment) only if all wrapped stoppers say so.
///
/// Every child is consulted on every report, even after one of them has
/// already declined, so each child's per-trial epoch counter stays in step
/// with the report stream.
///
/// An `AndStopper` with no children follows the all-of-nothing convention
/// and stops every trial on its first report. Add a
/// [`NopStopper`](super::NopStopper) if an empty combination must never stop.
///
/// # Examples
///
/// ```
/// use tune_stoppers::stopper::{AndStopper, NoImprovementStopper, Stopper, ThresholdStopper};
///
/// let plateau: NoImprovementStopper = NoImprovementStopper::builder("acc")
///     .patience(2)
///     .grace_period(0)
///     .build()
///     .unwrap();
/// let stopper: AndStopper = AndStopper::default()
///     .with(plateau)
///     .with(ThresholdStopper::new("acc").threshold(1, 0.9));
///
/// // Stops only once accuracy has both plateaued and stayed below 0.9.
/// assert!(!stopper.should_stop(&0, &[("acc", 0.5)]).unwrap());
/// assert!(!stopper.should_stop(&0, &[("acc", 0.5)]).unwrap());
/// assert!(stopper.should_stop(&0, &[("acc", 0.5)]).unwrap());
/// ```
pub struct AndStopper<K = TrialId> {
    stoppers: Vec<Box<dyn Stopper<K>>>,
}

impl<K> AndStopper<K> {
    /// Combine `stoppers`, consulted in order.
    #[must_use]
    pub fn new(stoppers: Vec<Box<dyn Stopper<K>>>) -> Self {
        Self { stoppers }
    }

    /// Append a stopper.
    #[must_use]
    pub fn with(mut self, stopper: impl Stopper<K> + 'static) -> Self {
        self.push(stopper);
        self
    }

    /// Append a stopper in place.
    pub fn push(&mut self, stopper: impl Stopper<K> + 'static) {
        self.stoppers.push(Box::new(stopper));
    }

    /// Number of wrapped stoppers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stoppers.len()
    }

    /// Returns `true` if no stoppers are wrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stoppers.is_empty()
    }
}

impl<K> Default for AndStopper<K> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K> FromIterator<Box<dyn Stopper<K>>> for AndStopper<K> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Stopper<K>>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<K> Stopper<K> for AndStopper<K> {
    /// # Errors
    ///
    /// Returns the first child error. Children after the failing one are
    /// still consulted.
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        let mut all = true;
        let mut first_error: Option<Error> = None;
        for stopper in &self.stoppers {
            match stopper.should_stop(trial, result) {
                Ok(stop) => all &= stop,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(all),
        }
    }

    fn stop_all(&self) -> bool {
        self.stoppers.iter().all(|stopper| stopper.as_ref().stop_all())
    }
}
