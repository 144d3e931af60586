//! Stopper trait and implementations for early trial termination.
//!
//! A stopper is asked after every reported epoch whether a trial should be
//! stopped now, and separately whether the whole experiment should stop.
//! Stateful stoppers keep one small record per trial key, created on the
//! first report for that key.
//!
//! | Stopper | Stops a trial when |
//! |---------|--------------------|
//! | [`NoImprovementStopper`] | the metric has not improved by a relative margin for `patience` reports |
//! | [`ThresholdStopper`] | the metric fails to clear the threshold configured for the current epoch |
//! | [`AndStopper`] | every wrapped stopper agrees |
//! | [`NopStopper`] | never |
//!
//! [`LoggedStopper`] wraps any stopper and emits a log event for each
//! positive decision.

mod and;
mod logged;
mod no_improvement;
mod nop;
mod threshold;

use std::sync::Arc;

pub use and::AndStopper;
pub use logged::LoggedStopper;
pub use no_improvement::{
    NoImprovementState, NoImprovementStopper, NoImprovementStopperBuilder, improvement_ratio,
};
pub use nop::NopStopper;
pub use threshold::ThresholdStopper;

use crate::error::Result;
use crate::report::Report;
use crate::types::TrialId;

/// Trait for pluggable early-stopping policies.
///
/// The host calls [`should_stop`](Stopper::should_stop) once per epoch per
/// trial, in epoch order, and [`stop_all`](Stopper::stop_all) whenever it
/// wants to know whether to end the experiment. The trait requires
/// `Send + Sync` so one instance can be shared by every trial's reporting
/// path.
///
/// # Implementing a custom stopper
///
/// ```
/// use tune_stoppers::stopper::Stopper;
/// use tune_stoppers::{Report, Result};
///
/// struct StopOnNan;
///
/// impl Stopper for StopOnNan {
///     fn should_stop(&self, _trial: &u64, result: &dyn Report) -> Result<bool> {
///         Ok(result.metric("loss").is_some_and(f64::is_nan))
///     }
/// }
///
/// assert!(StopOnNan.should_stop(&0, &[("loss", f64::NAN)]).unwrap());
/// assert!(!StopOnNan.stop_all());
/// ```
pub trait Stopper<K = TrialId>: Send + Sync {
    /// Decide whether `trial` should stop after reporting `result`.
    ///
    /// Each call advances the stopper's epoch counter for `trial`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMetric`](crate::Error::MissingMetric) if the
    /// tracked metric is absent from `result`, or a configuration error if a
    /// parameter cannot be resolved for the current epoch.
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool>;

    /// Decide whether the entire experiment should stop.
    ///
    /// Never touches per-trial state. The default never stops.
    fn stop_all(&self) -> bool {
        false
    }
}

impl<K, S: Stopper<K> + ?Sized> Stopper<K> for Box<S> {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        (**self).should_stop(trial, result)
    }

    fn stop_all(&self) -> bool {
        (**self).stop_all()
    }
}

impl<K, S: Stopper<K> + ?Sized> Stopper<K> for Arc<S> {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        (**self).should_stop(trial, result)
    }

    fn stop_all(&self) -> bool {
        (**self).stop_all()
    }
}

impl<K, S: Stopper<K> + ?Sized> Stopper<K> for &S {
    fn should_stop(&self, trial: &K, result: &dyn Report) -> Result<bool> {
        (**self).should_stop(trial, result)
    }

    fn stop_all(&self) -> bool {
        (**self).stop_all()
    }
}
