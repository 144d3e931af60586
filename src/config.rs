//! Declarative stopper configuration.
//!
//! A [`StopperConfig`] describes a tree of stoppers as plain data, so an
//! experiment's stopping policy can live next to the rest of its settings.
//! It is internally tagged by `"type"`:
//!
//! ```
//! use tune_stoppers::config::StopperConfig;
//! use tune_stoppers::stopper::Stopper;
//!
//! let config = StopperConfig::from_json(
//!     r#"{
//!         "type": "and",
//!         "stoppers": [
//!             { "type": "no_improvement", "metric": "loss", "mode": "min", "patience": { "0": 6, "20": 3 } },
//!             { "type": "threshold", "metric": "loss", "mode": "min", "thresholds": { "5": 1.0 } }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let stopper = config.build::<u64>().unwrap();
//! assert!(!stopper.should_stop(&0, &[("loss", 2.0)]).unwrap());
//! ```
//!
//! Omitted fields take the same defaults as the builders. Building runs the
//! same validation, so an invalid patience is rejected by
//! [`build`](StopperConfig::build).

use core::fmt::Debug;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quantity::EpochQuantity;
use crate::stopper::{
    AndStopper, LoggedStopper, NoImprovementStopperBuilder, NopStopper, Stopper, ThresholdStopper,
};
use crate::types::{Mode, TrialKey};

/// A serializable description of a stopper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopperConfig {
    /// A [`NoImprovementStopper`](crate::stopper::NoImprovementStopper).
    NoImprovement {
        /// The metric to track.
        metric: String,
        /// Relative change required for an improvement.
        #[serde(default = "default_rel_change_threshold")]
        rel_change_threshold: EpochQuantity<f64>,
        /// Whether higher or lower values are better.
        #[serde(default)]
        mode: Mode,
        /// Consecutive non-improving reports tolerated.
        #[serde(default = "default_patience")]
        patience: EpochQuantity<u64>,
        /// Reports during which stopping is suppressed.
        #[serde(default = "default_grace_period")]
        grace_period: u64,
    },
    /// A [`ThresholdStopper`].
    Threshold {
        /// The metric to track.
        metric: String,
        /// Epoch schedule of thresholds; absent means never stop.
        #[serde(default)]
        thresholds: Option<EpochQuantity<f64>>,
        /// Whether higher or lower values are better.
        #[serde(default)]
        mode: Mode,
    },
    /// An [`AndStopper`] over nested configurations.
    And {
        /// The combined stoppers, consulted in order.
        stoppers: Vec<StopperConfig>,
    },
    /// A [`NopStopper`].
    Nop,
    /// A [`LoggedStopper`] around a nested configuration.
    Logged {
        /// Label attached to log events.
        label: String,
        /// The wrapped configuration.
        stopper: Box<StopperConfig>,
    },
}

fn default_rel_change_threshold() -> EpochQuantity<f64> {
    EpochQuantity::Constant(0.01)
}

fn default_patience() -> EpochQuantity<u64> {
    EpochQuantity::Constant(6)
}

fn default_grace_period() -> u64 {
    4
}

impl StopperConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `json` is malformed or describes an
    /// unknown stopper, mode or breakpoint.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Build the described stopper for trial keys of type `K`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPatience`] if any nested no-improvement
    /// stopper has a patience below 1.
    pub fn build<K: TrialKey + Debug + 'static>(&self) -> Result<Box<dyn Stopper<K>>> {
        let stopper: Box<dyn Stopper<K>> = match self {
            Self::NoImprovement {
                metric,
                rel_change_threshold,
                mode,
                patience,
                grace_period,
            } => Box::new(
                NoImprovementStopperBuilder::new(metric.clone())
                    .rel_change_threshold(rel_change_threshold.clone())
                    .mode(*mode)
                    .patience(patience.clone())
                    .grace_period(*grace_period)
                    .build::<K>()?,
            ),
            Self::Threshold {
                metric,
                thresholds,
                mode,
            } => Box::new(
                ThresholdStopper::<K>::new(metric.clone())
                    .thresholds(thresholds.clone())
                    .mode(*mode),
            ),
            Self::And { stoppers } => Box::new(
                stoppers
                    .iter()
                    .map(StopperConfig::build::<K>)
                    .collect::<Result<AndStopper<K>>>()?,
            ),
            Self::Nop => Box::new(NopStopper),
            Self::Logged { label, stopper } => {
                Box::new(LoggedStopper::new(label.clone(), stopper.build::<K>()?))
            }
        };
        Ok(stopper)
    }
}

impl FromStr for StopperConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}
