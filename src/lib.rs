#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Early-stopping policies for iterative experiment trials such as
//! hyperparameter-search runs. A host reports each trial's metrics once per
//! epoch and asks a [`Stopper`](stopper::Stopper) whether that trial, or the
//! whole experiment, should end now.
//!
//! # Getting Started
//!
//! ```
//! use tune_stoppers::prelude::*;
//!
//! let stopper: NoImprovementStopper = NoImprovementStopper::builder("loss")
//!     .mode(Mode::Min)
//!     .patience(2)
//!     .grace_period(0)
//!     .build()
//!     .unwrap();
//!
//! let losses = [1.0, 0.5, 0.499, 0.498];
//! let stopped_at = losses
//!     .iter()
//!     .position(|&loss| stopper.should_stop(&7, &[("loss", loss)]).unwrap());
//! assert_eq!(stopped_at, Some(3));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Stopper`](stopper::Stopper) | The two questions a host asks: stop this trial? stop everything? |
//! | [`Report`] | One epoch's metrics for a trial, looked up by name. |
//! | [`EpochQuantity`] | A parameter that is constant or changes at epoch breakpoints. |
//! | [`Mode`] | Whether higher or lower metric values are better. |
//! | [`TrialKey`] | Any hashable value identifying a trial; [`TrialId`] by default. |
//!
//! # Stoppers
//!
//! | Stopper | Stops a trial when |
//! |---------|--------------------|
//! | [`NoImprovementStopper`](stopper::NoImprovementStopper) | no relative improvement on the best value for `patience` reports |
//! | [`ThresholdStopper`](stopper::ThresholdStopper) | the metric misses the threshold set for the current epoch |
//! | [`AndStopper`](stopper::AndStopper) | all wrapped stoppers agree |
//! | [`NopStopper`](stopper::NopStopper) | never |
//! | [`LoggedStopper`](stopper::LoggedStopper) | the wrapped stopper does, logging the decision |
//!
//! Epochs are counted by the stopper itself: the first report for a trial is
//! epoch 1, the next epoch 2, and so on.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on [`Mode`] and [`EpochQuantity`], JSON [`config::StopperConfig`], [`Report`] for JSON objects | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) when trials are stopped | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "serde")]
pub mod config;
mod error;
mod quantity;
mod report;
pub mod stopper;
mod types;

pub use error::{Error, Result};
pub use quantity::EpochQuantity;
pub use report::Report;
pub use types::{Mode, TrialId, TrialKey};

/// The crate version, as recorded in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tune_stoppers::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "serde")]
    pub use crate::config::StopperConfig;
    pub use crate::error::{Error, Result};
    pub use crate::quantity::EpochQuantity;
    pub use crate::report::Report;
    pub use crate::stopper::{
        AndStopper, LoggedStopper, NoImprovementStopper, NopStopper, Stopper, ThresholdStopper,
    };
    pub use crate::types::{Mode, TrialId, TrialKey};
}
