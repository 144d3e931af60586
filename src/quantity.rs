//! Configuration values that may change with the epoch.
//!
//! Many stopper parameters are either a single constant or a step function
//! over epochs: "patience 6 until epoch 20, then 3". [`EpochQuantity`]
//! models both and resolves the value in effect at a given epoch.
//!
//! # Resolution
//!
//! A schedule is right-continuous: the value at epoch `e` is the value of the
//! largest breakpoint `<= e`. Epochs below the smallest breakpoint have no
//! value; [`resolve`](EpochQuantity::resolve) then returns the caller's
//! fallback, or [`Error::NoValueForEpoch`] if there is none.
//!
//! ```
//! use tune_stoppers::EpochQuantity;
//!
//! let q: EpochQuantity<f64> = [(0, 0.1), (5, 0.05), (10, 0.01)].into_iter().collect();
//! assert_eq!(q.resolve(4, None).unwrap(), 0.1);
//! assert_eq!(q.resolve(5, None).unwrap(), 0.05);
//! assert_eq!(q.resolve(99, None).unwrap(), 0.01);
//! ```

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A constant, or a step function from epoch breakpoints to values.
///
/// With the `serde` feature a constant serializes as a bare value and a
/// schedule as an object keyed by epoch, e.g. `{"0": 6, "20": 3}`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EpochQuantity<V> {
    /// The same value at every epoch.
    Constant(V),
    /// Breakpoints mapped to the value that holds from that epoch on.
    Schedule(BTreeMap<u64, V>),
}

impl<V: Clone> EpochQuantity<V> {
    /// Resolve the value in effect at `epoch`.
    ///
    /// Constants ignore both `epoch` and `fallback`. A NaN fallback is
    /// returned unchanged, so callers can use it as an "inactive" marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValueForEpoch`] if no breakpoint is `<= epoch` and
    /// `fallback` is `None`.
    pub fn resolve(&self, epoch: u64, fallback: Option<V>) -> Result<V> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::Schedule(breakpoints) => match breakpoints.range(..=epoch).next_back() {
                Some((_, value)) => Ok(value.clone()),
                None => fallback.ok_or(Error::NoValueForEpoch { epoch }),
            },
        }
    }
}

impl<V> EpochQuantity<V> {
    /// Returns `true` for a schedule without breakpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Schedule(breakpoints) if breakpoints.is_empty())
    }

    /// Iterate over all values this quantity can take.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        let (constant, schedule) = match self {
            Self::Constant(value) => (Some(value), None),
            Self::Schedule(breakpoints) => (None, Some(breakpoints.values())),
        };
        constant.into_iter().chain(schedule.into_iter().flatten())
    }
}

impl<V: Ord + Copy> EpochQuantity<V> {
    /// The smallest value across all epochs, or `None` for an empty schedule.
    #[must_use]
    pub fn min_value(&self) -> Option<V> {
        self.values().min().copied()
    }
}

impl<V> From<V> for EpochQuantity<V> {
    fn from(value: V) -> Self {
        Self::Constant(value)
    }
}

impl<V> FromIterator<(u64, V)> for EpochQuantity<V> {
    fn from_iter<I: IntoIterator<Item = (u64, V)>>(iter: I) -> Self {
        Self::Schedule(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl<'de, V: Deserialize<'de>> Deserialize<'de> for EpochQuantity<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        use serde::de::Error as _;

        // JSON object keys are always strings, so breakpoints are parsed here.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<V> {
            Constant(V),
            Schedule(BTreeMap<String, V>),
        }

        match Raw::<V>::deserialize(deserializer)? {
            Raw::Constant(value) => Ok(Self::Constant(value)),
            Raw::Schedule(raw) => raw
                .into_iter()
                .map(|(key, value)| match key.trim().parse::<u64>() {
                    Ok(epoch) => Ok((epoch, value)),
                    Err(_) => Err(D::Error::custom(Error::InvalidBreakpoint(key))),
                })
                .collect(),
        }
    }
}
