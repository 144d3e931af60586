//! Core types shared by all stoppers.

use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The default trial identifier handed out by the host.
pub type TrialId = u64;

/// Any value a host can use to tell concurrent trials apart.
///
/// Blanket-implemented for every hashable, cloneable, thread-safe type, so
/// `u64`, `String`, `(u32, u32)` and the like all work as trial keys.
pub trait TrialKey: Hash + Eq + Clone + Send + Sync {}

impl<T: Hash + Eq + Clone + Send + Sync> TrialKey for T {}

/// Which direction of the tracked metric counts as better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Higher metric values are better.
    #[default]
    Max,
    /// Lower metric values are better.
    Min,
}

impl Mode {
    /// Returns `true` if `a` is strictly better than `b` in this mode.
    ///
    /// Comparisons involving NaN are never better.
    #[must_use]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Mode::Max => a > b,
            Mode::Min => a < b,
        }
    }

    /// The opposite mode.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Mode::Max => Mode::Min,
            Mode::Min => Mode::Max,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Max => f.write_str("max"),
            Mode::Min => f.write_str("min"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(Mode::Max),
            "min" => Ok(Mode::Min),
            other => Err(Error::InvalidMode(other.to_owned())),
        }
    }
}
