/// Errors returned by stoppers and their configuration.
///
/// Every variant except [`MissingMetric`](Error::MissingMetric) describes a
/// configuration problem; see [`Error::is_configuration`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the smallest configured patience is below 1.
    #[error("patience must be at least 1, but the smallest configured value is {min}")]
    InvalidPatience {
        /// The smallest patience value found across all epochs.
        min: u64,
    },

    /// Returned when an epoch schedule has no breakpoint at or below the
    /// requested epoch and no fallback was supplied.
    #[error("no value defined for epoch {epoch}")]
    NoValueForEpoch {
        /// The epoch that could not be resolved.
        epoch: u64,
    },

    /// Returned when a comparison mode other than `max` or `min` is given.
    #[error("invalid mode '{0}': expected \"max\" or \"min\"")]
    InvalidMode(String),

    /// Returned when a schedule breakpoint is not a non-negative integer.
    #[error("invalid epoch breakpoint '{0}': expected a non-negative integer")]
    InvalidBreakpoint(String),

    /// Returned when a stopper configuration cannot be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid stopper configuration: {0}")]
    Config(String),

    /// Returned when a reported result does not contain the tracked metric.
    #[error("metric '{metric}' not found in reported result")]
    MissingMetric {
        /// The name of the metric the stopper tracks.
        metric: String,
    },
}

impl Error {
    /// Returns `true` for errors caused by invalid configuration rather than
    /// by the reported results.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Error::MissingMetric { .. })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
