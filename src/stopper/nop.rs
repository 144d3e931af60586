use super::Stopper;
use crate::error::Result;
use crate::report::Report;

/// A stopper that never stops anything.
///
/// Useful as a guard inside an [`AndStopper`](super::AndStopper) that may
/// otherwise end up empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopStopper;

impl<K> Stopper<K> for NopStopper {
    fn should_stop(&self, _trial: &K, _result: &dyn Report) -> Result<bool> {
        Ok(false)
    }
}
