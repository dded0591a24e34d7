use crate::lock;
use crate::AcceptPolicy;
use crate::FilterConfig;
use crate::FilterError;
use crate::TargetFilter;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use std::sync::Mutex;

/// A filter forwarding a message only when it differs from the previous one
pub type ChangedFilter<T> = TargetFilter<T, Changed<T>>;

/// Accept a message only if different from the last accepted one
///
/// The very first message is always accepted.
/// Rejected messages are not remembered:
/// a message is always compared to the last *accepted* message.
pub struct Changed<T> {
    last: Mutex<Option<T>>,
}

impl<T> Default for Changed<T> {
    fn default() -> Self {
        Changed {
            last: Mutex::new(None),
        }
    }
}

impl<T: PartialEq + Clone + Send> Changed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last accepted message, if any
    pub fn last(&self) -> Option<T> {
        lock(&self.last).clone()
    }
}

impl<T: PartialEq + Clone + Send> AcceptPolicy<T> for Changed<T> {
    fn accept(&self, value: &T) -> bool {
        let mut last = lock(&self.last);
        if last.as_ref() == Some(value) {
            return false;
        }
        *last = Some(value.clone());
        true
    }
}

impl<T: PartialEq + Clone + Send> TargetFilter<T, Changed<T>> {
    /// Wrap a target, so it only receives messages that differ from their predecessor
    ///
    /// The repeated messages are either absorbed (`Accepted`) or declined (`Declined`).
    pub fn only_if_changed(
        target: DynTarget<T>,
        decline_status: DataflowMessageStatus,
    ) -> Result<Self, FilterError> {
        let config = FilterConfig::new("only_if_changed").with_decline_status(decline_status);
        TargetFilter::new(target, config, Changed::new())
    }
}
