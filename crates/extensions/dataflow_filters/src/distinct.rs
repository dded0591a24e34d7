use crate::lock;
use crate::AcceptPolicy;
use crate::FilterConfig;
use crate::FilterError;
use crate::TargetFilter;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Mutex;

/// A filter forwarding each distinct message only once
pub type DistinctFilter<T> = TargetFilter<T, Distinct<T>>;

/// Accept only the messages never seen before
///
/// All the accepted messages are remembered for the lifetime of the policy.
pub struct Distinct<T> {
    seen: Mutex<HashSet<T>>,
}

impl<T> Default for Distinct<T> {
    fn default() -> Self {
        Distinct {
            seen: Mutex::new(HashSet::new()),
        }
    }
}

impl<T: Eq + Hash + Clone + Send> Distinct<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct messages seen so far
    pub fn seen_count(&self) -> usize {
        lock(&self.seen).len()
    }

    pub fn has_seen(&self, value: &T) -> bool {
        lock(&self.seen).contains(value)
    }
}

impl<T: Eq + Hash + Clone + Send> AcceptPolicy<T> for Distinct<T> {
    fn accept(&self, value: &T) -> bool {
        let mut seen = lock(&self.seen);
        if seen.contains(value) {
            return false;
        }
        seen.insert(value.clone())
    }
}

impl<T: Eq + Hash + Clone + Send> TargetFilter<T, Distinct<T>> {
    /// Wrap a target, so it only receives distinct messages
    ///
    /// The duplicates are either absorbed (`Accepted`) or declined (`Declined`).
    pub fn distinct(
        target: DynTarget<T>,
        decline_status: DataflowMessageStatus,
    ) -> Result<Self, FilterError> {
        let config = FilterConfig::new("distinct").with_decline_status(decline_status);
        TargetFilter::new(target, config, Distinct::new())
    }
}
