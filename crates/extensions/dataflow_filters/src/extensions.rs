use crate::AutoCompleteFilter;
use crate::ChangedFilter;
use crate::DeclinePolicy;
use crate::DistinctFilter;
use crate::FilterError;
use crate::TargetFilter;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use std::hash::Hash;
use std::sync::Arc;

/// Wrap a shared target with filters
///
/// ```
/// # use std::sync::Arc;
/// # use dataflow_filters::FilterTargetExt;
/// # use dataflow_target::test_helpers::RecordingTarget;
/// # use dataflow_target::DataflowMessageStatus;
/// # use dataflow_target::DynTarget;
/// # use dataflow_target::TargetBlockExt;
/// let target = Arc::new(RecordingTarget::<u32>::new());
/// let input = (target.clone() as DynTarget<u32>)
///     .auto_complete_after(2)?
///     .distinct(DataflowMessageStatus::Accepted)?
///     .filter(|n| n % 2 == 0, false);
///
/// for n in [1, 2, 2, 3, 4, 6, 8] {
///     input.post(&n);
/// }
///
/// assert_eq!(target.received(), vec![2, 4]);
/// assert_eq!(target.complete_calls(), 1);
/// # Ok::<(), dataflow_filters::FilterError>(())
/// ```
pub trait FilterTargetExt<T> {
    /// Forward only the messages accepted by the predicate
    ///
    /// If `decline` is `true`, the rejected messages are declined,
    /// otherwise they are accepted and silently dropped.
    fn filter<F>(self, predicate: F, decline: bool) -> DynTarget<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static;

    /// Forward each distinct message only once
    fn distinct(self, decline_status: DataflowMessageStatus) -> Result<DynTarget<T>, FilterError>
    where
        T: Eq + Hash + Clone + Send;

    /// Forward a message only if it differs from the last forwarded one
    fn only_if_changed(
        self,
        decline_status: DataflowMessageStatus,
    ) -> Result<DynTarget<T>, FilterError>
    where
        T: PartialEq + Clone + Send;

    /// Complete the target after `limit` messages
    fn auto_complete_after(self, limit: usize) -> Result<DynTarget<T>, FilterError>;
}

impl<T: 'static> FilterTargetExt<T> for DynTarget<T> {
    fn filter<F>(self, predicate: F, decline: bool) -> DynTarget<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let decline_policy = if decline {
            DeclinePolicy::Decline
        } else {
            DeclinePolicy::Absorb
        };
        Arc::new(TargetFilter::with_decline_policy(
            self,
            "filter",
            decline_policy,
            predicate,
        ))
    }

    fn distinct(self, decline_status: DataflowMessageStatus) -> Result<DynTarget<T>, FilterError>
    where
        T: Eq + Hash + Clone + Send,
    {
        Ok(Arc::new(DistinctFilter::distinct(self, decline_status)?))
    }

    fn only_if_changed(
        self,
        decline_status: DataflowMessageStatus,
    ) -> Result<DynTarget<T>, FilterError>
    where
        T: PartialEq + Clone + Send,
    {
        Ok(Arc::new(ChangedFilter::only_if_changed(
            self,
            decline_status,
        )?))
    }

    fn auto_complete_after(self, limit: usize) -> Result<DynTarget<T>, FilterError> {
        Ok(Arc::new(AutoCompleteFilter::new(limit, self)?))
    }
}
