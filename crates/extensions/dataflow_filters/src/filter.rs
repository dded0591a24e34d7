use crate::DeclinePolicy;
use crate::FilterConfig;
use crate::FilterDecorator;
use crate::FilterError;
use dataflow_target::null_target;
use dataflow_target::Completion;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use dataflow_target::Fault;
use dataflow_target::MessageHeader;
use dataflow_target::SourceBlock;
use dataflow_target::TargetBlock;

/// Decide which messages are forwarded by a [TargetFilter]
///
/// A policy might be stateful, e.g. to remember the messages already seen,
/// in which case it has to protect its state against concurrent offers.
pub trait AcceptPolicy<T>: Send + Sync {
    /// Return `true` if the message has to be forwarded to the wrapped target
    fn accept(&self, value: &T) -> bool;
}

/// Any predicate is a stateless policy
impl<T, F> AcceptPolicy<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn accept(&self, value: &T) -> bool {
        self(value)
    }
}

/// A target block forwarding to a wrapped target only the messages accepted by a policy
///
/// The messages rejected by the policy are either:
/// - absorbed: reported as accepted to the producer, but silently dropped,
/// - or declined: left to the producer that can offer them to another target.
pub struct TargetFilter<T, P> {
    decorator: FilterDecorator<T>,
    decline_policy: DeclinePolicy,
    policy: P,
}

impl<T, P> std::fmt::Debug for TargetFilter<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetFilter")
            .field("name", &self.decorator.name())
            .field("decline_policy", &self.decline_policy)
            .finish_non_exhaustive()
    }
}

impl<T, P: AcceptPolicy<T>> TargetFilter<T, P> {
    /// Wrap a target with a filter
    ///
    /// Fails if the configured decline status is neither `Accepted` nor `Declined`.
    pub fn new(target: DynTarget<T>, config: FilterConfig, policy: P) -> Result<Self, FilterError> {
        let decline_policy = config.decline_policy()?;
        Ok(Self::with_decline_policy(
            target,
            config.name,
            decline_policy,
            policy,
        ))
    }

    pub fn with_decline_policy(
        target: DynTarget<T>,
        name: impl Into<String>,
        decline_policy: DeclinePolicy,
        policy: P,
    ) -> Self {
        TargetFilter {
            decorator: FilterDecorator::new(name, target),
            decline_policy,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        self.decorator.name()
    }

    pub fn decline_policy(&self) -> DeclinePolicy {
        self.decline_policy
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<T, P: AcceptPolicy<T>> TargetBlock<T> for TargetFilter<T, P> {
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        if !self.decorator.is_accepting() {
            return DataflowMessageStatus::DecliningPermanently;
        }

        if self.policy.accept(value) {
            return self
                .decorator
                .offer_message(header, value, source, consume_to_accept);
        }

        match self.decline_policy {
            DeclinePolicy::Absorb => {
                null_target().offer_message(header, value, source, consume_to_accept)
            }
            DeclinePolicy::Decline => DataflowMessageStatus::Declined,
        }
    }

    fn complete(&self) {
        self.decorator.complete()
    }

    fn fault(&self, fault: Fault) {
        self.decorator.fault(fault)
    }

    fn completion(&self) -> Completion {
        self.decorator.completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use dataflow_target::test_helpers::RecordingTarget;
    use dataflow_target::test_helpers::TestSource;
    use dataflow_target::TargetBlockExt;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn is_even(n: &u32) -> bool {
        n % 2 == 0
    }

    fn offer(filter: &impl TargetBlock<u32>, value: u32) -> DataflowMessageStatus {
        filter.offer_message(MessageHeader::new(value as i64 + 1), &value, None, false)
    }

    #[test]
    fn rejected_messages_are_absorbed_by_default() {
        let target = Arc::new(RecordingTarget::<u32>::new());
        let filter = TargetFilter::new(target.clone(), FilterConfig::default(), is_even).unwrap();

        let statuses: Vec<_> = (0..6).map(|n| offer(&filter, n)).collect();

        assert!(statuses.iter().all(|s| s.is_accepted()));
        assert_eq!(target.received(), vec![0, 2, 4]);
    }

    #[test]
    fn rejected_messages_can_be_declined() {
        let target = Arc::new(RecordingTarget::<u32>::new());
        let config = FilterConfig::new("evens").declining();
        let filter = TargetFilter::new(target.clone(), config, is_even).unwrap();

        assert_eq!(offer(&filter, 1), DataflowMessageStatus::Declined);
        assert_eq!(offer(&filter, 2), DataflowMessageStatus::Accepted);
        assert_eq!(offer(&filter, 3), DataflowMessageStatus::Declined);
        assert_eq!(target.received(), vec![2]);
    }

    #[test]
    fn a_filter_cannot_postpone_rejected_messages() {
        let target: DynTarget<u32> = Arc::new(RecordingTarget::<u32>::new());
        let config =
            FilterConfig::new("evens").with_decline_status(DataflowMessageStatus::Postponed);

        let filter = TargetFilter::new(target, config, is_even);
        assert_matches!(
            filter,
            Err(FilterError::UnsupportedDeclineStatus(
                DataflowMessageStatus::Postponed
            ))
        );
    }

    #[test]
    fn the_wrapped_target_status_is_returned_for_accepted_messages() {
        let target = Arc::new(
            RecordingTarget::<u32>::new().with_response(DataflowMessageStatus::Declined),
        );
        let filter = TargetFilter::new(target.clone(), FilterConfig::default(), is_even).unwrap();

        assert_eq!(offer(&filter, 2), DataflowMessageStatus::Declined);
        assert_eq!(offer(&filter, 3), DataflowMessageStatus::Accepted);
    }

    #[test]
    fn no_messages_are_evaluated_once_completed() {
        let target = Arc::new(RecordingTarget::<u32>::new());
        let evaluated = std::sync::atomic::AtomicUsize::new(0);
        let policy = |n: &u32| {
            evaluated.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            is_even(n)
        };
        let filter = TargetFilter::new(target.clone(), FilterConfig::default(), policy).unwrap();

        filter.complete();
        filter.complete();

        assert_eq!(offer(&filter, 2), DataflowMessageStatus::DecliningPermanently);
        assert_eq!(offer(&filter, 3), DataflowMessageStatus::DecliningPermanently);
        assert_eq!(evaluated.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(target.complete_calls(), 1);
    }

    #[test]
    fn absorbed_messages_are_consumed_from_their_source() {
        let target = Arc::new(RecordingTarget::<u32>::new());
        let filter = TargetFilter::new(target.clone(), FilterConfig::default(), is_even).unwrap();
        let source = TestSource::<u32>::new();

        let odd = source.publish(3);
        let even = source.publish(4);

        assert!(filter
            .offer_message(odd, &3, Some(&source), true)
            .is_accepted());
        assert!(filter
            .offer_message(even, &4, Some(&source), true)
            .is_accepted());

        assert_eq!(source.consumed(), vec![odd, even]);
        assert_eq!(target.received(), vec![4]);
    }

    #[tokio::test]
    async fn faults_are_forwarded_to_the_wrapped_target() {
        let target = Arc::new(RecordingTarget::<u32>::new());
        let filter = TargetFilter::new(target.clone(), FilterConfig::default(), is_even).unwrap();

        filter.fault_with_message("x");

        let fault = filter.completion().wait().await.unwrap_err();
        assert_eq!(fault.to_string(), "x");
        assert_eq!(offer(&filter, 2), DataflowMessageStatus::DecliningPermanently);
    }
}
