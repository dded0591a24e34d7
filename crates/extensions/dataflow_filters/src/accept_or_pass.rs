use crate::AcceptPolicy;
use crate::DeclinePolicy;
use crate::TargetFilter;
use dataflow_target::Completion;
use dataflow_target::CompletionSource;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::Fault;
use dataflow_target::MessageHeader;
use dataflow_target::NullTarget;
use dataflow_target::SourceBlock;
use dataflow_target::TargetBlock;
use std::sync::Arc;
use tracing::debug;

/// A sink that takes the messages accepted by an acceptor and lets the others go
///
/// A message accepted by the acceptor is consumed by the block and disappears.
/// Any other message is declined, to be offered to the next target of the producer.
pub struct AcceptOrPassBlock<A> {
    acceptor: A,
    completion: CompletionSource,
}

impl<A> AcceptOrPassBlock<A> {
    pub fn new(acceptor: A) -> Self {
        AcceptOrPassBlock {
            acceptor,
            completion: CompletionSource::new(),
        }
    }
}

impl<T, A: AcceptPolicy<T>> TargetBlock<T> for AcceptOrPassBlock<A> {
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        if self.completion.is_completed() {
            return DataflowMessageStatus::DecliningPermanently;
        }

        if !self.acceptor.accept(value) {
            return DataflowMessageStatus::Declined;
        }

        if consume_to_accept {
            let consumed = source.and_then(|source| source.consume_message(header));
            if consumed.is_none() {
                return DataflowMessageStatus::NotAvailable;
            }
        }
        DataflowMessageStatus::Accepted
    }

    fn complete(&self) {
        if self.completion.complete() {
            debug!(target: "dataflow", "accept_or_pass: completed");
        }
    }

    fn fault(&self, fault: Fault) {
        if self.completion.fault(fault) {
            debug!(target: "dataflow", "accept_or_pass: faulted");
        }
    }

    fn completion(&self) -> Completion {
        self.completion.completion()
    }
}

/// A sink dropping the messages taken by the acceptor and declining the others
///
/// Linked in a chain of targets, the declined messages are offered to the next targets.
pub fn take_or_continue<T, A: AcceptPolicy<T>>(acceptor: A) -> TargetFilter<T, A> {
    TargetFilter::with_decline_policy(
        Arc::new(NullTarget),
        "take_or_continue",
        DeclinePolicy::Decline,
        acceptor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_target::test_helpers::RecordingTarget;
    use dataflow_target::test_helpers::TestSource;
    use dataflow_target::TargetBlockExt;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    fn offer(block: &impl TargetBlock<u32>, value: u32) -> DataflowMessageStatus {
        block.offer_message(MessageHeader::new(1), &value, None, false)
    }

    #[test]
    fn accepted_messages_are_taken_and_others_passed() {
        let taken = AtomicUsize::new(0);
        let block = AcceptOrPassBlock::new(|n: &u32| {
            if *n > 10 {
                taken.fetch_add(1, Ordering::SeqCst);
                true
            } else {
                false
            }
        });

        assert_eq!(offer(&block, 11), DataflowMessageStatus::Accepted);
        assert_eq!(offer(&block, 3), DataflowMessageStatus::Declined);
        assert_eq!(offer(&block, 42), DataflowMessageStatus::Accepted);
        assert_eq!(taken.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn a_passed_message_can_be_offered_to_another_target() {
        let block = AcceptOrPassBlock::new(|n: &u32| n % 2 == 0);
        let fallback = RecordingTarget::<u32>::new();

        for n in 1..=4 {
            if offer(&block, n) == DataflowMessageStatus::Declined {
                assert!(fallback.post(&n));
            }
        }

        assert_eq!(fallback.received(), vec![1, 3]);
    }

    #[test]
    fn taken_messages_are_consumed_from_the_source() {
        let block = AcceptOrPassBlock::new(|n: &u32| *n > 3);
        let source = TestSource::<u32>::new();
        let taken = source.publish(5);
        let passed = source.publish(2);

        let status = block.offer_message(taken, &5, Some(&source), true);
        assert_eq!(status, DataflowMessageStatus::Accepted);
        assert!(!source.is_available(taken));

        let status = block.offer_message(passed, &2, Some(&source), true);
        assert_eq!(status, DataflowMessageStatus::Declined);
        assert!(source.is_available(passed));

        assert_eq!(source.consumed(), vec![taken]);
    }

    #[test]
    fn a_message_already_consumed_is_not_available() {
        let block = AcceptOrPassBlock::new(|_: &u32| true);
        let source = TestSource::<u32>::new();
        let header = source.publish(5);
        assert_eq!(source.consume_message(header), Some(5));

        let status = block.offer_message(header, &5, Some(&source), true);
        assert_eq!(status, DataflowMessageStatus::NotAvailable);
    }

    #[tokio::test]
    async fn a_completed_block_declines_permanently() {
        let block = AcceptOrPassBlock::new(|_: &u32| true);
        TargetBlock::<u32>::complete(&block);

        assert_eq!(offer(&block, 1), DataflowMessageStatus::DecliningPermanently);
        assert!(TargetBlock::<u32>::completion(&block).wait().await.is_ok());
    }

    #[tokio::test]
    async fn a_faulted_block_declines_permanently() {
        let block = AcceptOrPassBlock::new(|_: &u32| true);
        TargetBlock::<u32>::fault(&block, Fault::new("x"));
        TargetBlock::<u32>::complete(&block);

        assert_eq!(offer(&block, 1), DataflowMessageStatus::DecliningPermanently);
        let fault = TargetBlock::<u32>::completion(&block)
            .wait()
            .await
            .unwrap_err();
        assert_eq!(fault.to_string(), "x");
    }

    #[test]
    fn take_or_continue_drops_taken_messages() {
        let sink = take_or_continue(|n: &u32| *n < 5);

        assert_eq!(offer(&sink, 1), DataflowMessageStatus::Accepted);
        assert_eq!(offer(&sink, 7), DataflowMessageStatus::Declined);
        assert!(!TargetBlock::<u32>::completion(&sink).is_completed());
    }
}
