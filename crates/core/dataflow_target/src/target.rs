use crate::Completion;
use crate::DataflowMessageStatus;
use crate::Fault;
use crate::MessageHeader;
use std::sync::Arc;

/// A block to which messages are pushed, one offer at a time
///
/// A target block must be safe to use concurrently:
/// several producers might offer messages in parallel,
/// while another thread completes or faults the block.
pub trait TargetBlock<T>: Send + Sync {
    /// Offer a message to this block
    ///
    /// When `consume_to_accept` is `true`, the message is only accepted
    /// once the block has consumed it from the `source`.
    ///
    /// Once the block has been completed or faulted,
    /// all the offers must be answered with [DataflowMessageStatus::DecliningPermanently].
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus;

    /// Notify the block that no more messages will be offered
    fn complete(&self);

    /// Notify the block that it must stop on error
    fn fault(&self, fault: Fault);

    /// The signal resolved when this block has completed
    fn completion(&self) -> Completion;
}

/// A block offering messages to target blocks
pub trait SourceBlock<T>: Send + Sync {
    /// Hand over to a target a message previously offered with `consume_to_accept`
    ///
    /// Return `None` if the message is no longer available,
    /// because consumed by another target or withdrawn by the source.
    fn consume_message(&self, header: MessageHeader) -> Option<T>;
}

/// A target block shared by its producers
pub type DynTarget<T> = Arc<dyn TargetBlock<T>>;

impl<T, B: TargetBlock<T> + ?Sized> TargetBlock<T> for Arc<B> {
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        self.as_ref()
            .offer_message(header, value, source, consume_to_accept)
    }

    fn complete(&self) {
        self.as_ref().complete()
    }

    fn fault(&self, fault: Fault) {
        self.as_ref().fault(fault)
    }

    fn completion(&self) -> Completion {
        self.as_ref().completion()
    }
}
