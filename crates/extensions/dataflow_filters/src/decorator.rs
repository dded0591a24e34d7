use dataflow_target::Completion;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use dataflow_target::Fault;
use dataflow_target::MessageHeader;
use dataflow_target::SourceBlock;
use dataflow_target::TargetBlock;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use tracing::debug;
use tracing::warn;

const ACCEPTING: u8 = 0;
const REJECTING: u8 = 1;

/// A target block forwarding all the offers to a wrapped target, till completed or faulted
///
/// The decorator owns a latch that is flipped from accepting to rejecting exactly once,
/// by the first call to [complete](TargetBlock::complete) or [fault](TargetBlock::fault).
/// The latch is flipped *before* the wrapped target is told to stop,
/// so no offer can be forwarded to a target that is completing.
///
/// This is the building block of all the filters of this crate,
/// which only add a decision before forwarding an offer.
pub struct FilterDecorator<T> {
    name: String,
    target: DynTarget<T>,
    target_completion: Completion,
    state: AtomicU8,
}

impl<T> FilterDecorator<T> {
    pub fn new(name: impl Into<String>, target: DynTarget<T>) -> Self {
        let target_completion = target.completion();
        FilterDecorator {
            name: name.into(),
            target,
            target_completion,
            state: AtomicU8::new(ACCEPTING),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped target
    pub fn target(&self) -> &DynTarget<T> {
        &self.target
    }

    /// Return `false` once this decorator or the wrapped target has been completed
    pub fn is_accepting(&self) -> bool {
        self.state.load(Ordering::Acquire) == ACCEPTING && !self.target_completion.is_completed()
    }

    /// Offer a message to the wrapped target, unless no more messages are accepted
    pub fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        if !self.is_accepting() {
            return DataflowMessageStatus::DecliningPermanently;
        }
        self.forward(header, value, source, consume_to_accept)
    }

    /// Offer a message to the wrapped target, with no check
    pub(crate) fn forward(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        self.target
            .offer_message(header, value, source, consume_to_accept)
    }

    /// Stop accepting messages, then complete the wrapped target
    ///
    /// Only the first call to `complete` or `fault` reaches the wrapped target.
    pub fn complete(&self) {
        if self.stop_accepting("completed") {
            self.target.complete();
        }
    }

    /// Stop accepting messages, then fault the wrapped target
    ///
    /// Only the first call to `complete` or `fault` reaches the wrapped target.
    pub fn fault(&self, fault: Fault) {
        if self.stop_accepting("faulted") {
            warn!(target: "dataflow", "{}: forwarding fault: {}", self.name, fault);
            self.target.fault(fault);
        } else {
            debug!(
                target: "dataflow",
                "{}: already stopped, discarding fault: {}", self.name, fault
            );
        }
    }

    /// The completion of the wrapped target
    pub fn completion(&self) -> Completion {
        self.target_completion.clone()
    }

    fn stop_accepting(&self, cause: &str) -> bool {
        let flipped = self
            .state
            .compare_exchange(ACCEPTING, REJECTING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if flipped {
            debug!(target: "dataflow", "{}: {cause}, rejecting all further messages", self.name);
        }
        flipped
    }
}

impl<T> TargetBlock<T> for FilterDecorator<T> {
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        FilterDecorator::offer_message(self, header, value, source, consume_to_accept)
    }

    fn complete(&self) {
        FilterDecorator::complete(self)
    }

    fn fault(&self, fault: Fault) {
        FilterDecorator::fault(self, fault)
    }

    fn completion(&self) -> Completion {
        FilterDecorator::completion(self)
    }
}
