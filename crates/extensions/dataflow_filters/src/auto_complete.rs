use crate::lock;
use crate::FilterDecorator;
use crate::FilterError;
use dataflow_target::Completion;
use dataflow_target::DataflowMessageStatus;
use dataflow_target::DynTarget;
use dataflow_target::Fault;
use dataflow_target::MessageHeader;
use dataflow_target::SourceBlock;
use dataflow_target::TargetBlock;
use std::sync::Mutex;
use tracing::debug;

/// A filter completing the wrapped target after a given number of messages
///
/// The wrapped target is offered at most `limit` messages,
/// and is completed right after the last one has been forwarded.
pub struct AutoCompleteFilter<T> {
    decorator: FilterDecorator<T>,
    limit: usize,
    forwarded: Mutex<usize>,
}

impl<T> AutoCompleteFilter<T> {
    /// Wrap a target, completing it after `limit` messages
    ///
    /// Fails if the limit is zero.
    pub fn new(limit: usize, target: DynTarget<T>) -> Result<Self, FilterError> {
        if limit == 0 {
            return Err(FilterError::InvalidLimit);
        }
        Ok(AutoCompleteFilter {
            decorator: FilterDecorator::new("auto_complete", target),
            limit,
            forwarded: Mutex::new(0),
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The number of messages forwarded so far to the wrapped target
    pub fn forwarded_count(&self) -> usize {
        *lock(&self.forwarded)
    }
}

impl<T> TargetBlock<T> for AutoCompleteFilter<T> {
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

        // Checking the count, forwarding the message and updating the count
        // must not be interleaved with a concurrent offer
        let (status, limit_reached) = {
            let mut forwarded = lock(&self.forwarded);
            if *forwarded >= self.limit {
                return DataflowMessageStatus::DecliningPermanently;
            }
            *forwarded += 1;
            let status = self
                .decorator
                .forward(header, value, source, consume_to_accept);
            (status, *forwarded == self.limit)
        };

        if limit_reached {
            debug!(target: "dataflow", "{}: {} messages forwarded", self.decorator.name(), self.limit);
            self.decorator.complete();
        }

        status
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
