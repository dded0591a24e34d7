use crate::DataflowMessageStatus;
use crate::Fault;
use crate::MessageHeader;
use crate::TargetBlock;
use std::error::Error;

/// Helpers available on any target block
pub trait TargetBlockExt<T>: TargetBlock<T> {
    /// Push a value to this block, with no source to consume it from
    ///
    /// Return `true` if the value has been accepted.
    fn post(&self, value: &T) -> bool {
        self.offer_message(MessageHeader::new(1), value, None, false)
            == DataflowMessageStatus::Accepted
    }

    /// Fault this block with a plain error message
    fn fault_with_message(&self, message: impl Into<String>) {
        let message: String = message.into();
        self.fault(Fault::new(message))
    }

    /// Fault this block with an error message wrapping the actual error
    fn fault_with_context(
        &self,
        message: impl Into<String>,
        error: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) {
        self.fault(Fault::with_context(message, error))
    }

    /// Complete this block and wait for its completion
    #[allow(async_fn_in_trait)]
    async fn complete_and_wait(&self) -> Result<(), Fault> {
        self.complete();
        self.completion().wait().await
    }
}

impl<T, B: TargetBlock<T> + ?Sized> TargetBlockExt<T> for B {}
