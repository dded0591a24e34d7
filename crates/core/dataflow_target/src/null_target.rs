use crate::Completion;
use crate::DataflowMessageStatus;
use crate::Fault;
use crate::MessageHeader;
use crate::SourceBlock;
use crate::TargetBlock;

/// Akin to `/dev/null`
///
/// - Accept any message, silently dropping it
/// - Never complete
///
/// Being stateless, a single instance is shared by the whole process, see [null_target].
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTarget;

static NULL_TARGET: NullTarget = NullTarget;

/// The process-wide null target
pub fn null_target() -> &'static NullTarget {
    &NULL_TARGET
}

impl<T> TargetBlock<T> for NullTarget {
    fn offer_message(
        &self,
        header: MessageHeader,
        _value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        if consume_to_accept {
            let consumed = source.and_then(|source| source.consume_message(header));
            if consumed.is_none() {
                return DataflowMessageStatus::NotAvailable;
            }
        }
        DataflowMessageStatus::Accepted
    }

    fn complete(&self) {}

    fn fault(&self, _fault: Fault) {}

    fn completion(&self) -> Completion {
        Completion::never()
    }
}
