//! Target and source blocks recording their interactions, to be used in tests
use crate::Completion;
use crate::CompletionSource;
use crate::DataflowMessageStatus;
use crate::Fault;
use crate::MessageHeader;
use crate::SourceBlock;
use crate::TargetBlock;
use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A target block that records all the messages it accepts
///
/// By default all the offers are accepted till the block is completed or faulted.
/// The block can also be configured to answer with a fixed status.
pub struct RecordingTarget<T> {
    response: DataflowMessageStatus,
    received: Mutex<Vec<T>>,
    offers: AtomicUsize,
    complete_calls: AtomicUsize,
    faults: Mutex<Vec<Fault>>,
    received_on_complete: Mutex<Option<usize>>,
    completion: CompletionSource,
}

impl<T> Default for RecordingTarget<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordingTarget<T> {
    pub fn new() -> Self {
        RecordingTarget {
            response: DataflowMessageStatus::Accepted,
            received: Mutex::new(vec![]),
            offers: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
            faults: Mutex::new(vec![]),
            received_on_complete: Mutex::new(None),
            completion: CompletionSource::new(),
        }
    }

    /// Answer all the offers with the given status, rather than accepting them
    pub fn with_response(self, response: DataflowMessageStatus) -> Self {
        Self { response, ..self }
    }

    /// The number of offers that reached this block
    pub fn offers(&self) -> usize {
        self.offers.load(Ordering::SeqCst)
    }

    /// The number of calls to [TargetBlock::complete]
    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    /// The faults received by this block
    pub fn faults(&self) -> Vec<Fault> {
        lock(&self.faults).clone()
    }

    /// The number of accepted messages when this block was first completed
    pub fn received_on_complete(&self) -> Option<usize> {
        *lock(&self.received_on_complete)
    }
}

impl<T: Clone> RecordingTarget<T> {
    /// The messages accepted so far, in order of acceptance
    pub fn received(&self) -> Vec<T> {
        lock(&self.received).clone()
    }
}

impl<T: Clone + Send> TargetBlock<T> for RecordingTarget<T> {
    fn offer_message(
        &self,
        header: MessageHeader,
        value: &T,
        source: Option<&dyn SourceBlock<T>>,
        consume_to_accept: bool,
    ) -> DataflowMessageStatus {
        self.offers.fetch_add(1, Ordering::SeqCst);
        if self.completion.is_completed() {
            return DataflowMessageStatus::DecliningPermanently;
        }
        if self.response != DataflowMessageStatus::Accepted {
            return self.response;
        }

        let value = if consume_to_accept {
            match source.and_then(|source| source.consume_message(header)) {
                Some(value) => value,
                None => return DataflowMessageStatus::NotAvailable,
            }
        } else {
            value.clone()
        };
        lock(&self.received).push(value);
        DataflowMessageStatus::Accepted
    }

    fn complete(&self) {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        let received = lock(&self.received).len();
        let mut received_on_complete = lock(&self.received_on_complete);
        if received_on_complete.is_none() {
            *received_on_complete = Some(received);
        }
        drop(received_on_complete);
        self.completion.complete();
    }

    fn fault(&self, fault: Fault) {
        lock(&self.faults).push(fault.clone());
        self.completion.fault(fault);
    }

    fn completion(&self) -> Completion {
        self.completion.completion()
    }
}

/// A source of messages that targets can consume
pub struct TestSource<T> {
    next_id: AtomicI64,
    available: Mutex<HashMap<MessageHeader, T>>,
    consumed: Mutex<Vec<MessageHeader>>,
}

impl<T> Default for TestSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TestSource<T> {
    pub fn new() -> Self {
        TestSource {
            next_id: AtomicI64::new(1),
            available: Mutex::new(HashMap::new()),
            consumed: Mutex::new(vec![]),
        }
    }

    /// Make a message available for consumption, returning its header
    pub fn publish(&self, value: T) -> MessageHeader {
        let header = MessageHeader::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.available).insert(header, value);
        header
    }

    /// Return `true` if the message has not been consumed yet
    pub fn is_available(&self, header: MessageHeader) -> bool {
        lock(&self.available).contains_key(&header)
    }

    /// The headers of the messages consumed so far
    pub fn consumed(&self) -> Vec<MessageHeader> {
        lock(&self.consumed).clone()
    }
}

impl<T: Send> SourceBlock<T> for TestSource<T> {
    fn consume_message(&self, header: MessageHeader) -> Option<T> {
        let value = lock(&self.available).remove(&header)?;
        lock(&self.consumed).push(header);
        Some(value)
    }
}
