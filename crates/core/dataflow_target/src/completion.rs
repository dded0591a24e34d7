use crate::Fault;
use tokio::sync::watch;

/// The state of a completion signal
#[derive(Clone, Debug)]
pub enum CompletionStatus {
    Pending,
    Completed,
    Faulted(Fault),
}

impl CompletionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, CompletionStatus::Pending)
    }

    /// The outcome of a resolved signal, `None` if still pending
    pub fn outcome(&self) -> Option<Result<(), Fault>> {
        match self {
            CompletionStatus::Pending => None,
            CompletionStatus::Completed => Some(Ok(())),
            CompletionStatus::Faulted(fault) => Some(Err(fault.clone())),
        }
    }
}

/// The writing side of a completion signal
///
/// The signal is resolved at most once, either successfully or with a fault.
/// Any later attempt to resolve it is ignored.
pub struct CompletionSource {
    sender: watch::Sender<CompletionStatus>,
}

impl Default for CompletionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSource {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(CompletionStatus::Pending);
        CompletionSource { sender }
    }

    /// Return a signal observing this source
    pub fn completion(&self) -> Completion {
        Completion {
            receiver: self.sender.subscribe(),
        }
    }

    /// Resolve the signal successfully
    ///
    /// Return `true` if this call actually resolved the signal.
    pub fn complete(&self) -> bool {
        self.resolve(CompletionStatus::Completed)
    }

    /// Resolve the signal with a fault
    ///
    /// Return `true` if this call actually resolved the signal.
    pub fn fault(&self, fault: Fault) -> bool {
        self.resolve(CompletionStatus::Faulted(fault))
    }

    pub fn is_completed(&self) -> bool {
        !self.sender.borrow().is_pending()
    }

    fn resolve(&self, status: CompletionStatus) -> bool {
        self.sender.send_if_modified(|current| {
            if current.is_pending() {
                *current = status;
                true
            } else {
                false
            }
        })
    }
}

/// A signal resolved once a block has completed or has been faulted
///
/// A signal can be cloned and awaited by any number of observers.
#[derive(Clone, Debug)]
pub struct Completion {
    receiver: watch::Receiver<CompletionStatus>,
}

impl Completion {
    /// A signal that is never resolved
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(CompletionStatus::Pending);
        Completion { receiver }
    }

    pub fn status(&self) -> CompletionStatus {
        self.receiver.borrow().clone()
    }

    /// Return `true` if the signal has been resolved, successfully or not
    pub fn is_completed(&self) -> bool {
        !self.receiver.borrow().is_pending()
    }

    pub fn is_faulted(&self) -> bool {
        matches!(*self.receiver.borrow(), CompletionStatus::Faulted(_))
    }

    /// Wait for the signal to be resolved
    ///
    /// Never returns if the source is dropped before resolving the signal.
    pub async fn wait(&self) -> Result<(), Fault> {
        let mut receiver = self.receiver.clone();
        let outcome = match receiver.wait_for(|status| !status.is_pending()).await {
            Ok(status) => status.outcome(),
            Err(_) => None,
        };

        match outcome {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}
