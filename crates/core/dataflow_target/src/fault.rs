use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// The error a block has been faulted with
///
/// A fault is shared by all the observers of a completion signal,
/// hence is cheap to clone.
#[derive(Clone)]
pub struct Fault {
    error: Arc<dyn Error + Send + Sync + 'static>,
}

impl Fault {
    /// Wrap a raw error or a plain message
    ///
    /// ```
    /// # use dataflow_target::Fault;
    /// let fault = Fault::new("x");
    /// assert_eq!(fault.to_string(), "x");
    /// ```
    pub fn new(error: impl Into<BoxError>) -> Self {
        Fault {
            error: Arc::from(error.into()),
        }
    }

    /// Wrap an error under a message
    pub fn with_context(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Fault::new(ContextError {
            message: message.into(),
            source: source.into(),
        })
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl Debug for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.error, f)
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.error, f)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{message}")]
struct ContextError {
    message: String,
    #[source]
    source: BoxError,
}
