use std::any::Any;
use std::fmt;

/// A failure of the governed operation.
///
/// Failures never reach the caller of a governed call: the governor logs
/// them and hands them to its middleware. A failed run still counts as
/// having run for interval bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationFailure {
    /// The operation panicked; the panic message, if it had one.
    Panicked(String),

    /// The operation returned an error, rendered with its `Display` impl.
    Errored(String),
}

impl OperationFailure {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("Box<dyn Any>")
        };
        OperationFailure::Panicked(message)
    }

    /// The failure's message.
    pub fn message(&self) -> &str {
        match self {
            OperationFailure::Panicked(m) | OperationFailure::Errored(m) => m,
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationFailure::Panicked(m) => write!(f, "operation panicked: {}", m),
            OperationFailure::Errored(m) => write!(f, "operation failed: {}", m),
        }
    }
}

impl std::error::Error for OperationFailure {}

/// Values a governed operation may return.
///
/// Operations returning `()` can only fail by panicking. Operations
/// returning a `Result` additionally fail when they return `Err`.
pub trait Completion {
    /// Converts the operation's return value into its failure, if any.
    fn into_failure(self) -> Option<OperationFailure>;
}

impl Completion for () {
    #[inline]
    fn into_failure(self) -> Option<OperationFailure> {
        None
    }
}

impl<E: fmt::Display> Completion for Result<(), E> {
    fn into_failure(self) -> Option<OperationFailure> {
        self.err()
            .map(|e| OperationFailure::Errored(e.to_string()))
    }
}
