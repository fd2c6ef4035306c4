//! Additional, customizable behavior for governors.
//!
//! Governing follows the principle that a governed call should be
//! very cheap, and unless users desire more information, they should
//! not pay any extra price: by default, a governed call returns `()`
//! whether it ran the operation or not.
//!
//! However, if you do desire more information about what the governor
//! did (or the ability to install hooks around its decisions), you
//! can. The [`GovernorMiddleware`] trait in this module allows you to
//! customize:
//!
//! * Any additional code that gets run when a caller was admitted or turned away.
//! * What value is returned from the governed call methods.
//!
//! Middleware does **not** let you override the governor's decisions:
//! a caller is either admitted (and runs the operation) or excluded.
//!
//! This crate ships two middlewares:
//!
//! * The cheapest one, [`NoOpMiddleware`], which returns `()` either way.
//!
//! * A more informative middleware, [`OutcomeMiddleware`], which
//!   returns a [`CallOutcome`] describing what happened.
//!
//! ## Using a custom middleware
//!
//! Middlewares are attached to the [`Governor`][crate::Governor] after
//! construction using
//! [`Governor::with_middleware`][crate::Governor::with_middleware]:
//!
//! ```rust
//! use call_governor::{Governor, middleware::{CallOutcome, Exclusion, OutcomeMiddleware}};
//! use std::time::Duration;
//!
//! let governor = Governor::direct(Duration::ZERO, || ())
//!     .with_middleware::<OutcomeMiddleware>();
//!
//! match governor.call() {
//!     CallOutcome::Ran(execution) => assert!(execution.succeeded()),
//!     CallOutcome::Excluded(_) => unreachable!("nobody else is calling"),
//! }
//! ```
//!
//! You can define your own middleware by `impl`ing [`GovernorMiddleware`].
use crate::errors::OperationFailure;
use std::fmt;
use std::time::Duration;

/// What happened during an admitted caller's cycle.
///
/// Handed to [`GovernorMiddleware::admitted`] once the operation has
/// returned, the throttling tail has elapsed and the gate is open again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub(crate) failure: Option<OperationFailure>,
    pub(crate) tail: Duration,
    pub(crate) first_run: bool,
}

impl Execution {
    /// The failure of the operation, if it failed.
    pub fn failure(&self) -> Option<&OperationFailure> {
        self.failure.as_ref()
    }

    /// Returns `true` if the operation neither panicked nor returned an error.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// How long the admitted caller held the gate closed after the operation returned.
    pub fn tail(&self) -> Duration {
        self.tail
    }

    /// Whether no earlier run was recorded for the key.
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }
}

/// Why a caller did not run the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The caller returned immediately.
    Dropped,

    /// The caller waited until the running cycle ended, or until
    /// blocking was turned off.
    Released,
}

/// Defines the behavior and return values of governed calls.
///
/// While the governor decides whether a caller runs the operation, the
/// middleware defines what the governed call methods return.
///
/// # Defining your own middleware
///
/// Here's an example of a middleware that tells the caller whether it
/// was the one that ran the operation:
///
/// ```rust
/// use call_governor::{Governor, middleware::{Execution, Exclusion, GovernorMiddleware}};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct DidRun;
///
/// impl<K> GovernorMiddleware<K> for DidRun {
///     type Outcome = bool;
///
///     fn admitted(_key: &K, _execution: Execution) -> bool { true }
///     fn excluded(_key: &K, _exclusion: Exclusion) -> bool { false }
/// }
///
/// let governor = Governor::direct(Duration::ZERO, || ()).with_middleware::<DidRun>();
/// assert!(governor.call());
/// ```
pub trait GovernorMiddleware<K>: fmt::Debug {
    /// The type that's returned by the governed call methods.
    type Outcome: Sized;

    /// Called on the admitted caller's thread after its cycle ended and
    /// the gate reopened.
    fn admitted(key: &K, execution: Execution) -> Self::Outcome;

    /// Called when a caller was turned away because another call held the gate.
    fn excluded(key: &K, exclusion: Exclusion) -> Self::Outcome;
}

/// A middleware that does nothing and returns `()`.
#[derive(Debug, Default)]
pub struct NoOpMiddleware;

impl<K> GovernorMiddleware<K> for NoOpMiddleware {
    /// By default, governed calls return nothing.
    type Outcome = ();

    #[inline]
    fn admitted(_key: &K, _execution: Execution) -> Self::Outcome {}

    #[inline]
    fn excluded(_key: &K, _exclusion: Exclusion) -> Self::Outcome {}
}

/// The value returned from governed calls by [`OutcomeMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The caller was admitted and ran the operation.
    Ran(Execution),

    /// The caller was turned away.
    Excluded(Exclusion),
}

impl CallOutcome {
    /// Returns `true` if this caller ran the operation.
    pub fn ran(&self) -> bool {
        matches!(self, CallOutcome::Ran(_))
    }
}

/// Middleware that returns a [`CallOutcome`] from every governed call.
#[derive(Debug, Default)]
pub struct OutcomeMiddleware;

impl<K> GovernorMiddleware<K> for OutcomeMiddleware {
    type Outcome = CallOutcome;

    fn admitted(_key: &K, execution: Execution) -> Self::Outcome {
        CallOutcome::Ran(execution)
    }

    fn excluded(_key: &K, exclusion: Exclusion) -> Self::Outcome {
        CallOutcome::Excluded(exclusion)
    }
}
