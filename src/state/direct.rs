//! Direct governors (those that can only hold one state).
//!
//! Governors based on these types are constructed with
//! [the `Governor` constructors](../struct.Governor.html#direct-governors---constructors)

use crate::errors::Completion;
use crate::{
    clock, middleware::GovernorMiddleware, middleware::NoOpMiddleware, state::InMemoryState,
    Policy,
};

use super::{operation, Governor, StateStore};

/// The "this state store does not use keys" key type.
///
/// It's possible to use this to create a "direct" governor. It explicitly does not implement
/// [`Hash`][std::hash::Hash] so that it is possible to tell apart from "hashable" key types.
#[derive(PartialEq, Debug, Eq)]
pub enum NotKeyed {
    /// The value given to state stores' methods.
    NonKey,
}

/// A trait for state stores that only keep one state.
///
/// This is blanket-implemented by all [`StateStore`]s with [`NotKeyed`] key associated types.
pub trait DirectStateStore: StateStore<Key = NotKeyed> {}

impl<T> DirectStateStore for T where T: StateStore<Key = NotKeyed> {}

/// # Direct governors - Constructors
///
/// Here we construct an in-memory governor that keeps a single interval for every call.
/// Direct governors can be used to e.g. refresh a cache at most once a second no matter how
/// many threads notice it's stale, or to emit a noisy log line at most once a minute.
impl Governor<NotKeyed, InMemoryState, clock::DefaultClock, NoOpMiddleware> {
    /// Constructs a new direct governor for an operation that takes no arguments.
    ///
    /// The governor starts out open and dropping; `policy` may be a bare [`Duration`][std::time::Duration].
    pub fn direct<F, R>(policy: impl Into<Policy>, operation: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Completion,
    {
        let clock = clock::DefaultClock::default();
        Self::direct_with_clock(policy, operation, clock)
    }
}

impl<C> Governor<NotKeyed, InMemoryState, C, NoOpMiddleware>
where
    C: clock::Clock,
{
    /// Constructs a new direct governor with a custom clock.
    pub fn direct_with_clock<F, R>(policy: impl Into<Policy>, operation: F, clock: C) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Completion,
    {
        let state: InMemoryState = Default::default();
        Governor::new(policy, state, clock, move |_: &NotKeyed, ()| operation())
    }
}

impl<A> Governor<NotKeyed, InMemoryState, clock::DefaultClock, NoOpMiddleware, A> {
    /// Constructs a new direct governor for an operation that is passed the arguments of each
    /// admitted call.
    ///
    /// Arguments of callers that are turned away are dropped.
    pub fn direct_with_args<F, R>(policy: impl Into<Policy>, operation: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        R: Completion,
    {
        let state: InMemoryState = Default::default();
        let clock = clock::DefaultClock::default();
        Governor::new(policy, state, clock, move |_: &NotKeyed, args: A| {
            operation(args)
        })
    }
}

/// # Direct governors - Making calls
impl<S, C, MW> Governor<NotKeyed, S, C, MW>
where
    S: DirectStateStore,
    C: clock::Clock,
    MW: GovernorMiddleware<NotKeyed>,
{
    /// Attempts a governed call of the operation.
    ///
    /// If the gate is open, this caller runs the operation, then holds the gate closed for
    /// the remainder of the interval. Otherwise, the call returns without running anything:
    /// immediately, or once the current cycle ends if the governor is blocking.
    pub fn call(&self) -> MW::Outcome {
        self.govern(&NotKeyed::NonKey, ())
    }

    /// Replaces the governed operation. Runs already in progress finish with the old one.
    pub fn set_operation<F, R>(&self, operation: F)
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Completion,
    {
        self.replace_operation(self::operation(move |_: &NotKeyed, ()| operation()))
    }
}

/// # Direct governors - Making calls with arguments
impl<S, C, MW, A> Governor<NotKeyed, S, C, MW, A>
where
    S: DirectStateStore,
    C: clock::Clock,
    MW: GovernorMiddleware<NotKeyed>,
{
    /// Attempts a governed call of the operation, passing `args` to it if this caller is
    /// admitted.
    pub fn call_with(&self, args: A) -> MW::Outcome {
        self.govern(&NotKeyed::NonKey, args)
    }

    /// Replaces the governed operation of a governor that passes arguments through.
    pub fn set_operation_with<F, R>(&self, operation: F)
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        R: Completion,
    {
        self.replace_operation(self::operation(move |_: &NotKeyed, args: A| {
            operation(args)
        }))
    }
}
