//! # call-governor - a single-flight call governor
//!
//! This library protects an operation from being run too often and too concurrently: a
//! [`Governor`] wraps the operation, lets at most one caller run it at a time, and after
//! each run keeps every other caller out until a minimum interval has passed since the
//! previous run. It's meant for noisy, repeatedly-triggered work - retries, log emission,
//! periodic refreshes - where running the work once on behalf of a crowd of callers is
//! exactly what you want.
//!
//! # How it works
//!
//! A governor has a single admission gate. A caller closes it with one atomic swap; whoever
//! closed it runs the operation, then waits out the *throttling tail* (what's left of the
//! interval since the previous run for the same key) and reopens the gate. Callers that find
//! the gate closed never run the operation: they either return immediately (the default) or,
//! if the governor is blocking, wait until the running cycle is over.
//!
//! If the operation panics or returns an `Err`, the failure is logged through
//! [`tracing`](https://docs.rs/tracing) and the cycle continues as if the operation had
//! returned normally, so a failing operation can't wedge the governor.
//!
//! # Quick example
//!
//! ```rust
//! use call_governor::Governor;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let refreshes = Arc::new(AtomicUsize::new(0));
//! let governor = Governor::direct(Duration::from_millis(10), {
//!     let refreshes = Arc::clone(&refreshes);
//!     move || {
//!         refreshes.fetch_add(1, Ordering::SeqCst);
//!     }
//! });
//!
//! governor.call(); // runs, then holds the gate closed for 10ms
//! governor.call(); // runs again: the gate reopened once the first call returned
//! assert_eq!(refreshes.load(Ordering::SeqCst), 2);
//! ```
//!
//! For a more in-depth guide, see the [guide module](_guide/index.html).

pub mod _guide;
pub mod clock;
mod cycle;
mod errors;
mod gate;
#[cfg(feature = "jitter")]
mod jitter;
pub mod middleware;
pub mod nanos;
mod policy;
pub mod state;

pub use errors::*;
#[cfg(feature = "jitter")]
pub use jitter::Jitter;
pub use nanos::Nanos;
pub use policy::Policy;
pub use state::Governor;

/// A direct (not keyed) governor using the default clock.
pub type DefaultDirectGovernor<MW = middleware::NoOpMiddleware> =
    Governor<state::NotKeyed, state::InMemoryState, clock::DefaultClock, MW>;

/// A keyed governor using the default keyed state store and clock.
pub type DefaultKeyedGovernor<K, MW = middleware::NoOpMiddleware> =
    Governor<K, state::keyed::DefaultKeyedStateStore<K>, clock::DefaultClock, MW>;

/// The collection of traits and types you'll most often need.
pub mod prelude {
    pub use crate::clock::{Clock, Reference};
    pub use crate::middleware::GovernorMiddleware;
    pub use crate::state::keyed::KeyedStateStore;
    pub use crate::state::{DirectStateStore, StateStore};
    pub use crate::{Completion, Governor, Policy};
}
