//! # A more in-depth guide to `call-governor`
//!
//! This guide walks through constructing governors, what their callers
//! observe, and how to share them between threads.
//!
//! # Constructing a governor
//!
//! Every governor needs a policy and an operation. The policy is a
//! minimum interval, optionally combined with a decision about what
//! callers that are turned away should do. A bare
//! [`Duration`][std::time::Duration] is a valid policy; so is a
//! [`Policy`][crate::Policy] built from a rate:
//!
//! ```rust
//! # use nonzero_ext::*;
//! use call_governor::{Governor, Policy};
//! use std::time::Duration;
//!
//! let flush = Governor::direct(Duration::from_secs(1), || println!("flushing"));
//! let ping = Governor::direct(Policy::per_minute(nonzero!(6u32)).blocking(), || ());
//! assert_eq!(ping.interval(), Duration::from_secs(10));
//! # drop(flush);
//! ```
//!
//! #### Operations that take arguments
//!
//! A direct governor can pass the arguments of the admitted call through
//! to the operation. Arguments of callers that are turned away are
//! simply dropped:
//!
//! ```rust
//! use call_governor::Governor;
//! use std::time::Duration;
//!
//! let report = Governor::direct_with_args(Duration::ZERO, |line: String| {
//!     eprintln!("{}", line);
//! });
//! report.call_with(String::from("cache is stale"));
//! ```
//!
//! #### Keyed governors
//!
//! A keyed governor keeps one interval per key, but still has one gate:
//! only a single call runs at any time, whatever its key.
//!
//! ```rust
//! use call_governor::Governor;
//! use std::time::Duration;
//!
//! let warn = Governor::keyed(Duration::ZERO, |disk: &&str| {
//!     eprintln!("{} is almost full", disk);
//! });
//! warn.call_key(&"/dev/sda1");
//! warn.call_key(&"/dev/sdb1");
//! assert_eq!(warn.len(), 2);
//! ```
//!
//! #### Fallible operations
//!
//! Operations may return a `Result`. An `Err` (like a panic) is logged
//! and otherwise ignored: it still counts as a run.
//!
//! ```rust
//! use call_governor::Governor;
//! use std::time::Duration;
//!
//! let governor = Governor::direct(Duration::ZERO, || -> Result<(), std::io::Error> {
//!     Err(std::io::Error::new(std::io::ErrorKind::Other, "upstream is down"))
//! });
//! governor.call();
//! assert!(governor.is_open());
//! ```
//!
//! #### Custom clocks
//!
//! Governors measure time with a [`Clock`][crate::clock::Clock]. The
//! [`FakeRelativeClock`][crate::clock::FakeRelativeClock] is mainly
//! useful in tests: sleeping on it advances it instead of blocking.
//!
//! ```rust
//! # use call_governor::{clock::{Clock, FakeRelativeClock}, Governor, Nanos};
//! # use std::time::Duration;
//! let clock = FakeRelativeClock::default();
//! let governor = Governor::direct_with_clock(Duration::from_secs(60), || (), clock.clone());
//! governor.call();
//! // The first run holds the gate closed for a full interval:
//! assert_eq!(clock.now(), Nanos::from(Duration::from_secs(60)));
//! ```
//!
//! # Data ownership and references to governors
//!
//! A governor's state is kept behind atomics and locks, and so it is
//! perfectly valid to have multiple references to a governor in a
//! program. All of its methods, including the configuration setters,
//! take `&self`. Governors can not be cloned.
//!
//! Calling a governor from within its own operation is always turned
//! away, since the caller running the operation holds the gate; with a
//! blocking governor, such a call never returns.
//!
//! # Usage in multiple threads
//!
//! Sharing references to a governor across threads is completely
//! OK (governors are Send and Sync), but a governor's lifetime might be
//! up before a thread ends, which would invalidate the reference.
//!
//! #### `crossbeam` scoped tasks
//!
//! The `crossbeam` crate's scopes allow code to guarantee that a thread
//! spawned in a scope terminates before the scope terminates. This
//! allows using stack-allocated governors:
//!
//! ```rust
//! # use call_governor::Governor;
//! # use std::time::Duration;
//! let governor = Governor::direct(Duration::from_millis(20), || ());
//!
//! crossbeam::scope(|scope| {
//!     for _i in 0..20 {
//!         scope.spawn(|_| governor.call());
//!     }
//! })
//! .unwrap();
//! ```
//!
//! #### Wrapping the governor in an [`Arc`][std::sync::Arc]
//!
//! The other method uses only the standard library: Wrapping the
//! governor in an [`Arc`][std::sync::Arc] will keep it alive for as
//! long as there exist references to it - perfect for passing to
//! threads.
//!
//! ```rust
//! # use call_governor::Governor;
//! # use std::sync::Arc;
//! # use std::thread;
//! # use std::time::Duration;
//! let governor = Arc::new(Governor::direct(Duration::from_millis(1), || ()));
//! for _i in 0..5 {
//!     let governor = governor.clone();
//!     thread::spawn(move || governor.call()).join().unwrap();
//! }
//! ```
