cfg_if::cfg_if! {
    if #[cfg(feature = "quanta")] {
        /// The default clock, reporting [`QuantaInstant`][crate::clock::QuantaInstant]s.
        pub type DefaultClock = crate::clock::QuantaClock;
    } else {
        /// The default clock using [`std::time::Instant`]s.
        pub type DefaultClock = crate::clock::MonotonicClock;
    }
}
