//! Logging macros.
//!
//! With the `defmt` feature enabled these forward to the matching `defmt`
//! macro. Without it the format string and arguments are still evaluated,
//! then discarded, so arguments must be `Copy` or borrowed and free of side
//! effects. Arguments must implement `defmt::Format` when the feature is on.

macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);

        #[cfg(not(feature = "defmt"))]
        let _ = ($fmt, $($arg),*);
    }};
}

macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($fmt $(, $arg)*);

        #[cfg(not(feature = "defmt"))]
        let _ = ($fmt, $($arg),*);
    }};
}

macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);

        #[cfg(not(feature = "defmt"))]
        let _ = ($fmt, $($arg),*);
    }};
}
