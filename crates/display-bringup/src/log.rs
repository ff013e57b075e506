//! Logging shims.
//!
//! Hardware builds log through `defmt`, desktop builds through `tracing`.
//! With neither feature enabled the arguments are still evaluated by
//! reference so call sites compile identically in every configuration.
//!
//! Arguments must implement `core::fmt::Display` and, with `defmt` enabled,
//! `defmt::Format`.

macro_rules! bringup_log {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($fmt $(, $arg)*);
        #[cfg(feature = "tracing")]
        tracing::$level!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

macro_rules! debug {
    ($($t:tt)*) => { bringup_log!(debug, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { bringup_log!(info, $($t)*) };
}

#[allow(unused_macros)]
macro_rules! warn {
    ($($t:tt)*) => { bringup_log!(warn, $($t)*) };
}

macro_rules! error {
    ($($t:tt)*) => { bringup_log!(error, $($t)*) };
}
