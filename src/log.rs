//! Logging shims.
//!
//! With the `defmt` feature the macros forward to `defmt`; on host builds
//! they expand to nothing at runtime but still type-check their arguments.
//! Messages stick to `{}`/`{:?}` placeholders so both backends accept them.

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {
        if false {
            $crate::log::sink(::core::format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {
        if false {
            $crate::log::sink(::core::format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {
        if false {
            $crate::log::sink(::core::format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "defmt"))]
#[doc(hidden)]
#[inline(always)]
pub fn sink(_args: core::fmt::Arguments<'_>) {}
