#![forbid(unsafe_code)]

//! Log macros for the terminal lifecycle.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it
//! they expand to nothing, so `crate::info!(...)` call sites build either
//! way and a plain embedding pays nothing for them.

#[cfg(feature = "tracing")]
pub use tracing::{info, warn};

#[cfg(not(feature = "tracing"))]
mod silent {
    /// Expands to nothing.
    #[macro_export]
    macro_rules! info {
        ($($tt:tt)*) => {};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! warn {
        ($($tt:tt)*) => {};
    }
}
