//! Logging shims.
//!
//! With the `tracing` feature the `tracing` macros are re-exported. Without it
//! the same names expand to nothing, so call sites stay free of `cfg`
//! attributes. `warn` is exposed as `warning` because a local `warn` macro
//! would be ambiguous with the built-in `#[warn]` lint attribute.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn as warning};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warning {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace, warning};
