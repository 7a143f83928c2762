//! Logging macros.
//!
//! Thin wrappers over `tracing` with fixed targets, so the terminal formatter can
//! tell a plain informational line from a success line without parsing messages.

pub const TARGET: &str = "probr";
pub const TARGET_SUCCESS: &str = "probr::success";
pub const TARGET_PRINT: &str = "probr::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::TARGET_SUCCESS, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: $crate::log::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: $crate::log::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: $crate::log::TARGET, $($arg)*)
    };
}
