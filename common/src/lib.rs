//! Shared models for `probr`.
//!
//! Everything that crosses crate boundaries lives here: the [`network::target::Target`]
//! being probed, the typed probe results, the error taxonomy and the logging macros
//! used by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
