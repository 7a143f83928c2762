//! Discovery engine: the protocol cascade, response classification and the
//! reconnaissance that runs when nothing answers.

pub mod cascade;
pub mod classifier;
pub mod prober;
pub mod recon;

pub use cascade::{Cascade, Discovery, Reporter, TracingReporter};
pub use prober::{NetworkProber, Prober};
