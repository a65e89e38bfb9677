//! End-to-end self-check for `simsearch`.
//!
//! Generates a random candidate set and queries, runs k-NN under every
//! configured metric and verifies each ranking against an independent full
//! sort of the pairwise distances.

pub mod config;
pub mod runner;

pub use config::{ConfigError, DemoConfig, WorkloadConfig};
pub use runner::{run, DemoError, DemoReport, MetricReport};
