//! Host test runner
//!
//! Loads a YAML test configuration and a targets file, then runs each
//! test's shell command once per target host.

mod config;
mod hosts;
mod runner;

pub use config::*;
pub use hosts::{load_hosts, parse_hosts};
pub use runner::{run_tests, Executor, RunSummary, Shell, TARGET_ENV};
