//! Host tester - run shell checks against a list of targets
//!
//! Each test case from a YAML configuration is executed once per target
//! host with `TARGET` set in its environment; the run passes only if
//! every (host, test) pair exits successfully.

pub mod common;
pub mod testing;

pub use common::{Error, Result};
pub use testing::{Executor, TestCase, TestConfig};
