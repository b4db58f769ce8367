//! Common utilities shared by the loaders and the executor

pub mod error;
pub mod logging;

pub use error::{Error, Result};
