//! Test configuration types
//!
//! Defines the data structures for deserializing the YAML test
//! configuration and the validation applied after decoding.

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::common::{Error, Result};

/// A complete test configuration loaded from a YAML file
#[derive(Deserialize, Debug, Clone)]
pub struct TestConfig {
    /// Name of the configuration, must be non-empty
    #[serde(rename = "configName", default)]
    pub name: String,
    /// Test cases, run in order against every target
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// A single named shell check
#[derive(Deserialize, Debug, Clone)]
pub struct TestCase {
    /// Name of the test, must be non-empty
    #[serde(default)]
    pub name: String,
    /// Reserved flag. Parsed but not consulted by the executor.
    #[serde(rename = "os_env", default, deserialize_with = "yaml11_bool")]
    pub use_os_env: bool,
    /// Command line handed to the shell, must be non-empty
    #[serde(rename = "execString", default)]
    pub exec_command: String,
}

/// Accept YAML 1.1 boolean words (`yes`, `off`, ...) as well as plain
/// booleans. Null reads as false.
fn yaml11_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Word(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(value)) => Ok(value),
        Some(Flag::Word(word)) => match word.as_str() {
            "y" | "Y" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" | "true" | "True" | "TRUE" => {
                Ok(true)
            }
            "n" | "N" | "no" | "No" | "NO" | "off" | "Off" | "OFF" | "false" | "False"
            | "FALSE" => Ok(false),
            other => Err(D::Error::invalid_value(
                Unexpected::Str(other),
                &"a boolean",
            )),
        },
    }
}

impl TestConfig {
    /// Decode and validate a configuration document
    pub fn parse(data: &str) -> Result<Self> {
        let config: TestConfig =
            serde_yaml::from_str(data).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, decode and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        Self::parse(&content)
    }

    /// Check required fields, stopping at the first offending entry
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::MissingConfigName);
        }

        for (index, test) in self.tests.iter().enumerate() {
            if test.name.is_empty() {
                return Err(Error::empty_test_field(index, "name"));
            }
            if test.exec_command.is_empty() {
                return Err(Error::empty_test_field(index, "execString"));
            }
        }

        Ok(())
    }
}
