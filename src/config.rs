use crate::error::Result;
use crate::ingest::DEFAULT_SET_CODE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Set-level settings for a catalog export, usually read from a TOML file:
///
/// ```toml
/// set_code = "SBA"
/// long_name = "Sandbox Alpha"
/// release_date = "2024-05-01"
/// expand_rule_names = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub set_code: String,
    pub long_name: String,
    #[serde(default)]
    pub release_date: String,
    /// Write the card name in place of `~` in exported rule text.
    #[serde(default)]
    pub expand_rule_names: bool,
}

impl ExportOptions {
    pub fn new(
        set_code: impl Into<String>,
        long_name: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        ExportOptions {
            set_code: set_code.into(),
            long_name: long_name.into(),
            release_date: release_date.into(),
            expand_rule_names: false,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        ExportOptions::from_toml_str(&s)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions::new(DEFAULT_SET_CODE, DEFAULT_SET_CODE, "")
    }
}
