//! Configuration file support
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! output = "planner.xlsx"
//! sheet_name = "Planner"
//! color_fill = true
//! tick_seconds = 60
//! bell = true
//! log_file = "weekplan.log"
//! ```
//!
//! Lookup order: `--config` / `WEEKPLAN_CONFIG`, then `weekplan.toml` in the
//! working directory, then built-in defaults. Command-line flags override
//! whatever the file says.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "weekplan.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Workbook rewritten after every change
    pub output: PathBuf,
    /// Worksheet name inside the workbook
    pub sheet_name: String,
    /// Fill each row's Color cell with its priority color
    pub color_fill: bool,
    /// Seconds between notification scans
    pub tick_seconds: u64,
    /// Ring the terminal bell with each reminder
    pub bell: bool,
    /// Append logs to this file as well as stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("planner.xlsx"),
            sheet_name: "Planner".into(),
            color_fill: true,
            tick_seconds: 60,
            bell: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Load from an explicit path, else `weekplan.toml` if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tick_seconds == 0 {
            bail!("tick_seconds must be at least 1");
        }
        if self.sheet_name.trim().is_empty() {
            bail!("sheet_name must not be empty");
        }
        Ok(())
    }
}
