//! Simulator configuration
//!
//! Settings can come from a TOML file and are overridden by CLI flags.
//!
//! ```toml
//! unit = "KB"
//! format = "text"
//! verify_invariants = true
//! show_events = true
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output format of the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(SimError::Config(format!(
                "Invalid report format '{}'. Valid options: text, json",
                s
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Unit label printed after sizes
    pub unit: String,

    pub format: ReportFormat,

    /// Check every block list invariant after each command
    pub verify_invariants: bool,

    /// Include per-command lines in the text report
    pub show_events: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            unit: "KB".to_string(),
            format: ReportFormat::Text,
            verify_invariants: false,
            show_events: true,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(s).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.unit.trim().is_empty() {
            return Err(SimError::Config("unit label cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.unit, "KB");
        assert_eq!(config.format, ReportFormat::Text);
        assert!(!config.verify_invariants);
        assert!(config.show_events);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimConfig::from_toml_str("format = \"json\"\nverify_invariants = true\n").unwrap();
        assert_eq!(config.format, ReportFormat::Json);
        assert!(config.verify_invariants);
        assert_eq!(config.unit, "KB");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SimConfig::from_toml_str("format = \"yaml\""),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("colour = true"),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("unit = \"  \""),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig {
            unit: "MB".to_string(),
            format: ReportFormat::Json,
            verify_invariants: true,
            show_events: false,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
