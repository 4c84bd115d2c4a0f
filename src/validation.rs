//! Validation for process identifiers
//!
//! Process names arrive as whitespace-separated tokens in the command
//! stream. This module makes sure every name that reaches the block list
//! is something the text format can round-trip.

use crate::error::{Result, SimError};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validated process identifier
///
/// # Rules
/// - Non-empty
/// - No whitespace (the command format splits on it)
/// - Length: 1-64 characters
///
/// # Examples
///
/// ```
/// use firstfit_sim::ProcessId;
///
/// let pid = ProcessId::new("P1").unwrap();
/// assert_eq!(pid.as_str(), "P1");
///
/// assert!(ProcessId::new("").is_err());
/// assert!(ProcessId::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessId(String);

impl ProcessId {
    const PATTERN: &'static str = r"^\S+$";

    /// Maximum length in characters
    pub const MAX_LENGTH: usize = 64;

    /// Create a new validated process identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidProcessName` if the name doesn't meet validation rules.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(ProcessId(name))
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SimError::InvalidProcessName(
                "process name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > Self::MAX_LENGTH {
            return Err(SimError::InvalidProcessName(format!(
                "process name too long (max {} characters)",
                Self::MAX_LENGTH
            )));
        }

        let re = Regex::new(Self::PATTERN)
            .map_err(|e| SimError::InvalidProcessName(e.to_string()))?;
        if !re.is_match(name) {
            return Err(SimError::InvalidProcessName(format!(
                "process name '{}' must not contain whitespace",
                name
            )));
        }

        Ok(())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProcessId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProcessId {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self> {
        ProcessId::new(value)
    }
}

impl TryFrom<&str> for ProcessId {
    type Error = SimError;

    fn try_from(value: &str) -> Result<Self> {
        ProcessId::new(value)
    }
}

impl From<ProcessId> for String {
    fn from(pid: ProcessId) -> Self {
        pid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(ProcessId::new("P1").is_ok());
        assert!(ProcessId::new("worker-7").is_ok());
        assert!(ProcessId::new("db_cache").is_ok());
        assert!(ProcessId::new("a").is_ok());
        assert!(ProcessId::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(ProcessId::new("").is_err()); // empty
        assert!(ProcessId::new("P 1").is_err()); // space
        assert!(ProcessId::new("P\t1").is_err()); // tab
        assert!(ProcessId::new(" P1").is_err()); // leading whitespace
        assert!(ProcessId::new("x".repeat(65)).is_err()); // too long
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let pid: ProcessId = serde_json::from_str("\"P1\"").unwrap();
        assert_eq!(pid.as_str(), "P1");

        let bad: std::result::Result<ProcessId, _> = serde_json::from_str("\"has space\"");
        assert!(bad.is_err());
    }
}
