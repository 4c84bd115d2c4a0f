//! Error types for simulator operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Simulator result type
pub type Result<T> = std::result::Result<T, SimError>;

/// Simulator errors
///
/// The first group of variants are ordinary per-command outcomes: the
/// simulator reports them as failed events and keeps going. The rest are
/// contract violations, input errors or I/O failures.
#[derive(Error, Debug)]
pub enum SimError {
    /// Sizes and the address space must be strictly positive
    #[error("Invalid size: {0} (must be greater than zero)")]
    InvalidSize(u64),

    /// No free block is large enough for the request
    #[error("Insufficient memory: {process} requested {requested}, largest free block is {largest_free}")]
    InsufficientMemory {
        process: String,
        requested: u64,
        largest_free: u64,
    },

    /// Release names a process that owns no block
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    /// Request names a process that already owns a block
    #[error("Process already owns a block: {0}")]
    DuplicateProcess(String),

    #[error("Invalid process name: {0}")]
    InvalidProcessName(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Input does not start with a total memory size")]
    MissingTotalMemory,

    /// Block list no longer partitions the address space correctly
    #[error("Block list invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Map a per-command failure onto the reason carried by its event
    ///
    /// Returns `None` for errors that are not command outcomes.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            SimError::InvalidSize(_) => Some(FailureReason::InvalidSize),
            SimError::InsufficientMemory { .. } => Some(FailureReason::InsufficientMemory),
            SimError::ProcessNotFound(_) => Some(FailureReason::ProcessNotFound),
            SimError::DuplicateProcess(_) => Some(FailureReason::DuplicateProcess),
            _ => None,
        }
    }
}

/// Why a single REQUEST or RELEASE did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InsufficientMemory,
    ProcessNotFound,
    InvalidSize,
    DuplicateProcess,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureReason::InsufficientMemory => "Insufficient Memory",
            FailureReason::ProcessNotFound => "Process Not Found",
            FailureReason::InvalidSize => "Invalid Size",
            FailureReason::DuplicateProcess => "Duplicate Process",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_mapping() {
        let err = SimError::InsufficientMemory {
            process: "P1".to_string(),
            requested: 800,
            largest_free: 700,
        };
        assert_eq!(err.failure_reason(), Some(FailureReason::InsufficientMemory));
        assert_eq!(
            SimError::ProcessNotFound("P9".to_string()).failure_reason(),
            Some(FailureReason::ProcessNotFound)
        );
        assert_eq!(SimError::MissingTotalMemory.failure_reason(), None);
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::InsufficientMemory.to_string(),
            "Insufficient Memory"
        );
        assert_eq!(FailureReason::ProcessNotFound.to_string(), "Process Not Found");
    }
}
