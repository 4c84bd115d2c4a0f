//! Line-oriented command scripts
//!
//! ```text
//! 1000
//! REQUEST P1 300
//! REQUEST P2 200
//! RELEASE P1
//! ```
//!
//! The first non-blank line holds the total memory size. Each following
//! line is `REQUEST <process> <size>` or `RELEASE <process>`. Blank lines
//! are skipped and lines with an unknown keyword are ignored with a warning.

use crate::error::{Result, SimError};
use crate::validation::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// A single allocator command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Request { process: ProcessId, size: u64 },
    Release { process: ProcessId },
}

impl Command {
    pub fn request(process: &str, size: u64) -> Result<Self> {
        Ok(Command::Request {
            process: ProcessId::new(process)?,
            size,
        })
    }

    pub fn release(process: &str) -> Result<Self> {
        Ok(Command::Release {
            process: ProcessId::new(process)?,
        })
    }

    pub fn process(&self) -> &ProcessId {
        match self {
            Command::Request { process, .. } | Command::Release { process } => process,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Request { process, size } => write!(f, "REQUEST {} {}", process, size),
            Command::Release { process } => write!(f, "RELEASE {}", process),
        }
    }
}

/// A parsed script: address space size followed by commands in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub total_memory: u64,
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading script from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        parse_script(&contents)
    }
}

impl FromStr for Script {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        parse_script(s)
    }
}

/// Parse a whole script
///
/// # Errors
///
/// `MissingTotalMemory` if the input has no non-blank line, `Parse` with a
/// 1-based line number for malformed lines.
pub fn parse_script(input: &str) -> Result<Script> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line_no, first) = lines.next().ok_or(SimError::MissingTotalMemory)?;
    let total_memory = first.parse::<u64>().map_err(|_| SimError::Parse {
        line: line_no,
        message: format!("expected total memory size, found '{}'", first),
    })?;

    let mut commands = Vec::new();
    for (line_no, line) in lines {
        if let Some(command) = parse_line(line_no, line)? {
            commands.push(command);
        }
    }

    debug!(
        "Parsed script: total memory {}, {} commands",
        total_memory,
        commands.len()
    );

    Ok(Script {
        total_memory,
        commands,
    })
}

/// Parse one command line
///
/// Returns `Ok(None)` for blank lines and unknown keywords.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let parse_err = |message: String| SimError::Parse {
        line: line_no,
        message,
    };

    match tokens.as_slice() {
        [] => Ok(None),
        ["REQUEST", process, size] => {
            let size = size
                .parse::<u64>()
                .map_err(|_| parse_err(format!("invalid size '{}'", size)))?;
            let process = ProcessId::new(*process).map_err(|e| parse_err(e.to_string()))?;
            Ok(Some(Command::Request { process, size }))
        }
        ["RELEASE", process] => {
            let process = ProcessId::new(*process).map_err(|e| parse_err(e.to_string()))?;
            Ok(Some(Command::Release { process }))
        }
        ["REQUEST", ..] => Err(parse_err(format!(
            "REQUEST expects a process and a size, found {} arguments",
            tokens.len() - 1
        ))),
        ["RELEASE", ..] => Err(parse_err(format!(
            "RELEASE expects a process, found {} arguments",
            tokens.len() - 1
        ))),
        [keyword, ..] => {
            warn!("Skipping line {}: unknown command '{}'", line_no, keyword);
            Ok(None)
        }
    }
}
