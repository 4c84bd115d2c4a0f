//! Command-driven simulation over a [`BlockList`]
//!
//! The simulator applies commands strictly in input order, one at a time.
//! Every command yields an [`Event`]; failed commands leave the block list
//! untouched and processing continues with the next one.

use crate::block::Block;
use crate::block_list::BlockList;
use crate::command::Command;
use crate::config::SimConfig;
use crate::error::{FailureReason, Result};
use crate::stats::{Counters, SimulationStats};
use crate::validation::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Request,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(FailureReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("SUCCESS"),
            Outcome::Failure(reason) => write!(f, "FAILED ({})", reason),
        }
    }
}

/// Result of applying one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: CommandKind,
    pub process: ProcessId,
    /// Requested size, `None` for releases
    pub size: Option<u64>,
    pub outcome: Outcome,
    /// Block placed by a request or freed by a release (before coalescing)
    pub block: Option<Block>,
}

/// Drives a [`BlockList`] from a command stream and keeps the run counters
#[derive(Debug, Clone)]
pub struct Simulator {
    blocks: BlockList,
    counters: Counters,
    config: SimConfig,
}

impl Simulator {
    /// Start a run over `total_memory` units with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidSize` if `total_memory` is zero.
    pub fn new(total_memory: u64) -> Result<Self> {
        Self::with_config(total_memory, SimConfig::default())
    }

    pub fn with_config(total_memory: u64, config: SimConfig) -> Result<Self> {
        info!("Initializing simulator with {} {}", total_memory, config.unit);
        Ok(Simulator {
            blocks: BlockList::new(total_memory)?,
            counters: Counters::default(),
            config,
        })
    }

    /// Re-initialize the block list and clear the counters
    pub fn reset(&mut self, total_memory: u64) -> Result<()> {
        self.blocks.reset(total_memory)?;
        self.counters = Counters::default();
        Ok(())
    }

    /// Apply a single command
    ///
    /// Allocation and release failures are reported through the event's
    /// outcome. An `Err` means the run cannot continue, e.g. invariant
    /// checking is enabled and the block list has been corrupted.
    pub fn apply(&mut self, command: &Command) -> Result<Event> {
        let event = match command {
            Command::Request { process, size } => self.request(process, *size)?,
            Command::Release { process } => self.release(process)?,
        };

        debug!(
            "{:?} {} {:?} -> {}",
            event.kind, event.process, event.size, event.outcome
        );

        if self.config.verify_invariants {
            self.blocks.check_invariants()?;
        }

        Ok(event)
    }

    fn request(&mut self, process: &ProcessId, size: u64) -> Result<Event> {
        let (outcome, block) = into_outcome(self.blocks.allocate(process, size))?;

        if outcome.is_success() {
            self.counters.successful_allocations += 1;
        } else {
            self.counters.failed_allocations += 1;
        }

        Ok(Event {
            kind: CommandKind::Request,
            process: process.clone(),
            size: Some(size),
            outcome,
            block,
        })
    }

    fn release(&mut self, process: &ProcessId) -> Result<Event> {
        let (outcome, block) = into_outcome(self.blocks.release(process.as_str()))?;

        if outcome.is_success() {
            self.counters.successful_releases += 1;
        } else {
            self.counters.failed_releases += 1;
        }

        Ok(Event {
            kind: CommandKind::Release,
            process: process.clone(),
            size: None,
            outcome,
            block,
        })
    }

    /// Apply commands in order, collecting one event per command
    pub fn run<'a, I>(&mut self, commands: I) -> Result<Vec<Event>>
    where
        I: IntoIterator<Item = &'a Command>,
    {
        let events = commands
            .into_iter()
            .map(|command| self.apply(command))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Processed {} commands ({} allocations ok, {} failed)",
            events.len(),
            self.counters.successful_allocations,
            self.counters.failed_allocations
        );

        Ok(events)
    }

    pub fn statistics(&self) -> SimulationStats {
        SimulationStats {
            memory: self.blocks.statistics(),
            counters: self.counters,
        }
    }

    /// Current blocks in address order
    pub fn blocks(&self) -> &[Block] {
        self.blocks.blocks()
    }

    pub fn block_list(&self) -> &BlockList {
        &self.blocks
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Turn a per-command error into a failed outcome; anything else propagates
fn into_outcome(result: Result<Block>) -> Result<(Outcome, Option<Block>)> {
    match result {
        Ok(block) => Ok((Outcome::Success, Some(block))),
        Err(err) => match err.failure_reason() {
            Some(reason) => Ok((Outcome::Failure(reason), None)),
            None => Err(err),
        },
    }
}
