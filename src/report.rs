//! Run reports
//!
//! A [`SimulationReport`] bundles everything a run produced: the events in
//! command order, the final block sequence and the statistics. It renders
//! as a console-style text report or serializes to JSON.

use crate::block::{Block, Owner};
use crate::command::Script;
use crate::config::SimConfig;
use crate::error::Result;
use crate::simulator::{CommandKind, Event, Simulator};
use crate::stats::SimulationStats;
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

/// Everything produced by one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Where the commands came from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub unit: String,
    pub total_memory: u64,
    pub events: Vec<Event>,
    pub blocks: Vec<Block>,
    pub stats: SimulationStats,
}

impl SimulationReport {
    /// Capture the final state of `sim` together with the events of the run
    pub fn new(sim: &Simulator, events: Vec<Event>) -> Self {
        SimulationReport {
            source: None,
            unit: sim.config().unit.clone(),
            total_memory: sim.block_list().total_memory(),
            events,
            blocks: sim.block_list().snapshot(),
            stats: sim.statistics(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Text rendering; use `to_string()` or `{}` on the result
    pub fn text(&self, show_events: bool) -> TextReport<'_> {
        TextReport {
            report: self,
            show_events,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Run a parsed script from a fresh simulator
pub fn run_script(script: &Script, config: SimConfig) -> Result<SimulationReport> {
    let mut sim = Simulator::with_config(script.total_memory, config)?;
    let events = sim.run(&script.commands)?;
    Ok(SimulationReport::new(&sim, events))
}

/// One line per event, e.g. `REQUEST P1 300 KB → SUCCESS`
pub fn format_event(event: &Event, unit: &str) -> String {
    match (event.kind, event.size) {
        (CommandKind::Request, Some(size)) => format!(
            "REQUEST {} {} {} → {}",
            event.process, size, unit, event.outcome
        ),
        (CommandKind::Request, None) => {
            format!("REQUEST {} → {}", event.process, event.outcome)
        }
        (CommandKind::Release, _) => format!("RELEASE {} → {}", event.process, event.outcome),
    }
}

/// One line per block, numbered from 1
pub fn format_block(index: usize, block: &Block, unit: &str) -> String {
    match &block.owner {
        Owner::Free => format!(
            "Block {}: [{}-{}]  FREE ({} {})",
            index + 1,
            block.start,
            block.end(),
            block.size,
            unit
        ),
        Owner::Owned(process) => format!(
            "Block {}: [{}-{}]  {} ({} {}) - ALLOCATED",
            index + 1,
            block.start,
            block.end(),
            process,
            block.size,
            unit
        ),
    }
}

/// Console-style rendering of a [`SimulationReport`]
pub struct TextReport<'a> {
    report: &'a SimulationReport,
    show_events: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let unit = r.unit.as_str();

        writeln!(f, "{}", RULE)?;
        writeln!(f, "Memory Allocation Simulator (First-Fit)")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        if let Some(source) = &r.source {
            writeln!(f, "Reading from: {}", source)?;
        }
        writeln!(f, "Total Memory: {} {}", r.total_memory, unit)?;
        writeln!(f, "{}", THIN_RULE)?;
        writeln!(f)?;

        if self.show_events {
            writeln!(f, "Processing requests...")?;
            writeln!(f)?;
            for event in &r.events {
                writeln!(f, "{}", format_event(event, unit))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", RULE)?;
        writeln!(f, "Final Memory State")?;
        writeln!(f, "{}", RULE)?;
        for (i, block) in r.blocks.iter().enumerate() {
            writeln!(f, "{}", format_block(i, block, unit))?;
        }
        writeln!(f)?;

        let m = &r.stats.memory;
        let c = &r.stats.counters;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Memory Statistics")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Total Memory:           {} {}", m.total_memory, unit)?;
        writeln!(f, "Allocated Memory:       {} {}", m.allocated_memory, unit)?;
        writeln!(f, "Free Memory:            {} {}", m.free_memory, unit)?;
        writeln!(f, "Number of Processes:    {}", m.process_count)?;
        writeln!(f, "Number of Free Blocks:  {}", m.free_block_count)?;
        writeln!(f, "Largest Free Block:     {} {}", m.largest_free_block, unit)?;
        writeln!(f, "External Fragmentation: {:.2}%", m.external_fragmentation)?;
        writeln!(f)?;
        writeln!(f, "Successful Allocations: {}", c.successful_allocations)?;
        writeln!(f, "Failed Allocations:     {}", c.failed_allocations)?;
        writeln!(f, "{}", RULE)
    }
}
