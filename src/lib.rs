//! # firstfit-sim - Contiguous Memory Allocation Simulator
//!
//! `firstfit-sim` simulates a single-level, contiguous address space managed
//! with the **First-Fit** placement policy:
//!
//! - **Block list**: memory is an ordered partition of `[0, total)` into free
//!   and owned blocks with no gaps or overlaps
//! - **First-Fit placement**: a request takes the lowest-addressed free block
//!   that is large enough and splits off the remainder
//! - **Coalescing**: releasing a block merges it with adjacent free blocks
//! - **Statistics**: utilization, largest free block and external fragmentation
//!
//! ## Quick Start
//!
//! ```rust
//! use firstfit_sim::{Command, Result, Simulator};
//!
//! # fn main() -> Result<()> {
//! let mut sim = Simulator::new(1000)?;
//!
//! sim.apply(&Command::request("P1", 300)?)?;
//! sim.apply(&Command::request("P2", 200)?)?;
//! sim.apply(&Command::release("P1")?)?;
//!
//! let stats = sim.statistics();
//! assert_eq!(stats.memory.allocated_memory, 200);
//! assert_eq!(stats.memory.free_block_count, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scripts
//!
//! ```rust
//! use firstfit_sim::{parse_script, run_script, SimConfig};
//!
//! # fn main() -> firstfit_sim::Result<()> {
//! let script = parse_script("1000\nREQUEST P1 300\nREQUEST P2 800\n")?;
//! let report = run_script(&script, SimConfig::default())?;
//!
//! assert_eq!(report.stats.counters.failed_allocations, 1);
//! println!("{}", report.text(true));
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! ```text
//!  0          300                  1000
//!  ├──────────┼─────────────────────┤
//!  │ P1 (300) │     FREE (700)      │
//!  └──────────┴─────────────────────┘
//! ```

pub mod block;
pub mod block_list;
pub mod command;
pub mod config;
pub mod error;
pub mod report;
pub mod simulator;
pub mod stats;
pub mod validation;

pub use block::{Block, Owner};
pub use block_list::BlockList;
pub use command::{parse_line, parse_script, Command, Script};
pub use config::{ReportFormat, SimConfig};
pub use error::{FailureReason, Result, SimError};
pub use report::{run_script, SimulationReport};
pub use simulator::{CommandKind, Event, Outcome, Simulator};
pub use stats::{Counters, MemoryStats, SimulationStats};
pub use validation::ProcessId;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
