//! Memory and simulation statistics
//!
//! Statistics are derived on demand from a block sequence; nothing here is
//! stored alongside the blocks.

use crate::block::Block;
use serde::{Deserialize, Serialize};

/// Memory usage derived from a block sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: u64,
    pub allocated_memory: u64,
    pub free_memory: u64,
    /// Number of owned blocks
    pub process_count: usize,
    pub free_block_count: usize,
    pub largest_free_block: u64,
    /// Free memory outside the largest free block, as a percentage of total
    pub external_fragmentation: f64,
}

impl MemoryStats {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut total_memory = 0u64;
        let mut free_memory = 0u64;
        let mut process_count = 0usize;
        let mut free_block_count = 0usize;
        let mut largest_free_block = 0u64;

        for block in blocks {
            total_memory += block.size;
            if block.is_free() {
                free_memory += block.size;
                free_block_count += 1;
                largest_free_block = largest_free_block.max(block.size);
            } else {
                process_count += 1;
            }
        }

        MemoryStats {
            total_memory,
            allocated_memory: total_memory - free_memory,
            free_memory,
            process_count,
            free_block_count,
            largest_free_block,
            external_fragmentation: external_fragmentation(
                total_memory,
                free_memory,
                largest_free_block,
            ),
        }
    }

    /// Allocated memory as a percentage of total
    pub fn utilization(&self) -> f64 {
        if self.total_memory == 0 {
            return 0.0;
        }
        self.allocated_memory as f64 / self.total_memory as f64 * 100.0
    }
}

/// External fragmentation percentage
///
/// `(free - largest_free) / total * 100`, or 0 when nothing is free.
pub fn external_fragmentation(total_memory: u64, free_memory: u64, largest_free_block: u64) -> f64 {
    if free_memory == 0 || total_memory == 0 {
        return 0.0;
    }
    let unusable = free_memory.saturating_sub(largest_free_block);
    unusable as f64 / total_memory as f64 * 100.0
}

/// Cumulative per-run command counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub successful_allocations: u64,
    pub failed_allocations: u64,
    pub successful_releases: u64,
    pub failed_releases: u64,
}

/// Memory statistics plus the run's command counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    #[serde(flatten)]
    pub memory: MemoryStats,
    #[serde(flatten)]
    pub counters: Counters,
}
