//! Memory blocks
//!
//! A block is a contiguous address range tagged either free or owned by
//! exactly one process.

use crate::validation::ProcessId;
use serde::{Deserialize, Serialize};

/// Ownership tag of a block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Free,
    Owned(ProcessId),
}

impl Owner {
    pub fn is_free(&self) -> bool {
        matches!(self, Owner::Free)
    }

    /// The owning process, if any
    pub fn process(&self) -> Option<&ProcessId> {
        match self {
            Owner::Free => None,
            Owner::Owned(pid) => Some(pid),
        }
    }
}

/// A contiguous range of addresses `[start, start + size)`
///
/// `size` is always greater than zero while the block is part of a
/// [`BlockList`](crate::BlockList).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Offset of the first address
    pub start: u64,
    /// Length in the same units as the total memory
    pub size: u64,
    pub owner: Owner,
}

impl Block {
    pub fn free(start: u64, size: u64) -> Self {
        Block {
            start,
            size,
            owner: Owner::Free,
        }
    }

    pub fn owned(start: u64, size: u64, process: ProcessId) -> Self {
        Block {
            start,
            size,
            owner: Owner::Owned(process),
        }
    }

    /// Inclusive last address of the block
    pub fn end(&self) -> u64 {
        self.start + self.size - 1
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_free()
    }

    /// Check if this block is owned by `process`
    pub fn is_owned_by(&self, process: &str) -> bool {
        self.owner
            .process()
            .map_or(false, |pid| pid.as_str() == process)
    }

    /// Check if this block contains an address
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.start + self.size
    }

    /// Check if `next` starts right after this block ends
    pub fn is_followed_by(&self, next: &Block) -> bool {
        self.start + self.size == next.start
    }
}
