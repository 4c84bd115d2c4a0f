//! First-Fit block list
//!
//! Memory is modelled as an ordered `Vec<Block>` covering `[0, total_memory)`
//! with no gaps and no overlaps. Allocation takes the first free block in
//! address order that is large enough and splits off the remainder.
//! Release frees the owner's block and merges runs of adjacent free blocks.
//!
//! Invariants, restored before every public operation returns:
//! 1. Blocks are contiguous (`next.start == prev.end() + 1`)
//! 2. The first block starts at 0 and the last ends at `total_memory - 1`
//! 3. No two adjacent blocks are both free
//! 4. No two blocks share an owner
//! 5. Block sizes sum to `total_memory`

use crate::block::{Block, Owner};
use crate::error::{Result, SimError};
use crate::stats::MemoryStats;
use crate::validation::ProcessId;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Ordered partition of a linear address space into free and owned blocks
#[derive(Debug, Clone)]
pub struct BlockList {
    /// Blocks in ascending `start` order
    blocks: Vec<Block>,

    /// Size of the address space
    total_memory: u64,
}

impl BlockList {
    /// Create a block list holding one free block over the whole address space
    ///
    /// # Errors
    ///
    /// Returns `InvalidSize` if `total_memory` is zero.
    pub fn new(total_memory: u64) -> Result<Self> {
        if total_memory == 0 {
            return Err(SimError::InvalidSize(total_memory));
        }

        Ok(BlockList {
            blocks: vec![Block::free(0, total_memory)],
            total_memory,
        })
    }

    /// Discard every block and start over with a single free block
    pub fn reset(&mut self, total_memory: u64) -> Result<()> {
        *self = BlockList::new(total_memory)?;
        Ok(())
    }

    /// Allocate `size` units to `process` using First-Fit
    ///
    /// Scans blocks in address order and takes the first free block with
    /// `block.size >= size`, even when a later block would fit tighter.
    /// An exact fit changes the block's owner; a larger block is shrunk to
    /// `size` and the remainder is inserted right after it as a free block.
    ///
    /// Returns the placed block. On error nothing is changed.
    pub fn allocate(&mut self, process: &ProcessId, size: u64) -> Result<Block> {
        if size == 0 {
            return Err(SimError::InvalidSize(size));
        }

        if self.find(process.as_str()).is_some() {
            return Err(SimError::DuplicateProcess(process.to_string()));
        }

        let index = match self.first_fit(size) {
            Some(index) => index,
            None => {
                return Err(SimError::InsufficientMemory {
                    process: process.to_string(),
                    requested: size,
                    largest_free: self.largest_free_block(),
                })
            }
        };

        let block = &mut self.blocks[index];
        let remaining = block.size - size;
        block.size = size;
        block.owner = Owner::Owned(process.clone());
        let placed = block.clone();

        if remaining > 0 {
            let leftover = Block::free(placed.start + size, remaining);
            debug!(
                "Split block at {}: {} -> {} + {} free",
                placed.start,
                size + remaining,
                size,
                remaining
            );
            self.blocks.insert(index + 1, leftover);
        }

        Ok(placed)
    }

    /// Index of the first free block that can hold `size` units
    fn first_fit(&self, size: u64) -> Option<usize> {
        let found = self
            .blocks
            .iter()
            .position(|block| block.is_free() && block.size >= size);
        trace!("First-fit scan for {} over {} blocks: {:?}", size, self.blocks.len(), found);
        found
    }

    /// Free the block owned by `process` and coalesce
    ///
    /// Returns the released block as it was before merging with neighbours.
    pub fn release(&mut self, process: &str) -> Result<Block> {
        let index = self
            .blocks
            .iter()
            .position(|block| block.is_owned_by(process))
            .ok_or_else(|| SimError::ProcessNotFound(process.to_string()))?;

        self.blocks[index].owner = Owner::Free;
        let released = self.blocks[index].clone();

        self.coalesce();

        Ok(released)
    }

    /// Merge every run of adjacent free blocks into one block
    ///
    /// Scans pairs left to right; after a merge the same position is checked
    /// again against its new right neighbour. Returns the number of merges,
    /// which is 0 on a list that is already coalesced.
    pub fn coalesce(&mut self) -> usize {
        let mut merges = 0;
        let mut i = 0;

        while i + 1 < self.blocks.len() {
            if self.blocks[i].is_free() && self.blocks[i + 1].is_free() {
                let right = self.blocks.remove(i + 1);
                let left = &mut self.blocks[i];
                debug!(
                    "Coalescing [{}-{}] with [{}-{}]",
                    left.start,
                    left.end(),
                    right.start,
                    right.end()
                );
                left.size += right.size;
                merges += 1;
            } else {
                i += 1;
            }
        }

        merges
    }

    /// Read-only view of the blocks in address order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Owned copy of the current block sequence
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Find the block owned by `process`
    pub fn find(&self, process: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.is_owned_by(process))
    }

    /// Find the block containing `addr`
    pub fn block_at(&self, addr: u64) -> Option<&Block> {
        self.blocks.iter().find(|block| block.contains(addr))
    }

    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }

    /// Number of blocks, free and owned
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Size of the largest free block, or 0 if there is none
    pub fn largest_free_block(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .map(|block| block.size)
            .max()
            .unwrap_or(0)
    }

    /// Compute memory statistics from the current blocks
    pub fn statistics(&self) -> MemoryStats {
        MemoryStats::from_blocks(&self.blocks)
    }

    /// Verify that the blocks still partition the address space
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<()> {
        let first = self
            .blocks
            .first()
            .ok_or_else(|| SimError::InvariantViolation("block list is empty".to_string()))?;

        if first.start != 0 {
            return Err(SimError::InvariantViolation(format!(
                "first block starts at {} instead of 0",
                first.start
            )));
        }

        let mut owners = HashSet::new();
        let mut sum = 0u64;

        for (i, block) in self.blocks.iter().enumerate() {
            if block.size == 0 {
                return Err(SimError::InvariantViolation(format!(
                    "block {} at {} has zero size",
                    i, block.start
                )));
            }

            if let Some(pid) = block.owner.process() {
                if !owners.insert(pid.as_str()) {
                    return Err(SimError::InvariantViolation(format!(
                        "process {} owns more than one block",
                        pid
                    )));
                }
            }

            if let Some(next) = self.blocks.get(i + 1) {
                if !block.is_followed_by(next) {
                    return Err(SimError::InvariantViolation(format!(
                        "gap or overlap between [{}-{}] and block starting at {}",
                        block.start,
                        block.end(),
                        next.start
                    )));
                }

                if block.is_free() && next.is_free() {
                    return Err(SimError::InvariantViolation(format!(
                        "adjacent free blocks at {} and {}",
                        block.start, next.start
                    )));
                }
            }

            sum += block.size;
        }

        if sum != self.total_memory {
            return Err(SimError::InvariantViolation(format!(
                "block sizes sum to {} instead of {}",
                sum, self.total_memory
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(name: &str) -> ProcessId {
        ProcessId::new(name).unwrap()
    }

    #[test]
    fn test_block_list_creation() {
        let list = BlockList::new(1000).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.blocks()[0], Block::free(0, 1000));
        assert_eq!(list.total_memory(), 1000);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_total_memory_rejected() {
        assert!(matches!(BlockList::new(0), Err(SimError::InvalidSize(0))));
    }

    #[test]
    fn test_allocate_splits_block() {
        let mut list = BlockList::new(1000).unwrap();

        let placed = list.allocate(&pid("P1"), 300).unwrap();
        assert_eq!(placed, Block::owned(0, 300, pid("P1")));

        assert_eq!(list.len(), 2);
        assert_eq!(list.blocks()[1], Block::free(300, 700));
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_allocate_exact_fit_no_split() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();
        list.allocate(&pid("P2"), 700).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.blocks()[1], Block::owned(300, 700, pid("P2")));
        assert_eq!(list.statistics().free_block_count, 0);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_allocate_zero_size() {
        let mut list = BlockList::new(1000).unwrap();
        let result = list.allocate(&pid("P1"), 0);
        assert!(matches!(result, Err(SimError::InvalidSize(0))));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insufficient_memory_leaves_list_unchanged() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();
        let before = list.snapshot();

        let result = list.allocate(&pid("P2"), 800);
        match result {
            Err(SimError::InsufficientMemory {
                requested,
                largest_free,
                ..
            }) => {
                assert_eq!(requested, 800);
                assert_eq!(largest_free, 700);
            }
            other => panic!("expected InsufficientMemory, got {:?}", other),
        }
        assert_eq!(list.blocks(), before.as_slice());
    }

    #[test]
    fn test_duplicate_process_rejected() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 100).unwrap();
        let before = list.snapshot();

        let result = list.allocate(&pid("P1"), 100);
        assert!(matches!(result, Err(SimError::DuplicateProcess(_))));
        assert_eq!(list.blocks(), before.as_slice());

        // Name can be reused once the block is released
        list.release("P1").unwrap();
        list.allocate(&pid("P1"), 100).unwrap();
    }

    #[test]
    fn test_first_fit_prefers_lowest_address() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("A"), 300).unwrap(); // 0-299
        list.allocate(&pid("B"), 100).unwrap(); // 300-399
        list.allocate(&pid("C"), 100).unwrap(); // 400-499
        list.allocate(&pid("D"), 100).unwrap(); // 500-599
        // 600-999 free

        list.release("A").unwrap(); // gap of 300 at 0
        list.release("C").unwrap(); // gap of 100 at 400

        // 100 fits exactly at 400, but the 300-unit hole comes first
        let placed = list.allocate(&pid("E"), 100).unwrap();
        assert_eq!(placed.start, 0);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_release_coalesces_with_right_neighbour() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();

        let released = list.release("P1").unwrap();
        assert_eq!(released, Block::free(0, 300));

        assert_eq!(list.blocks(), &[Block::free(0, 1000)]);
        assert_eq!(list.statistics().free_block_count, 1);
    }

    #[test]
    fn test_release_unknown_process() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();
        let before = list.snapshot();

        let result = list.release("P9");
        assert!(matches!(result, Err(SimError::ProcessNotFound(_))));
        assert_eq!(list.blocks(), before.as_slice());
    }

    #[test]
    fn test_release_merges_only_neighbours() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("A"), 100).unwrap(); // 0-99
        list.allocate(&pid("B"), 100).unwrap(); // 100-199
        list.allocate(&pid("C"), 100).unwrap(); // 200-299
        list.allocate(&pid("D"), 100).unwrap(); // 300-399
        // 400-999 free

        list.release("A").unwrap();
        list.release("C").unwrap();

        // C sits between B and D, so it cannot merge with anything
        assert_eq!(list.len(), 5);
        assert_eq!(list.blocks()[0], Block::free(0, 100));
        assert_eq!(list.blocks()[2], Block::free(200, 100));
        assert_eq!(list.blocks()[4], Block::free(400, 600));

        // Releasing D joins 200-299, 300-399 and 400-999 but leaves 0-99 alone
        list.release("D").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.blocks()[0], Block::free(0, 100));
        assert_eq!(list.blocks()[2], Block::free(200, 800));
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_coalesce_is_idempotent() {
        let mut list = BlockList::new(500).unwrap();
        list.allocate(&pid("A"), 100).unwrap();
        list.allocate(&pid("B"), 100).unwrap();
        list.release("A").unwrap();

        let once = list.snapshot();
        assert_eq!(list.coalesce(), 0);
        assert_eq!(list.blocks(), once.as_slice());
    }

    #[test]
    fn test_block_at() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();

        assert!(list.block_at(299).unwrap().is_owned_by("P1"));
        assert!(list.block_at(300).unwrap().is_free());
        assert!(list.block_at(1000).is_none());
    }

    #[test]
    fn test_reset() {
        let mut list = BlockList::new(1000).unwrap();
        list.allocate(&pid("P1"), 300).unwrap();

        list.reset(64).unwrap();
        assert_eq!(list.blocks(), &[Block::free(0, 64)]);
        assert_eq!(list.total_memory(), 64);
        assert!(list.reset(0).is_err());
    }
}
