//! Sector intervals and the ordered interval list used to find ordinary regions.
//!
//! A [`Block`] is a run of sectors. Its size is signed: a negative size means the
//! file behind it does not exist, zero means it exists but is empty. Only blocks
//! with a non-negative size take part in interval arithmetic.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// A contiguous run of sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// First sector
    pub start: u64,
    /// Number of sectors; negative when the backing file does not exist
    pub size: i64,
}

impl Block {
    /// A block for a file that was never found.
    pub const MISSING: Block = Block { start: 0, size: -1 };

    pub fn new(start: u64, size: i64) -> Self {
        Self { start, size }
    }

    /// A block covering `sectors` sectors from `start`.
    pub fn sectors(start: u64, sectors: u64) -> Self {
        Self {
            start,
            size: sectors as i64,
        }
    }

    /// Whether the backing file exists (`size >= 0`).
    pub fn exists(&self) -> bool {
        self.size >= 0
    }

    /// Whether the block exists and claims no sectors.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of sectors claimed; zero for missing blocks.
    pub fn len(&self) -> u64 {
        self.size.max(0) as u64
    }

    /// One past the last sector. Equal to `start` for missing or empty blocks.
    pub fn end(&self) -> u64 {
        self.start + self.len()
    }

    /// Whether `other` lies entirely inside this block.
    pub fn contains(&self, other: &Block) -> bool {
        self.start <= other.start && self.end() >= other.end()
    }

    /// Byte offset of the first sector for a given sector size.
    pub fn byte_offset(&self, sector_size: usize) -> u64 {
        self.start * sector_size as u64
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exists() {
            write!(f, "0x{:08x}-0x{:08x}", self.start, self.end())
        } else {
            write!(f, "(missing)")
        }
    }
}

/// Errors raised while mutating a [`BlockList`].
#[derive(Debug, Error)]
pub enum BlockListError {
    /// Memory for a split-off tail entry could not be reserved
    #[error("memory allocation failed while splitting a block: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Outcome of [`BlockList::subtract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtraction {
    /// The range was cut out of a single entry
    Removed,
    /// The block does not exist; nothing to remove
    Skipped,
    /// No single entry contains the range; the list is unchanged
    NotContained,
}

/// Ordered, non-overlapping list of sector ranges.
///
/// Entries are sorted by `start`, never overlap and never have size zero.
/// The list starts as one block spanning the whole disc and is carved up by
/// repeated [`subtract`](BlockList::subtract) calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    blocks: Vec<Block>,
}

impl BlockList {
    /// An empty list (no ordinary regions).
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding a single block `[0, sectors)`.
    pub fn whole(sectors: u64) -> Self {
        let mut list = Self::new();
        if sectors > 0 {
            list.blocks.push(Block::sectors(0, sectors));
        }
        list
    }

    /// Remove `block`'s sectors from the list.
    ///
    /// The range must lie entirely inside one existing entry. That entry is split
    /// into a head (kept in place) and a tail (inserted right after it); empty
    /// pieces are dropped. Missing blocks are ignored.
    ///
    /// Memory for the tail is reserved before anything is modified, so an
    /// allocation failure leaves the list as it was.
    pub fn subtract(&mut self, block: Block) -> Result<Subtraction, BlockListError> {
        if !block.exists() {
            return Ok(Subtraction::Skipped);
        }

        let Some(index) = self.blocks.iter().position(|entry| entry.contains(&block)) else {
            return Ok(Subtraction::NotContained);
        };

        let entry = self.blocks[index];
        let head = Block::sectors(entry.start, block.start - entry.start);
        let tail = Block::sectors(block.end(), entry.end() - block.end());

        match (head.is_empty(), tail.is_empty()) {
            (false, false) => {
                self.blocks.try_reserve(1)?;
                self.blocks[index] = head;
                self.blocks.insert(index + 1, tail);
            }
            (false, true) => self.blocks[index] = head,
            (true, false) => self.blocks[index] = tail,
            (true, true) => {
                self.blocks.remove(index);
            }
        }

        Ok(Subtraction::Removed)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    /// Sum of the sizes of all entries.
    pub fn total_sectors(&self) -> u64 {
        self.blocks.iter().map(Block::len).sum()
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
#[path = "tests/block_tests.rs"]
mod tests;
