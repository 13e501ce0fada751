//! # Chunk Iteration Module
//!
//! This module provides a lazy iterator over the blocks of a chunk. It walks
//! the chunk's occupancy bits and skips empty cells, yielding each block with
//! its global coordinate.

use crate::engine_state::voxels::block::Block;

use super::{Chunk, CHUNK_VOLUME};

/// An iterator over all blocks in a chunk, in cell index order.
///
/// The iterator borrows the chunk; every call to `Chunk::blocks` starts a new
/// pass over the current block set.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next cell index to examine
    current_offset: usize,
    /// Blocks not yet yielded
    remaining: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new iterator positioned before the first block of `chunk_ref`.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
            remaining: chunk_ref.len(),
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        while self.remaining > 0 && self.current_offset < CHUNK_VOLUME {
            let index = self.chunk_ref.next_solid_index(self.current_offset)?;
            self.current_offset = index + 1;
            if let Some(block) = self.chunk_ref.block_at_index(index) {
                self.remaining -= 1;
                return Some(block);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
