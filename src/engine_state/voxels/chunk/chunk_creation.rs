//! # Chunk Creation Module
//!
//! This module provides the builder that turns a generator's block sequence
//! into a finished `Chunk`. The chunk only becomes visible to the rest of the
//! world once `return_chunk` hands it over, so a partially generated chunk is
//! never observable.

use log::warn;

use crate::engine_state::voxels::block::Block;

use super::{Chunk, ChunkPosition};

/// A builder that places generated blocks into a fresh chunk.
///
/// Blocks are written without marking the chunk dirty: a newly generated chunk
/// gets its first render batch through the generation notification, not
/// through the change notification.
pub struct ChunkCreationIterator {
    /// The chunk being filled
    chunk: Chunk,
    /// Blocks that fell outside the chunk or onto an occupied cell
    rejected: usize,
}

impl ChunkCreationIterator {
    /// Creates a new builder for the chunk at `position`.
    pub fn new(position: ChunkPosition) -> Self {
        ChunkCreationIterator {
            chunk: Chunk::empty(position),
            rejected: 0,
        }
    }

    /// Places one block.
    ///
    /// # Returns
    /// `false` if the block lies outside the chunk's footprint or its cell is
    /// already taken. The block is dropped in that case.
    pub fn push_block(&mut self, block: Block) -> bool {
        let placed = self.chunk.place(block);
        if !placed {
            self.rejected += 1;
        }
        placed
    }

    /// Places every block of an iterator.
    pub fn extend<I: IntoIterator<Item = Block>>(&mut self, blocks: I) {
        for block in blocks {
            self.push_block(block);
        }
    }

    /// Finalizes creation and returns the populated, clean chunk.
    pub fn return_chunk(self) -> Chunk {
        if self.rejected > 0 {
            warn!(
                "chunk {} dropped {} generated blocks outside its footprint",
                self.chunk.position, self.rejected
            );
        }
        self.chunk
    }
}
