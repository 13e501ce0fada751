//! Render collaborator boundary.
//!
//! The voxel world does not draw anything. It announces chunk lifecycle events
//! to a `ChunkObserver`, and the observer builds or releases whatever the
//! renderer needs. Batches are always rebuilt in full from a chunk's current
//! block set; there is no per-block diffing.
//!
//! `BatchCache` is the reference observer: it keeps one instance batch per
//! block kind for every loaded chunk.

use std::collections::HashMap;

use log::trace;

use super::voxels::block::block_type::{BlockKind, BLOCK_KIND_COUNT};
use super::voxels::chunk::{Chunk, ChunkPosition};

pub mod instance;

pub use instance::BlockInstance;

/// Receives chunk lifecycle notifications from the voxel world.
///
/// All methods default to doing nothing.
pub trait ChunkObserver {
    /// A chunk was generated and stored. Build its render batches.
    fn on_chunk_generated(&mut self, _chunk: &Chunk) {}

    /// A chunk was evicted. Release its render batches.
    fn on_chunk_evicted(&mut self, _chunk: &Chunk) {}

    /// A chunk's block set changed. Rebuild its render batches.
    fn on_block_changed(&mut self, _chunk: &Chunk) {}
}

/// An observer that ignores every notification.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullObserver;

impl ChunkObserver for NullObserver {}

/// The draw batches of one chunk, one per block kind.
#[derive(Debug, Clone, Default)]
pub struct ChunkBatches {
    /// Instances indexed by `BlockKind::index`
    batches: [Vec<BlockInstance>; BLOCK_KIND_COUNT],
}

impl ChunkBatches {
    /// Builds the batches of a chunk from its current block set.
    pub fn build(chunk: &Chunk) -> Self {
        let mut batches = ChunkBatches::default();
        for block in chunk.blocks() {
            batches.batches[block.kind.index() as usize].push(BlockInstance::from_block(&block));
        }
        batches
    }

    /// The instances drawn with the material of `kind`.
    pub fn batch(&self, kind: BlockKind) -> &[BlockInstance] {
        &self.batches[kind.index() as usize]
    }

    /// The batch of `kind` as raw bytes, ready for a buffer upload.
    pub fn batch_bytes(&self, kind: BlockKind) -> &[u8] {
        instance::instance_bytes(self.batch(kind))
    }

    /// Total number of instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// Keeps the render batches of every loaded chunk.
#[derive(Debug, Default)]
pub struct BatchCache {
    chunks: HashMap<ChunkPosition, ChunkBatches>,
    /// Number of full batch builds performed so far
    pub rebuilds: usize,
}

impl BatchCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The batches of a chunk, if it has been built.
    pub fn batches(&self, position: ChunkPosition) -> Option<&ChunkBatches> {
        self.chunks.get(&position)
    }

    /// Number of chunks with batches.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk has batches.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn rebuild(&mut self, chunk: &Chunk) {
        let batches = ChunkBatches::build(chunk);
        trace!(
            "built {} instances for chunk {}",
            batches.instance_count(),
            chunk.position
        );
        self.chunks.insert(chunk.position, batches);
        self.rebuilds += 1;
    }
}

impl ChunkObserver for BatchCache {
    fn on_chunk_generated(&mut self, chunk: &Chunk) {
        self.rebuild(chunk);
    }

    fn on_chunk_evicted(&mut self, chunk: &Chunk) {
        self.chunks.remove(&chunk.position);
    }

    fn on_block_changed(&mut self, chunk: &Chunk) {
        self.rebuild(chunk);
    }
}
