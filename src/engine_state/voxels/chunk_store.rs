//! # Chunk Store
//!
//! The chunk store maps chunk coordinates to generated chunks and owns their
//! lifecycle. Chunks are not generated when they are asked for: a request only
//! appends the coordinate to a FIFO pending queue, and `materialize_next`
//! generates at most one queued chunk per call. Calling it once per tick keeps
//! the generation cost of every frame bounded by a single chunk, however many
//! chunks are wanted at once.
//!
//! ## Chunk lifecycle
//!
//! `Absent -> Queued -> Generated (Dirty <-> Clean) -> Absent`
//!
//! Eviction returns a chunk to `Absent`; requesting it again regenerates it from
//! scratch, so edits made while it was loaded are lost.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};
use web_time::Instant;

use super::chunk::{Chunk, ChunkPosition};
use super::terrain::{LayeredTerrain, TerrainGenerator};

/// Where a chunk coordinate currently is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Not stored and not queued
    Absent,
    /// Waiting in the pending queue
    Queued,
    /// Generated, with a render batch that needs rebuilding
    Dirty,
    /// Generated, with an up to date render batch
    Clean,
}

/// Storage for loaded chunks plus the pending generation queue.
pub struct ChunkStore {
    /// Generated chunks, keyed by chunk coordinate
    chunks: HashMap<ChunkPosition, Chunk>,
    /// Coordinates waiting for generation, oldest first
    pending: VecDeque<ChunkPosition>,
    /// Mirror of `pending` for O(1) duplicate checks
    queued: HashSet<ChunkPosition>,
    /// Fills newly materialized chunks
    generator: Box<dyn TerrainGenerator>,
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new(Box::new(LayeredTerrain))
    }
}

impl ChunkStore {
    /// Creates an empty store that generates chunks with `generator`.
    pub fn new(generator: Box<dyn TerrainGenerator>) -> Self {
        ChunkStore {
            chunks: HashMap::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            generator,
        }
    }

    /// Queues a chunk for generation unless it is already stored or queued.
    ///
    /// Any coordinate is accepted; the world is unbounded.
    ///
    /// # Returns
    /// `true` if the coordinate was appended to the queue.
    pub fn request(&mut self, position: ChunkPosition) -> bool {
        if self.chunks.contains_key(&position) || !self.queued.insert(position) {
            return false;
        }
        trace!("queued chunk {}", position);
        self.pending.push_back(position);
        true
    }

    /// Generates the oldest queued chunk and stores it.
    ///
    /// # Returns
    /// The newly stored chunk, or `None` when the queue is empty.
    pub fn materialize_next(&mut self) -> Option<&Chunk> {
        let position = self.pending.pop_front()?;
        self.queued.remove(&position);

        let started = Instant::now();
        let chunk = self.generator.generate_chunk(position);
        debug!(
            "generated chunk {} with {} blocks in {:?}",
            position,
            chunk.len(),
            started.elapsed()
        );

        self.chunks.insert(position, chunk);
        self.chunks.get(&position)
    }

    /// Removes every stored chunk whose coordinate is not in `retain`.
    ///
    /// The pending queue is left untouched. The caller is responsible for
    /// releasing whatever was built from the returned chunks.
    ///
    /// # Returns
    /// The evicted chunks, ordered by coordinate.
    pub fn evict(&mut self, retain: &HashSet<ChunkPosition>) -> Vec<Chunk> {
        let mut doomed: Vec<ChunkPosition> = self
            .chunks
            .keys()
            .filter(|position| !retain.contains(position))
            .copied()
            .collect();
        doomed.sort();

        doomed
            .into_iter()
            .filter_map(|position| {
                debug!("evicting chunk {}", position);
                self.chunks.remove(&position)
            })
            .collect()
    }

    /// Gets a stored chunk.
    pub fn get(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Gets a stored chunk mutably.
    pub fn get_mut(&mut self, position: ChunkPosition) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Whether a generated chunk is stored at `position`.
    pub fn is_present(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Whether `position` waits in the pending queue.
    pub fn is_queued(&self, position: ChunkPosition) -> bool {
        self.queued.contains(&position)
    }

    /// The lifecycle state of a chunk coordinate.
    pub fn state(&self, position: ChunkPosition) -> ChunkState {
        match self.chunks.get(&position) {
            Some(chunk) if chunk.is_dirty() => ChunkState::Dirty,
            Some(_) => ChunkState::Clean,
            None if self.is_queued(position) => ChunkState::Queued,
            None => ChunkState::Absent,
        }
    }

    /// Number of queued coordinates.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The queued coordinates, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.pending.iter().copied()
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of all stored chunks, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    /// All stored chunks, mutably, in no particular order.
    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> + '_ {
        self.chunks.values_mut()
    }

    /// Total number of blocks across all stored chunks.
    pub fn total_blocks(&self) -> usize {
        self.chunks.values().map(Chunk::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::terrain::EmptyTerrain;

    #[test]
    fn request_is_idempotent() {
        let mut store = ChunkStore::default();
        let position = ChunkPosition::new(2, -3);
        assert!(store.request(position));
        assert!(!store.request(position));
        assert_eq!(store.pending_len(), 1);
        assert_eq!(store.state(position), ChunkState::Queued);

        store.materialize_next();
        assert!(!store.request(position));
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn materialize_is_fifo_and_one_at_a_time() {
        let mut store = ChunkStore::default();
        let first = ChunkPosition::new(0, 0);
        let second = ChunkPosition::new(-1, 0);
        store.request(first);
        store.request(second);

        let generated = store.materialize_next().map(|chunk| chunk.position);
        assert_eq!(generated, Some(first));
        assert!(store.is_present(first));
        assert!(!store.is_present(second));
        assert_eq!(store.get(first).map(Chunk::len), Some(6656));
        assert_eq!(store.state(first), ChunkState::Clean);

        store.materialize_next();
        assert!(store.is_present(second));
        assert!(store.materialize_next().is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn evict_keeps_only_retained_chunks() {
        let mut store = ChunkStore::new(Box::new(EmptyTerrain));
        for x in 0..3 {
            store.request(ChunkPosition::new(x, 0));
            store.materialize_next();
        }
        let queued = ChunkPosition::new(9, 9);
        store.request(queued);

        let retain: HashSet<ChunkPosition> = [ChunkPosition::new(1, 0)].into_iter().collect();
        let evicted: Vec<ChunkPosition> = store
            .evict(&retain)
            .into_iter()
            .map(|chunk| chunk.position)
            .collect();

        assert_eq!(evicted, vec![ChunkPosition::new(0, 0), ChunkPosition::new(2, 0)]);
        assert_eq!(store.len(), 1);
        assert!(store.is_queued(queued));
        assert_eq!(store.state(ChunkPosition::new(0, 0)), ChunkState::Absent);
    }

    #[test]
    fn empty_chunk_is_not_destroyed() {
        let mut store = ChunkStore::new(Box::new(EmptyTerrain));
        let position = ChunkPosition::new(0, 0);
        store.request(position);
        store.materialize_next();
        assert!(store.get(position).is_some_and(Chunk::is_empty));
        assert!(store.is_present(position));
    }
}
