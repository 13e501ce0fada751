//! # Chunk Module
//!
//! This module provides the `Chunk` struct, the dense per-column storage of the
//! voxel world, together with the chunk coordinate type and the footprint
//! constants shared by generation, streaming and queries.
//!
//! ## Storage
//!
//! A chunk is a column `CHUNK_WIDTH` x `CHUNK_COLUMN_HEIGHT` x `CHUNK_DEPTH`
//! cells wide. It keeps two parallel dense arrays indexed by local cell:
//! - `solid_array`: one bit per cell telling whether a block occupies it
//! - `kinds`: the compact material index of each occupied cell
//!
//! Both lookups and mutations are O(1). The kind stored for an unoccupied cell
//! is meaningless and never read.
//!
//! ## Vertical range
//!
//! Generated terrain fills y in `[WORLD_MIN_Y, 0]`. The column also reserves
//! build space above the surface, up to `WORLD_MAX_Y`, so blocks can be placed
//! on top of the terrain.

use std::fmt;

use bitvec::prelude::BitVec;
use cgmath::Point3;
use chunk_iteration::ChunkBlockIterator;

use super::block::block_type::BlockKind;
use super::block::{Block, BlockKindSize};

pub mod chunk_creation;
pub mod chunk_iteration;

/// Width of a chunk along x, in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Depth of a chunk along z, in blocks.
pub const CHUNK_DEPTH: i32 = 16;
/// Number of generated terrain layers, from y = 0 downwards.
pub const TERRAIN_HEIGHT: i32 = 26;
/// Lowest y coordinate a block can have.
pub const WORLD_MIN_Y: i32 = -(TERRAIN_HEIGHT - 1);
/// Highest y coordinate a block can have.
pub const WORLD_MAX_Y: i32 = 38;
/// Number of cells in a chunk column.
pub const CHUNK_COLUMN_HEIGHT: i32 = WORLD_MAX_Y - WORLD_MIN_Y + 1;
/// Number of cells in one horizontal layer of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;
/// Total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_PLANE_SIZE * CHUNK_COLUMN_HEIGHT as usize;

/// Coordinate of a chunk on the horizontal chunk grid.
///
/// Chunk `(x, z)` owns global block columns `x * CHUNK_WIDTH ..` and
/// `z * CHUNK_DEPTH ..`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    /// Chunk index along x.
    pub x: i32,
    /// Chunk index along z.
    pub z: i32,
}

impl ChunkPosition {
    /// Creates a chunk coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// The chunk owning the integer block column `(x, z)`.
    pub fn from_block(x: i32, z: i32) -> Self {
        ChunkPosition {
            x: x.div_euclid(CHUNK_WIDTH),
            z: z.div_euclid(CHUNK_DEPTH),
        }
    }

    /// The chunk containing a continuous world position, by floor division of
    /// the position by the chunk size.
    pub fn from_world(x: f32, z: f32) -> Self {
        ChunkPosition {
            x: (x / CHUNK_WIDTH as f32).floor() as i32,
            z: (z / CHUNK_DEPTH as f32).floor() as i32,
        }
    }

    /// Chebyshev distance to another chunk, in chunk units.
    pub fn chebyshev_distance(&self, other: &ChunkPosition) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Global block coordinates of this chunk's local (0, 0) column.
    pub fn origin(&self) -> (i32, i32) {
        (self.x * CHUNK_WIDTH, self.z * CHUNK_DEPTH)
    }

    /// Number of chunks in the square of Chebyshev radius `radius`, saturating
    /// at `usize::MAX`.
    pub fn square_len(radius: i32) -> usize {
        let side = (radius.max(0) as usize).saturating_mul(2).saturating_add(1);
        side.saturating_mul(side)
    }

    /// Every chunk within Chebyshev distance `radius` of this one, nearest ring
    /// first.
    ///
    /// The square is materialized, so callers with an unbounded radius should
    /// filter existing chunks by `chebyshev_distance` instead.
    pub fn square_around(&self, radius: i32) -> Vec<ChunkPosition> {
        let radius = radius.max(0);
        let mut positions = Vec::with_capacity(Self::square_len(radius).min(1 << 16));
        positions.push(*self);
        for ring in 1..=radius {
            for dx in -ring..=ring {
                for dz in -ring..=ring {
                    if dx.abs() == ring || dz.abs() == ring {
                        positions.push(ChunkPosition::new(
                            self.x.wrapping_add(dx),
                            self.z.wrapping_add(dz),
                        ));
                    }
                }
            }
        }
        positions
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The block storage of one chunk column (the voxel grid).
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkPosition,

    /// One bit per cell, set when a block occupies the cell.
    solid_array: BitVec,

    /// Material index per cell, only meaningful where `solid_array` is set.
    kinds: Vec<BlockKindSize>,

    /// Number of set bits in `solid_array`.
    block_count: usize,

    /// Whether the block set changed since the render batch was last built.
    dirty: bool,
}

impl Chunk {
    /// Creates a chunk with no blocks.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: ChunkPosition) -> Self {
        Chunk {
            position,
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
            kinds: vec![0; CHUNK_VOLUME],
            block_count: 0,
            dirty: false,
        }
    }

    /// Maps a global block coordinate to this chunk's cell index.
    ///
    /// # Returns
    /// `None` when the coordinate belongs to another chunk or lies outside the
    /// column's vertical range.
    pub fn local_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !(WORLD_MIN_Y..=WORLD_MAX_Y).contains(&y) {
            return None;
        }
        let (origin_x, origin_z) = self.position.origin();
        let local_x = x - origin_x;
        let local_z = z - origin_z;
        if !(0..CHUNK_WIDTH).contains(&local_x) || !(0..CHUNK_DEPTH).contains(&local_z) {
            return None;
        }
        let layer = (y - WORLD_MIN_Y) as usize;
        Some(local_x as usize + CHUNK_WIDTH as usize * local_z as usize + CHUNK_PLANE_SIZE * layer)
    }

    /// Maps a cell index back to the global coordinate of its block.
    pub fn global_coordinates(&self, index: usize) -> Point3<i32> {
        let (origin_x, origin_z) = self.position.origin();
        let layer = index / CHUNK_PLANE_SIZE;
        let in_plane = index % CHUNK_PLANE_SIZE;
        Point3::new(
            origin_x + (in_plane % CHUNK_WIDTH as usize) as i32,
            WORLD_MIN_Y + layer as i32,
            origin_z + (in_plane / CHUNK_WIDTH as usize) as i32,
        )
    }

    /// Whether the global coordinate falls inside this chunk's storage.
    pub fn contains_global(&self, x: i32, y: i32, z: i32) -> bool {
        self.local_index(x, y, z).is_some()
    }

    /// Gets the block at a global coordinate, if one exists.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let index = self.local_index(x, y, z)?;
        self.block_at_index(index)
    }

    /// Whether a block occupies the given global coordinate.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.local_index(x, y, z)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Inserts a block into a free cell and marks the chunk dirty.
    ///
    /// # Returns
    /// `false` (and no change) when the coordinate is outside this chunk or the
    /// cell is already occupied.
    pub fn insert_block(&mut self, block: Block) -> bool {
        if self.place(block) {
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Removes the block at a global coordinate and marks the chunk dirty.
    ///
    /// Removing the last block leaves an empty chunk; it is not destroyed.
    ///
    /// # Returns
    /// The kind of the removed block, or `None` if the cell was empty.
    pub fn remove_block_at(&mut self, x: i32, y: i32, z: i32) -> Option<BlockKind> {
        let index = self.local_index(x, y, z)?;
        if !self.solid_array[index] {
            return None;
        }
        let kind = BlockKind::from_index(self.kinds[index]);
        self.solid_array.set(index, false);
        self.block_count -= 1;
        self.dirty = true;
        kind
    }

    /// Number of blocks stored in this chunk.
    pub fn len(&self) -> usize {
        self.block_count
    }

    /// Whether the chunk holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    /// Lazily iterates over every block of the chunk, in cell index order.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Whether the render batch of this chunk is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the render batch of this chunk as stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Flags the render batch of this chunk as up to date.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Writes a block without touching the dirty flag. Used during creation.
    fn place(&mut self, block: Block) -> bool {
        let Some(index) = self.local_index(block.position.x, block.position.y, block.position.z)
        else {
            return false;
        };
        if self.solid_array[index] {
            return false;
        }
        self.solid_array.set(index, true);
        self.kinds[index] = block.kind.index();
        self.block_count += 1;
        true
    }

    fn block_at_index(&self, index: usize) -> Option<Block> {
        if !self.solid_array[index] {
            return None;
        }
        let kind = BlockKind::from_index(self.kinds[index])?;
        let position = self.global_coordinates(index);
        Some(Block { position, kind })
    }

    fn next_solid_index(&self, from: usize) -> Option<usize> {
        if from >= CHUNK_VOLUME {
            return None;
        }
        self.solid_array[from..].first_one().map(|offset| from + offset)
    }
}
