//! # World Module
//!
//! This module provides the `World` struct, the facade every other system uses
//! to query and edit the voxel world. It owns the `ChunkStore` and answers
//! queries against whatever chunks are currently generated, regardless of
//! what streaming is doing.
//!
//! ## Queries
//!
//! - Point lookups locate the owning chunk by floor division and are O(1).
//! - Neighbourhood enumeration only visits chunks within a Chebyshev radius.
//! - Raycasts and collision probes are built on the two above, so they never
//!   scan the whole world.
//!
//! ## Mutation rules
//!
//! No two blocks ever share a coordinate: adding onto an occupied cell is a
//! no-op. Adding into a chunk that has not been generated is a no-op too, as is
//! removing from an empty cell. None of these are errors; they are expected
//! races between streaming and editing.

use cgmath::{Point3, Vector3};
use log::trace;

use super::block::block_side::BlockSide;
use super::block::block_type::BlockKind;
use super::block::Block;
use super::chunk::{Chunk, ChunkPosition, CHUNK_WIDTH};
use super::chunk_store::ChunkStore;
use super::raycast::{resolve_hit_face, Ray};
use super::terrain::TerrainGenerator;
use crate::engine_state::rendering::ChunkObserver;

/// The block a ray struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The block that was hit
    pub block: Block,
    /// The face of the block the ray crossed
    pub face: BlockSide,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// The hit point in world space
    pub point: Point3<f32>,
}

impl RaycastHit {
    /// Coordinate of the cell adjacent to the struck face, where a placed block
    /// would go.
    pub fn placement_position(&self) -> Point3<i32> {
        self.block.position + self.face.offset()
    }
}

/// Represents the voxel world: generated chunks plus the queries and edits on
/// top of them.
///
/// # Examples
///
/// ```
/// use voxel_world::engine_state::voxels::block::block_type::BlockKind;
/// use voxel_world::engine_state::voxels::chunk::ChunkPosition;
/// use voxel_world::engine_state::voxels::world::World;
///
/// let mut world = World::default();
/// world.store_mut().request(ChunkPosition::new(0, 0));
/// world.store_mut().materialize_next();
///
/// assert!(world.block_at(5, 0, 5).is_some());
/// assert!(!world.add_block(5, 0, 5, BlockKind::SURFACE));
/// assert!(world.add_block(5, 1, 5, BlockKind::DEEP));
/// ```
#[derive(Default)]
pub struct World {
    store: ChunkStore,
}

impl World {
    /// Creates a new, empty world that generates chunks with `generator`.
    pub fn new(generator: Box<dyn TerrainGenerator>) -> Self {
        World {
            store: ChunkStore::new(generator),
        }
    }

    /// The underlying chunk store.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The underlying chunk store, mutably. Used by streaming.
    pub fn store_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    /// Gets the chunk that owns the block column `(x, z)`.
    pub fn chunk_for_block(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.store.get(ChunkPosition::from_block(x, z))
    }

    /// The block at a global coordinate, if one exists in a generated chunk.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.chunk_for_block(x, z)?.get_block_at(x, y, z)
    }

    /// Whether a block occupies a global coordinate.
    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.chunk_for_block(x, z)
            .is_some_and(|chunk| chunk.is_block_solid(x, y, z))
    }

    /// Adds a block and marks its chunk dirty.
    ///
    /// Silently does nothing if the cell is occupied, its chunk is not
    /// generated, or `y` lies outside the column.
    ///
    /// # Returns
    /// Whether the block was added.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) -> bool {
        let Some(chunk) = self.store.get_mut(ChunkPosition::from_block(x, z)) else {
            trace!("ignored add at ({}, {}, {}): chunk not generated", x, y, z);
            return false;
        };
        let added = chunk.insert_block(Block::new(x, y, z, kind));
        if !added {
            trace!("ignored add at ({}, {}, {}): occupied or out of range", x, y, z);
        }
        added
    }

    /// Removes a block and marks its chunk dirty.
    ///
    /// Silently does nothing if no block exists there. A chunk emptied this way
    /// stays loaded.
    ///
    /// # Returns
    /// The kind of the removed block.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> Option<BlockKind> {
        let removed = self
            .store
            .get_mut(ChunkPosition::from_block(x, z))?
            .remove_block_at(x, y, z);
        if removed.is_none() {
            trace!("ignored remove at ({}, {}, {}): empty cell", x, y, z);
        }
        removed
    }

    /// Lazily enumerates the blocks of every generated chunk within Chebyshev
    /// distance `chunk_radius` of the chunk containing `(x, z)`.
    ///
    /// Chunks are visited nearest ring first. Each call starts a fresh pass.
    /// When the square is larger than the set of generated chunks, the
    /// generated chunks are filtered by distance instead, so any radius is
    /// accepted.
    pub fn nearby_blocks(
        &self,
        x: f32,
        z: f32,
        chunk_radius: i32,
    ) -> impl Iterator<Item = Block> + '_ {
        self.nearby_chunks(ChunkPosition::from_world(x, z), chunk_radius)
            .into_iter()
            .filter_map(move |position| self.store.get(position))
            .flat_map(Chunk::blocks)
    }

    fn nearby_chunks(&self, center: ChunkPosition, chunk_radius: i32) -> Vec<ChunkPosition> {
        let radius = chunk_radius.max(0);
        if ChunkPosition::square_len(radius) <= self.store.len() {
            return center.square_around(radius);
        }
        let mut positions: Vec<ChunkPosition> = self
            .store
            .positions()
            .filter(|position| center.chebyshev_distance(position) <= radius as u32)
            .collect();
        positions.sort_by_key(|position| (center.chebyshev_distance(position), *position));
        positions
    }

    /// Finds the nearest block hit by a ray within `max_distance`.
    ///
    /// Candidates come from `nearby_blocks` around the ray origin, with a radius
    /// large enough to cover `max_distance`. Ties keep the first block found.
    ///
    /// # Returns
    /// The hit block with the face struck, or `None` for a miss, a zero
    /// direction or a non-positive `max_distance`.
    pub fn raycast_block(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(origin, direction)?;
        if !(max_distance > 0.0) {
            return None;
        }
        let chunk_radius = (max_distance / CHUNK_WIDTH as f32).ceil().max(1.0) as i32;

        let mut closest: Option<(Block, f32, bool)> = None;
        for block in self.nearby_blocks(origin.x, origin.z, chunk_radius) {
            let Some((distance, entering)) = ray.intersect_block(&block) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if closest.map_or(true, |(_, best, _)| distance < best) {
                closest = Some((block, distance, entering));
            }
        }

        closest.map(|(block, distance, entering)| {
            let point = ray.at(distance);
            RaycastHit {
                block,
                face: resolve_hit_face(&block, point, ray.direction, entering),
                distance,
                point,
            }
        })
    }

    /// Blocks whose cubes overlap the open box `(min, max)`.
    ///
    /// Only the integer cells the box covers are probed, so the cost depends on
    /// the box size, not on how many chunks are loaded. Touching faces do not
    /// count as overlap.
    pub fn intersecting_blocks(&self, min: Point3<f32>, max: Point3<f32>) -> Vec<Block> {
        let low = |v: f32| (v - 0.5).floor() as i32 + 1;
        let high = |v: f32| (v + 0.5).ceil() as i32 - 1;

        let mut blocks = Vec::new();
        for x in low(min.x)..=high(max.x) {
            for z in low(min.z)..=high(max.z) {
                let Some(chunk) = self.chunk_for_block(x, z) else {
                    continue;
                };
                for y in low(min.y)..=high(max.y) {
                    if let Some(block) = chunk.get_block_at(x, y, z) {
                        blocks.push(block);
                    }
                }
            }
        }
        blocks
    }

    /// Rebuilds every dirty chunk through `observer` and marks it clean.
    ///
    /// # Returns
    /// The number of chunks rebuilt.
    pub fn flush_dirty(&mut self, observer: &mut dyn ChunkObserver) -> usize {
        let mut dirty: Vec<&mut Chunk> = self
            .store
            .chunks_mut()
            .filter(|chunk| chunk.is_dirty())
            .collect();
        dirty.sort_by_key(|chunk| chunk.position);

        for chunk in dirty.iter_mut() {
            observer.on_block_changed(&**chunk);
            chunk.clear_dirty();
        }
        dirty.len()
    }

    /// Total number of blocks in generated chunks.
    pub fn block_count(&self) -> usize {
        self.store.total_blocks()
    }
}
