//! # Terrain Generation
//!
//! Terrain generators are pure functions from a global block coordinate to a
//! block kind (or nothing). A generator holds no mutable state, so the same
//! chunk always generates the same block set, whatever order chunks are
//! generated in and whichever thread generates them.
//!
//! Several generation strategies are available:
//! - `LayeredTerrain`: full columns with kinds banded by depth (the default)
//! - `FlatTerrain`: the top layers filled with a single kind
//! - `EmptyTerrain`: no blocks at all

use serde::Deserialize;

use super::block::block_type::BlockKind;
use super::block::Block;
use super::chunk::chunk_creation::ChunkCreationIterator;
use super::chunk::{Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_WIDTH, TERRAIN_HEIGHT};

/// A pure function from global coordinates to block content.
pub trait TerrainGenerator: Send + Sync {
    /// The kind of block at a global coordinate, or `None` for empty space.
    ///
    /// Only y in `(-TERRAIN_HEIGHT, 0]` is ever asked for.
    fn kind_at(&self, x: i32, y: i32, z: i32) -> Option<BlockKind>;

    /// Every block of the chunk footprint at `position`.
    ///
    /// The footprint is walked local x first, then local z, then y from the
    /// top (0) down to `-(TERRAIN_HEIGHT - 1)`.
    fn generate(&self, position: ChunkPosition) -> Vec<Block> {
        let (origin_x, origin_z) = position.origin();
        let mut blocks = Vec::new();
        for y in (-(TERRAIN_HEIGHT - 1)..=0).rev() {
            for local_z in 0..CHUNK_DEPTH {
                for local_x in 0..CHUNK_WIDTH {
                    let x = origin_x + local_x;
                    let z = origin_z + local_z;
                    if let Some(kind) = self.kind_at(x, y, z) {
                        blocks.push(Block::new(x, y, z, kind));
                    }
                }
            }
        }
        blocks
    }

    /// Generates the chunk at `position` and returns it fully populated.
    fn generate_chunk(&self, position: ChunkPosition) -> Chunk {
        let mut cci = ChunkCreationIterator::new(position);
        cci.extend(self.generate(position));
        cci.return_chunk()
    }
}

/// Full terrain columns whose kinds follow fixed depth bands.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayeredTerrain;

impl TerrainGenerator for LayeredTerrain {
    fn kind_at(&self, _x: i32, y: i32, _z: i32) -> Option<BlockKind> {
        if y > 0 || y <= -TERRAIN_HEIGHT {
            return None;
        }
        Some(BlockKind::for_depth(y))
    }
}

/// A flat slab of a single kind, `depth` layers thick, with its top at y = 0.
#[derive(Clone, Copy, Debug)]
pub struct FlatTerrain {
    /// The kind every generated block gets.
    pub kind: BlockKind,
    /// Number of layers, clamped to the terrain height.
    pub depth: i32,
}

impl TerrainGenerator for FlatTerrain {
    fn kind_at(&self, _x: i32, y: i32, _z: i32) -> Option<BlockKind> {
        let depth = self.depth.clamp(0, TERRAIN_HEIGHT);
        if y > 0 || y <= -depth {
            return None;
        }
        Some(self.kind)
    }
}

/// Generates chunks with no blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyTerrain;

impl TerrainGenerator for EmptyTerrain {
    fn kind_at(&self, _x: i32, _y: i32, _z: i32) -> Option<BlockKind> {
        None
    }
}

/// The method used to generate new chunks, as named in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Depth-banded full columns
    #[default]
    Layered,
    /// A single surface layer
    Flat,
    /// Nothing at all
    Empty,
}

impl GenerationMethod {
    /// Builds the generator for this method.
    pub fn generator(self) -> Box<dyn TerrainGenerator> {
        match self {
            GenerationMethod::Layered => Box::new(LayeredTerrain),
            GenerationMethod::Flat => Box::new(FlatTerrain {
                kind: BlockKind::SURFACE,
                depth: 1,
            }),
            GenerationMethod::Empty => Box::new(EmptyTerrain),
        }
    }
}
