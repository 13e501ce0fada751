//! # Block Module
//!
//! This module provides the block value type of the voxel world together with
//! its material kinds and faces.

use block_type::BlockKind;
use cgmath::Point3;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to store block kinds inside a chunk.
pub type BlockKindSize = u8;

/// A single unit cube in the world.
///
/// A block has no identity beyond its coordinate: it is centred on `position`
/// and spans half a unit in every direction. Blocks never move; removing one
/// deletes it and adding one creates a fresh value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Global integer coordinate of the block's centre.
    pub position: Point3<i32>,
    /// The block's material.
    pub kind: BlockKind,
}

impl Block {
    /// Creates a new block at a global coordinate.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Global block coordinates
    /// * `kind` - The material of the block
    pub fn new(x: i32, y: i32, z: i32, kind: BlockKind) -> Self {
        Block {
            position: Point3::new(x, y, z),
            kind,
        }
    }

    /// The minimum corner of the block's cube.
    pub fn min_corner(&self) -> Point3<f32> {
        Point3::new(
            self.position.x as f32 - 0.5,
            self.position.y as f32 - 0.5,
            self.position.z as f32 - 0.5,
        )
    }

    /// The maximum corner of the block's cube.
    pub fn max_corner(&self) -> Point3<f32> {
        Point3::new(
            self.position.x as f32 + 0.5,
            self.position.y as f32 + 0.5,
            self.position.z as f32 + 0.5,
        )
    }
}
