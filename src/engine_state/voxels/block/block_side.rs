//! # Block Side Module
//!
//! This module defines the six faces of a block. A raycast reports the face it
//! struck, and block placement offsets the new block by that face's normal.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The declaration order is the order faces are tested when resolving a hit:
/// x faces first, then y, then z, the positive face of each axis before the
/// negative one.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The right face (facing positive X)
    RIGHT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns all six faces in hit resolution order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The axis this face is perpendicular to (0 = x, 1 = y, 2 = z).
    pub fn axis(self) -> usize {
        match self {
            BlockSide::RIGHT | BlockSide::LEFT => 0,
            BlockSide::TOP | BlockSide::BOTTOM => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// +1 for the positive face of an axis, -1 for the negative one.
    pub fn sign(self) -> i32 {
        match self {
            BlockSide::RIGHT | BlockSide::TOP | BlockSide::FRONT => 1,
            BlockSide::LEFT | BlockSide::BOTTOM | BlockSide::BACK => -1,
        }
    }

    /// Integer offset from a block to its neighbour across this face.
    ///
    /// Placing a block against a targeted face puts it at `target + offset()`.
    pub fn offset(self) -> Vector3<i32> {
        let mut offset = Vector3::new(0, 0, 0);
        offset[self.axis()] = self.sign();
        offset
    }

    /// Unit outward normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }
}
