//! # Block Kind Module
//!
//! This module defines the material kinds a block can have. Kinds are chosen by
//! depth band when terrain is generated and are otherwise supplied explicitly by
//! whoever adds a block.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockKindSize;

/// Enumerates the materials of a block.
///
/// The discriminants are the compact material index stored by a chunk, and also
/// the batch index used by the render collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// The single top layer of the terrain (y = 0).
    SURFACE = 0,

    /// The layers just below the surface (-4 ≤ y < 0).
    UPPER = 1,

    /// The middle band (-15 ≤ y < -4).
    MID = 2,

    /// Everything below the middle band (y < -15).
    DEEP = 3,
}

/// Number of distinct block kinds.
pub const BLOCK_KIND_COUNT: usize = 4;

impl BlockKind {
    /// Returns all kinds in material index order.
    pub fn all() -> [BlockKind; BLOCK_KIND_COUNT] {
        [
            BlockKind::SURFACE,
            BlockKind::UPPER,
            BlockKind::MID,
            BlockKind::DEEP,
        ]
    }

    /// Selects the kind of a generated block from its global y coordinate.
    ///
    /// # Arguments
    /// * `y` - Global y coordinate of the block, at most 0 for generated terrain
    ///
    /// # Returns
    /// `SURFACE` at y = 0, `UPPER` for -4..0, `MID` for -15..-4 and `DEEP` below.
    pub fn for_depth(y: i32) -> Self {
        if y >= 0 {
            BlockKind::SURFACE
        } else if y >= -4 {
            BlockKind::UPPER
        } else if y >= -15 {
            BlockKind::MID
        } else {
            BlockKind::DEEP
        }
    }

    /// Converts a stored material index back into a `BlockKind`.
    ///
    /// # Returns
    /// `None` if the index does not name a kind.
    pub fn from_index(index: BlockKindSize) -> Option<Self> {
        FromPrimitive::from_u8(index)
    }

    /// The compact material index of this kind.
    pub fn index(self) -> BlockKindSize {
        self as BlockKindSize
    }
}
