//! Instance data for batched block rendering.
//!
//! A render collaborator draws every block of one kind in a chunk with a single
//! instanced draw call. This module defines the per-instance record uploaded for
//! each block.

use crate::engine_state::voxels::block::Block;

/// One instanced cube in a render batch.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), the centre of the block in world space
/// - Kind: u32 (4 bytes), the material index of the block
///
/// Total size: 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockInstance {
    /// Centre of the block in world space
    pub position: [f32; 3],
    /// Material index of the block
    pub kind: u32,
}

impl BlockInstance {
    /// Builds the instance record of a block.
    pub fn from_block(block: &Block) -> Self {
        BlockInstance {
            position: [
                block.position.x as f32,
                block.position.y as f32,
                block.position.z as f32,
            ],
            kind: block.kind.index() as u32,
        }
    }
}

/// Views a slice of instances as raw bytes, ready for a buffer upload.
pub fn instance_bytes(instances: &[BlockInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockKind;

    #[test]
    fn instance_layout() {
        assert_eq!(std::mem::size_of::<BlockInstance>(), 16);
        let instances = [BlockInstance::from_block(&Block::new(1, -2, 3, BlockKind::MID))];
        let bytes = instance_bytes(&instances);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..16], &2u32.to_ne_bytes());
    }
}
