//! Block selection and editing from mouse clicks.
//!
//! The left button breaks the targeted block. The right button places a block
//! against the face the view ray struck, unless the new cube would overlap the
//! player.

use cgmath::Point3;
use log::debug;

use super::player::Player;
use super::voxels::block::block_type::BlockKind;
use super::voxels::block::Block;
use super::voxels::world::{RaycastHit, World};

/// Mouse buttons that edit the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Break
    Left,
    /// Place
    Right,
}

/// An edit to apply to the targeted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    /// Remove the targeted block
    Break,
    /// Add a block of this kind against the struck face
    Place(BlockKind),
}

impl BlockAction {
    /// The action a click performs when `held` is the kind in hand.
    pub fn from_button(button: MouseButton, held: BlockKind) -> Self {
        match button {
            MouseButton::Left => BlockAction::Break,
            MouseButton::Right => BlockAction::Place(held),
        }
    }
}

/// What applying a `BlockAction` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// This block was removed
    Broken(Block),
    /// This block was added
    Placed(Block),
    /// Placement at this cell would have overlapped the player
    Refused(Point3<i32>),
    /// Nothing changed: no target, or the world rejected the edit
    Ignored,
}

/// The block the player is looking at, within `reach`.
pub fn target_block(world: &World, player: &Player, reach: f32) -> Option<RaycastHit> {
    world.raycast_block(player.eye_position(), player.view_direction(), reach)
}

/// Applies `action` to the block struck by `hit`.
pub fn apply_action(
    world: &mut World,
    player: &Player,
    hit: &RaycastHit,
    action: BlockAction,
) -> InteractionOutcome {
    match action {
        BlockAction::Break => {
            let position = hit.block.position;
            match world.remove_block(position.x, position.y, position.z) {
                Some(kind) => {
                    debug!("broke {:?} block at {:?}", kind, position);
                    InteractionOutcome::Broken(Block { position, kind })
                }
                None => InteractionOutcome::Ignored,
            }
        }
        BlockAction::Place(kind) => {
            let position = hit.placement_position();
            if player.overlaps_cell(position) {
                debug!("refused placement at {:?}: inside the player", position);
                return InteractionOutcome::Refused(position);
            }
            if world.add_block(position.x, position.y, position.z, kind) {
                debug!("placed {:?} block at {:?}", kind, position);
                InteractionOutcome::Placed(Block { position, kind })
            } else {
                InteractionOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rad;

    use crate::engine_state::voxels::chunk::ChunkPosition;

    fn world() -> World {
        let mut world = World::default();
        for position in ChunkPosition::new(0, 0).square_around(1) {
            world.store_mut().request(position);
        }
        while world.store_mut().materialize_next().is_some() {}
        world
    }

    fn looking_down(x: f32, z: f32) -> Player {
        let mut player = Player::new(Point3::new(x, 0.5, z));
        player.rotate(Rad(0.0), Rad(-1.0));
        player
    }

    #[test]
    fn buttons_map_to_actions() {
        assert_eq!(
            BlockAction::from_button(MouseButton::Left, BlockKind::DEEP),
            BlockAction::Break
        );
        assert_eq!(
            BlockAction::from_button(MouseButton::Right, BlockKind::DEEP),
            BlockAction::Place(BlockKind::DEEP)
        );
    }

    #[test]
    fn break_then_place_into_the_hole() {
        let mut world = world();
        let player = looking_down(8.0, 8.0);
        let hit = target_block(&world, &player, 6.0).unwrap();
        assert_eq!(hit.block.position.y, 0);
        assert!(hit.block.position.x > 8);

        let outcome = apply_action(&mut world, &player, &hit, BlockAction::Break);
        assert_eq!(outcome, InteractionOutcome::Broken(hit.block));
        assert!(world.block_at(hit.block.position.x, 0, hit.block.position.z).is_none());

        let below = target_block(&world, &player, 6.0).unwrap();
        let outcome =
            apply_action(&mut world, &player, &below, BlockAction::Place(BlockKind::DEEP));
        assert_eq!(
            outcome,
            InteractionOutcome::Placed(Block {
                position: below.placement_position(),
                kind: BlockKind::DEEP,
            })
        );
    }

    #[test]
    fn placement_inside_the_player_is_refused() {
        let mut world = world();
        let mut player = Player::new(Point3::new(8.0, 0.5, 8.0));
        player.rotate(Rad(0.0), Rad(-1.5));
        let hit = target_block(&world, &player, 6.0).unwrap();
        assert_eq!(hit.block.position, Point3::new(8, 0, 8));
        assert_eq!(hit.placement_position(), Point3::new(8, 1, 8));

        let before = world.block_count();
        let outcome = apply_action(&mut world, &player, &hit, BlockAction::Place(BlockKind::MID));
        assert_eq!(outcome, InteractionOutcome::Refused(Point3::new(8, 1, 8)));
        assert_eq!(world.block_count(), before);
    }

    #[test]
    fn nothing_in_reach_means_no_target() {
        let world = world();
        let mut player = Player::new(Point3::new(8.0, 0.5, 8.0));
        player.rotate(Rad(0.0), Rad(1.0));
        assert!(target_block(&world, &player, 6.0).is_none());
    }
}
