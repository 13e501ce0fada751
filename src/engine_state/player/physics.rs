//! Walking, jumping and gravity with per-axis block collision.
//!
//! Each step moves the player along X, then Z, then Y. After every axis the
//! player's box is probed with `World::intersecting_blocks`; on contact the
//! player is snapped back to the face it ran into.

use cgmath::{Angle, InnerSpace, Vector3};
use log::trace;
use web_time::Duration;

use super::{Player, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::engine_state::voxels::chunk::ChunkPosition;
use crate::engine_state::voxels::world::World;

/// Longest time step simulated at once; longer frames are clamped.
const MAX_STEP: f32 = 0.1;

/// Largest distance moved along one axis before probing again.
const MAX_SUBSTEP: f32 = 0.5;

/// Gap kept between the player and a wall after a horizontal snap.
const COLLISION_SKIN: f32 = 1e-3;

/// Movement intent for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// Forward (positive) or backward (negative), in [-1, 1]
    pub forward: f32,
    /// Right (positive) or left (negative), in [-1, 1]
    pub right: f32,
    /// Jump if standing on something
    pub jump: bool,
}

/// Moves a `Player` through a `World`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    /// Horizontal speed in blocks per second
    pub walk_speed: f32,
    /// Upward speed given by a jump
    pub jump_velocity: f32,
    /// Downward acceleration
    pub gravity: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        PlayerController {
            walk_speed: 4.3,
            jump_velocity: 8.0,
            gravity: 20.0,
        }
    }
}

impl PlayerController {
    /// Creates a controller with the given physical constants.
    pub fn new(walk_speed: f32, jump_velocity: f32, gravity: f32) -> Self {
        PlayerController {
            walk_speed,
            jump_velocity,
            gravity,
        }
    }

    /// Advances the player by `dt`.
    ///
    /// # Arguments
    /// * `player` - The player to move
    /// * `input` - Walking and jumping intent
    /// * `dt` - Time since the last step, clamped to 100 ms
    /// * `world` - Blocks to collide with
    ///
    /// # Notes
    /// While the chunk under the player is not generated there is nothing to
    /// land on yet, so vertical motion is frozen instead of letting the player
    /// fall through the missing terrain.
    pub fn step(&self, player: &mut Player, input: &MovementInput, dt: Duration, world: &World) {
        let dt = dt.as_secs_f32().min(MAX_STEP);
        if dt <= 0.0 {
            return;
        }

        let (yaw_sin, yaw_cos) = player.yaw.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        let mut walk = forward * input.forward + right * input.right;
        if walk.magnitude2() > 1.0 {
            walk = walk.normalize();
        }
        let walk = walk * self.walk_speed * dt;

        move_axis(player, world, 0, walk.x);
        move_axis(player, world, 2, walk.z);

        let under = ChunkPosition::from_world(player.position.x, player.position.z);
        if !world.store().is_present(under) {
            trace!("chunk {} not generated, holding height", under);
            player.vertical_velocity = 0.0;
            return;
        }

        if input.jump && player.grounded {
            player.vertical_velocity = self.jump_velocity;
            player.grounded = false;
        }
        player.vertical_velocity -= self.gravity * dt;

        let falling = player.vertical_velocity < 0.0;
        let blocked = move_axis(player, world, 1, player.vertical_velocity * dt);
        if blocked {
            player.vertical_velocity = 0.0;
        }
        player.grounded = blocked && falling;
    }
}

/// Moves the player by `delta` along `axis`, stopping at the first block.
///
/// # Returns
/// Whether a block stopped the movement.
fn move_axis(player: &mut Player, world: &World, axis: usize, delta: f32) -> bool {
    if delta == 0.0 {
        return false;
    }
    let substeps = (delta.abs() / MAX_SUBSTEP).ceil().max(1.0) as u32;
    let increment = delta / substeps as f32;

    for _ in 0..substeps {
        let previous = player.position[axis];
        let mut candidate = player.position;
        candidate[axis] += increment;

        let (min, max) = Player::aabb_at(candidate);
        let blocks = world.intersecting_blocks(min, max);
        if blocks.is_empty() {
            player.position = candidate;
            continue;
        }

        let (low_extent, high_extent) = extents(axis);
        let snapped = if increment > 0.0 {
            let face = blocks
                .iter()
                .map(|block| block.position[axis] as f32 - 0.5)
                .fold(f32::INFINITY, f32::min);
            (face - high_extent - skin(axis)).max(previous)
        } else {
            let face = blocks
                .iter()
                .map(|block| block.position[axis] as f32 + 0.5)
                .fold(f32::NEG_INFINITY, f32::max);
            (face + low_extent + skin(axis)).min(previous)
        };
        player.position[axis] = snapped;
        return true;
    }
    false
}

/// Distance from the feet to the low and high faces of the box along `axis`.
fn extents(axis: usize) -> (f32, f32) {
    if axis == 1 {
        (0.0, PLAYER_HEIGHT)
    } else {
        (PLAYER_WIDTH / 2.0, PLAYER_WIDTH / 2.0)
    }
}

/// Vertical snaps land exactly on block faces, which are representable.
fn skin(axis: usize) -> f32 {
    if axis == 1 {
        0.0
    } else {
        COLLISION_SKIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    use crate::engine_state::voxels::block::block_type::BlockKind;

    const FRAME: Duration = Duration::from_millis(16);

    fn loaded_world() -> World {
        let mut world = World::default();
        for position in ChunkPosition::new(0, 0).square_around(1) {
            world.store_mut().request(position);
        }
        while world.store_mut().materialize_next().is_some() {}
        world
    }

    fn settle(player: &mut Player, controller: &PlayerController, world: &World) {
        for _ in 0..120 {
            controller.step(player, &MovementInput::default(), FRAME, world);
        }
    }

    #[test]
    fn falls_and_lands_on_the_surface() {
        let world = loaded_world();
        let controller = PlayerController::default();
        let mut player = Player::new(Point3::new(8.0, 2.0, 8.0));
        settle(&mut player, &controller, &world);

        assert_eq!(player.position.y, 0.5);
        assert!(player.grounded);
        assert_eq!(player.vertical_velocity, 0.0);
        assert!(world.is_occupied(8, 0, 8));
    }

    #[test]
    fn jumps_only_from_the_ground() {
        let world = loaded_world();
        let controller = PlayerController::default();
        let mut player = Player::new(Point3::new(8.0, 0.5, 8.0));
        settle(&mut player, &controller, &world);

        let jump = MovementInput {
            jump: true,
            ..MovementInput::default()
        };
        controller.step(&mut player, &jump, FRAME, &world);
        assert!(player.position.y > 0.5);
        assert!(!player.grounded);

        let velocity = player.vertical_velocity;
        controller.step(&mut player, &jump, FRAME, &world);
        assert!(player.vertical_velocity < velocity);

        settle(&mut player, &controller, &world);
        assert_eq!(player.position.y, 0.5);
        assert!(player.grounded);
    }

    #[test]
    fn walls_stop_horizontal_movement() {
        let mut world = loaded_world();
        for y in 1..=3 {
            for z in 5..=11 {
                assert!(world.add_block(10, y, z, BlockKind::MID));
            }
        }
        let controller = PlayerController::default();
        let mut player = Player::new(Point3::new(8.0, 0.5, 8.0));
        let walk = MovementInput {
            forward: 1.0,
            ..MovementInput::default()
        };
        for _ in 0..120 {
            controller.step(&mut player, &walk, FRAME, &world);
        }

        assert!((player.position.x - 9.2).abs() < 0.01);
        assert!(player.position.x < 9.2);
        assert_eq!(player.position.y, 0.5);

        // Strafing along the wall is not blocked by it.
        let strafe = MovementInput {
            right: 1.0,
            ..MovementInput::default()
        };
        controller.step(&mut player, &strafe, FRAME, &world);
        assert!(player.position.z > 8.0);
    }

    #[test]
    fn height_is_held_over_ungenerated_chunks() {
        let world = World::default();
        let controller = PlayerController::default();
        let mut player = Player::new(Point3::new(8.0, 2.0, 8.0));
        settle(&mut player, &controller, &world);
        assert_eq!(player.position.y, 2.0);
        assert!(!player.grounded);
    }
}
