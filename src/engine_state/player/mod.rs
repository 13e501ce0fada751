//! # Player
//!
//! The player's body: where its feet are, where it looks, and the box it
//! occupies. The voxel world never moves the player; `PlayerController` reads
//! world queries and corrects the position itself.
//!
//! ## Conventions
//!
//! * `position` is the centre of the feet, so the box spans
//!   `[x - 0.3, x + 0.3] x [y, y + 1.8] x [z - 0.3, z + 0.3]`
//! * Yaw 0 looks along +X, positive yaw turns towards +Z
//! * Pitch is clamped just short of straight up and straight down

use std::f32::consts::FRAC_PI_2;

use cgmath::{Angle, InnerSpace, Point3, Rad, Vector3};

pub mod physics;

/// Width and depth of the player's box.
pub const PLAYER_WIDTH: f32 = 0.6;
/// Height of the player's box.
pub const PLAYER_HEIGHT: f32 = 1.8;
/// Height of the eyes above the feet.
pub const EYE_HEIGHT: f32 = 1.6;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// The player's body state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre of the feet in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation in radians
    pub pitch: Rad<f32>,
    /// Vertical speed in blocks per second, positive upwards
    pub vertical_velocity: f32,
    /// Whether the player stood on a block after the last physics step
    pub grounded: bool,
}

impl Player {
    /// Creates a player standing at `position`, looking along +X.
    pub fn new<V: Into<Point3<f32>>>(position: V) -> Self {
        Player {
            position: position.into(),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            vertical_velocity: 0.0,
            grounded: false,
        }
    }

    /// Where the eyes are; rays for block selection start here.
    pub fn eye_position(&self) -> Point3<f32> {
        Point3::new(
            self.position.x,
            self.position.y + EYE_HEIGHT,
            self.position.z,
        )
    }

    /// Unit vector the player is looking along.
    pub fn view_direction(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Turns the view, clamping pitch.
    pub fn rotate(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw = (self.yaw + yaw).normalize();
        self.pitch += pitch;

        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }

    /// The player's box as `(min, max)` corners.
    pub fn aabb(&self) -> (Point3<f32>, Point3<f32>) {
        Self::aabb_at(self.position)
    }

    /// The box the player would occupy with its feet at `position`.
    pub fn aabb_at(position: Point3<f32>) -> (Point3<f32>, Point3<f32>) {
        let half = PLAYER_WIDTH / 2.0;
        (
            Point3::new(position.x - half, position.y, position.z - half),
            Point3::new(
                position.x + half,
                position.y + PLAYER_HEIGHT,
                position.z + half,
            ),
        )
    }

    /// Whether the unit cube centred on `cell` overlaps the player's box.
    /// Touching faces do not count.
    pub fn overlaps_cell(&self, cell: Point3<i32>) -> bool {
        let (min, max) = self.aabb();
        (0..3).all(|axis| {
            let center = cell[axis] as f32;
            center - 0.5 < max[axis] && center + 0.5 > min[axis]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_direction_follows_yaw_and_pitch() {
        let mut player = Player::new(Point3::new(0.0, 0.0, 0.0));
        let forward = player.view_direction();
        assert!((forward - Vector3::unit_x()).magnitude() < 1e-6);

        player.rotate(Rad(FRAC_PI_2), Rad(0.0));
        assert!((player.view_direction() - Vector3::unit_z()).magnitude() < 1e-5);

        player.rotate(Rad(0.0), Rad(-10.0));
        assert_eq!(player.pitch, -Rad(SAFE_FRAC_PI_2));
        assert!(player.view_direction().y < -0.99);
    }

    #[test]
    fn eye_and_box_are_relative_to_the_feet() {
        let player = Player::new(Point3::new(8.0, 0.5, 8.0));
        let eye = player.eye_position();
        assert_eq!((eye.x, eye.z), (8.0, 8.0));
        assert!((eye.y - 2.1).abs() < 1e-6);
        let (min, max) = player.aabb();
        assert!((min.x - 7.7).abs() < 1e-6);
        assert!((max.y - 2.3).abs() < 1e-6);
    }

    #[test]
    fn overlap_excludes_touching_cells() {
        let player = Player::new(Point3::new(8.0, 0.5, 8.0));
        assert!(!player.overlaps_cell(Point3::new(8, 0, 8)));
        assert!(player.overlaps_cell(Point3::new(8, 1, 8)));
        assert!(player.overlaps_cell(Point3::new(8, 2, 8)));
        assert!(!player.overlaps_cell(Point3::new(8, 3, 8)));
        assert!(!player.overlaps_cell(Point3::new(9, 1, 8)));
    }
}
