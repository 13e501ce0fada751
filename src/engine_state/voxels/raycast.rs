//! Ray and block intersection used for block selection.

use cgmath::{InnerSpace, Point3, Vector3};

use super::block::block_side::BlockSide;
use super::block::Block;

/// Tolerance used when matching a hit point against a face plane.
pub const FACE_EPSILON: f32 = 0.01;

/// A ray with a normalized direction. Distances along it are in world units.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Where the ray starts
    pub origin: Point3<f32>,
    /// Unit direction of travel
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// # Returns
    /// `None` for a zero or non-finite direction.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let length = direction.magnitude();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / length,
        })
    }

    /// The point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Intersects the ray with a block's unit cube (slab method).
    ///
    /// When the origin lies inside the cube the exit point is reported.
    ///
    /// # Returns
    /// The non-negative distance to the hit and whether the ray was entering
    /// the cube there, or `None` if the cube is missed or lies behind the ray.
    pub fn intersect_block(&self, block: &Block) -> Option<(f32, bool)> {
        let min = block.min_corner();
        let max = block.max_corner();
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            if direction.abs() <= f32::EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let mut t1 = (min[axis] - origin) / direction;
            let mut t2 = (max[axis] - origin) / direction;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_near = t_near.max(t1);
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        if t_near >= 0.0 {
            Some((t_near, true))
        } else {
            Some((t_far, false))
        }
    }
}

/// Works out which face of `block` a hit at `point` struck.
///
/// A face qualifies when the point lies on its plane within `FACE_EPSILON` and
/// the ray actually crosses it (into the cube when `entering`, out of it
/// otherwise). Faces are tested x, then y, then z, and the first qualifying one
/// wins, so a hit exactly on an edge the ray crosses through resolves to the
/// earliest axis.
pub fn resolve_hit_face(
    block: &Block,
    point: Point3<f32>,
    direction: Vector3<f32>,
    entering: bool,
) -> BlockSide {
    let local = Vector3::new(
        point.x - block.position.x as f32,
        point.y - block.position.y as f32,
        point.z - block.position.z as f32,
    );
    let on_plane = |side: BlockSide| {
        (local[side.axis()] - 0.5 * side.sign() as f32).abs() < FACE_EPSILON
    };
    let crosses = |side: BlockSide| {
        let along_normal = direction[side.axis()] * side.sign() as f32;
        if entering {
            along_normal < 0.0
        } else {
            along_normal > 0.0
        }
    };

    let sides = BlockSide::all();
    if let Some(side) = sides.iter().copied().find(|&side| on_plane(side) && crosses(side)) {
        return side;
    }
    if let Some(side) = sides.iter().copied().find(|&side| on_plane(side)) {
        return side;
    }

    // Rounding put the point off every plane; fall back to the dominant axis.
    let axis = (0..3)
        .max_by(|&a, &b| local[a].abs().total_cmp(&local[b].abs()))
        .unwrap_or(0);
    sides
        .iter()
        .copied()
        .find(|side| side.axis() == axis && (side.sign() > 0) == (local[axis] >= 0.0))
        .unwrap_or(BlockSide::TOP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockKind;

    fn block() -> Block {
        Block::new(0, 0, 0, BlockKind::SURFACE)
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn ray_along_an_edge_hits_the_face_it_crosses() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let (t, entering) = ray.intersect_block(&block()).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(entering);
        let face = resolve_hit_face(&block(), ray.at(t), ray.direction, entering);
        assert_eq!(face, BlockSide::FRONT);
    }

    #[test]
    fn corner_hit_prefers_x_then_y() {
        let direction = Vector3::new(-1.0, -1.0, -1.0);
        let ray = Ray::new(Point3::new(2.5, 2.5, 2.5), direction).unwrap();
        let (t, entering) = ray.intersect_block(&block()).unwrap();
        let face = resolve_hit_face(&block(), ray.at(t), ray.direction, entering);
        assert_eq!(face, BlockSide::RIGHT);

        let ray = Ray::new(Point3::new(0.0, 2.5, 2.5), Vector3::new(0.0, -1.0, -1.0)).unwrap();
        let (t, entering) = ray.intersect_block(&block()).unwrap();
        let face = resolve_hit_face(&block(), ray.at(t), ray.direction, entering);
        assert_eq!(face, BlockSide::TOP);
    }

    #[test]
    fn each_face_resolves_from_straight_on() {
        let cases = [
            (Vector3::new(3.0, 0.1, 0.2), BlockSide::RIGHT),
            (Vector3::new(-3.0, 0.1, 0.2), BlockSide::LEFT),
            (Vector3::new(0.1, 3.0, 0.2), BlockSide::TOP),
            (Vector3::new(0.1, -3.0, 0.2), BlockSide::BOTTOM),
            (Vector3::new(0.1, 0.2, 3.0), BlockSide::FRONT),
            (Vector3::new(0.1, 0.2, -3.0), BlockSide::BACK),
        ];
        for (offset, expected) in cases {
            let origin = Point3::new(offset.x, offset.y, offset.z);
            let side = expected.normal();
            let ray = Ray::new(origin, -side).unwrap();
            let (t, entering) = ray.intersect_block(&block()).unwrap();
            assert!((t - 2.5).abs() < 1e-5);
            assert_eq!(
                resolve_hit_face(&block(), ray.at(t), ray.direction, entering),
                expected
            );
        }
    }

    #[test]
    fn misses_and_blocks_behind() {
        let ray = Ray::new(Point3::new(2.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(ray.intersect_block(&block()).is_none());
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(ray.intersect_block(&block()).is_none());
    }

    #[test]
    fn origin_inside_reports_exit() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)).unwrap();
        let (t, entering) = ray.intersect_block(&block()).unwrap();
        assert!((t - 0.5).abs() < 1e-5);
        assert!(!entering);
        assert_eq!(
            resolve_hit_face(&block(), ray.at(t), ray.direction, entering),
            BlockSide::TOP
        );
    }
}
