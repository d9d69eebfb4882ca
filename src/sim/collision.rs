//! Box-vs-box collision detection
//!
//! A plain AABB overlap test, no broad phase. The vertical axis looks one
//! step ahead along the first box's velocity so a falling box stops on a
//! surface instead of sinking into it.

use super::body::{Aabb, BoxBody};

/// Check whether `a` touches or will touch `b` on its next vertical step
///
/// Faces that exactly touch count as colliding. Only `a`'s vertical
/// velocity is considered, so the test is not symmetric.
pub fn box_collision(a: &BoxBody, b: &BoxBody, dt: f32) -> bool {
    let ab = a.bounds();
    let bb = b.bounds();

    let x_collision = ab.right >= bb.left && ab.left <= bb.right;
    let z_collision = ab.front <= bb.back && ab.back >= bb.front;
    let y_collision = ab.bottom + a.velocity.y * dt <= bb.top && ab.top >= bb.bottom;

    x_collision && y_collision && z_collision
}

/// Static overlap of two sets of sides (symmetric, no look-ahead)
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.right >= b.left
        && a.left <= b.right
        && a.top >= b.bottom
        && a.bottom <= b.top
        && a.back >= b.front
        && a.front <= b.back
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec3;
    use proptest::prelude::*;

    fn cube(pos: Vec3) -> BoxBody {
        BoxBody::new(Vec3::splat(1.5), pos, Vec3::ZERO, 0)
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = cube(Vec3::ZERO);
        let b = cube(Vec3::new(1.0, 0.5, -1.0));
        assert!(box_collision(&a, &b, SIM_DT));
        assert!(box_collision(&b, &a, SIM_DT));
    }

    #[test]
    fn test_touching_faces_collide() {
        let a = cube(Vec3::ZERO);
        let b = cube(Vec3::new(1.5, 0.0, 0.0));
        assert!(box_collision(&a, &b, SIM_DT));

        let c = cube(Vec3::new(0.0, 0.0, -1.5));
        assert!(box_collision(&a, &c, SIM_DT));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = cube(Vec3::ZERO);
        assert!(!box_collision(&a, &cube(Vec3::new(1.6, 0.0, 0.0)), SIM_DT));
        assert!(!box_collision(&a, &cube(Vec3::new(0.0, 0.0, 1.6)), SIM_DT));
        assert!(!box_collision(&a, &cube(Vec3::new(0.0, 1.6, 0.0)), SIM_DT));
        assert!(!box_collision(&a, &cube(Vec3::new(0.0, -1.6, 0.0)), SIM_DT));
    }

    #[test]
    fn test_vertical_look_ahead() {
        let floor = cube(Vec3::ZERO);
        // Gap of 0.05 between a's bottom and floor top
        let mut a = cube(Vec3::new(0.0, 1.55, 0.0));
        assert!(!box_collision(&a, &floor, SIM_DT));

        // Falling fast enough to close the gap this step
        a.velocity.y = -0.06 / SIM_DT;
        assert!(box_collision(&a, &floor, SIM_DT));

        // The look-ahead is one-sided: the floor doesn't see it coming
        assert!(!box_collision(&floor, &a, SIM_DT));
    }

    #[test]
    fn test_aabb_overlap_matches_static_collision() {
        let a = cube(Vec3::ZERO);
        let b = cube(Vec3::new(1.2, -0.3, 0.7));
        assert_eq!(
            aabb_overlap(&a.bounds(), &b.bounds()),
            box_collision(&a, &b, SIM_DT)
        );
    }

    proptest! {
        #[test]
        fn prop_aabb_overlap_is_symmetric(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0, az in -10.0f32..10.0,
            bx in -10.0f32..10.0, by in -10.0f32..10.0, bz in -10.0f32..10.0,
            sa in 0.1f32..4.0, sb in 0.1f32..4.0,
        ) {
            let a = BoxBody::new(Vec3::splat(sa), Vec3::new(ax, ay, az), Vec3::ZERO, 0).bounds();
            let b = BoxBody::new(Vec3::splat(sb), Vec3::new(bx, by, bz), Vec3::ZERO, 0).bounds();
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn prop_faster_fall_never_loses_a_hit(
            height in 0.0f32..3.0,
            slow in 0.0f32..50.0,
            extra in 0.0f32..50.0,
        ) {
            let floor = BoxBody::new(Vec3::new(20.0, 0.5, 20.0), Vec3::ZERO, Vec3::ZERO, 0);
            let pos = Vec3::new(0.0, 0.25 + 0.75 + height, 0.0);
            let a = BoxBody::new(Vec3::splat(1.5), pos, Vec3::new(0.0, -slow, 0.0), 0);
            let b = BoxBody::new(Vec3::splat(1.5), pos, Vec3::new(0.0, -(slow + extra), 0.0), 0);
            if box_collision(&a, &floor, SIM_DT) {
                prop_assert!(box_collision(&b, &floor, SIM_DT));
            }
        }
    }
}
