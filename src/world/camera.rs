use glam::{Vec2, Vec3};

/// Player view-point in world space.
///
/// * Only **yaw** (heading) is simulated – Doom never tilts up/down.
/// * `z` is the absolute eye altitude, not height above the floor.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec3, // x,y in map-units; z = eye altitude
    pub yaw: f32,  // radians (0 = east, counter-clockwise)
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32) -> Self {
        Self { pos, yaw }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /// Position on the map plane.
    #[inline(always)]
    pub fn xy(&self) -> Vec2 {
        self.pos.truncate()
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s) // 0 rad = +X (east), CCW positive
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Displacement for `forward` units ahead and `side` units to the right.
    pub fn step_vector(self, forward: f32, side: f32) -> Vec2 {
        self.forward() * forward + self.right() * side
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn forward_and_right_are_orthonormal() {
        let cam = Camera::new(Vec3::ZERO, 0.3);
        let f = cam.forward();
        let r = cam.right();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((f.dot(r)).abs() < 1e-5);
    }

    #[test]
    fn right_is_clockwise_of_forward() {
        let cam = Camera::new(Vec3::ZERO, FRAC_PI_2);
        // facing north, right is east
        assert!((cam.right() - Vec2::X).length() < 1e-5);
        assert!((cam.step_vector(0.0, 2.0) - Vec2::new(2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn turn_wraps_into_one_revolution() {
        let mut cam = Camera::new(Vec3::ZERO, 0.1);
        cam.turn(-0.2);
        assert!(cam.yaw >= 0.0 && cam.yaw < TAU);
        assert!((cam.yaw - (TAU - 0.1)).abs() < 1e-5);
    }
}
