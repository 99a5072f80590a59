use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Vec2;

use crate::{
    renderer::{Screen, software::span::Span},
    world::{Camera, Level, SegmentId},
};

/// Vertical pixels per map unit of height at distance 1, per screen row.
const PROJECTION_SCALE: f32 = 30.0 / 23.0;

/// Wrap `a` into `[-π, π]`.
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    if !a.is_finite() {
        return a;
    }
    let a = (a + PI).rem_euclid(TAU) - PI;
    if a == -PI { PI } else { a }
}

/// Texel wrap for integer coordinates; negative inputs wrap from the end.
#[inline(always)]
pub fn wrap(v: i32, dim: usize) -> usize {
    v.rem_euclid(dim as i32) as usize
}

/// Texel wrap for fractional coordinates (truncated after wrapping).
#[inline(always)]
pub fn wrap_f(v: f32, dim: usize) -> usize {
    wrap(v.rem_euclid(dim as f32) as i32, dim)
}

/// Screen-space mapping for a fixed ±45° horizontal field of view.
///
/// Column 0 is the left edge; bearings grow counter-clockwise, so a larger
/// bearing lands on a smaller column.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    width: i32,
    half_w: i32,
    centre_y: i32,
    scale: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Screen::default())
    }
}

impl Projection {
    pub fn new(screen: Screen) -> Self {
        let width = screen.width as i32;
        let height = screen.height as i32;
        Self {
            width,
            half_w: width / 2,
            centre_y: height / 2,
            scale: height as f32 * PROJECTION_SCALE,
        }
    }

    /// Pixels per unit of height per unit of distance.
    #[inline(always)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline(always)]
    pub fn centre_y(&self) -> i32 {
        self.centre_y
    }

    /// Bearing change per column at the view centre.
    #[inline(always)]
    pub fn angle_step(&self) -> f32 {
        FRAC_PI_4 / self.half_w as f32
    }

    /// Screen column of a view-relative bearing; `-1` or `width` when the
    /// bearing falls off the left or right edge.
    pub fn view_x(&self, bearing: f32) -> i32 {
        let bearing = normalize_angle(bearing);
        if bearing >= FRAC_PI_4 {
            return -1;
        }
        if bearing < -FRAC_PI_4 {
            return self.width;
        }
        let mid = bearing.tan() / FRAC_PI_4;
        if mid >= 1.0 {
            return -1;
        }
        if mid <= -1.0 {
            return self.width;
        }
        (self.half_w as f32 * (1.0 - mid)) as i32
    }

    /// Screen row of a point `height` units above the eye at `distance`.
    pub fn view_y(&self, distance: f32, height: f32) -> i32 {
        let dy = (height.abs() * self.scale / distance) as i32;
        if height > 0.0 {
            self.centre_y - dy
        } else {
            self.centre_y + dy
        }
    }

    /// View-relative bearing through the centre of column `x`.
    #[inline]
    pub fn view_angle(&self, x: i32) -> f32 {
        ((self.half_w - x) as f32 / self.half_w as f32 * FRAC_PI_4).atan()
    }

    /// Column extent of `seg`, or `None` when it faces away or lies
    /// outside the field of view.
    ///
    /// A segment whose endpoints straddle the rear seam gets the endpoint in
    /// the rear hemisphere pushed to the opposite side boundary. This is an
    /// approximation of near-plane clipping and can misplace the edge of very
    /// long segments crossing behind the camera.
    pub fn segment_columns(&self, level: &Level, camera: &Camera, seg: SegmentId) -> Option<Span> {
        let (v1, v2) = level.segment_line(seg);
        let eye = camera.xy();

        // camera must be on the right (front) of v1→v2
        if (v2 - v1).perp_dot(eye - v1) >= 0.0 {
            return None;
        }

        let bearing = |p: Vec2| normalize_angle((p.y - eye.y).atan2(p.x - eye.x) - camera.yaw);
        let mut a0 = bearing(v1);
        let mut a1 = bearing(v2);

        if (a1 - a0).abs() > PI {
            if a0 < -FRAC_PI_2 {
                a0 = FRAC_PI_2;
            } else if a0 > FRAC_PI_2 {
                a0 = -FRAC_PI_2;
            } else if a1 < -FRAC_PI_2 {
                a1 = FRAC_PI_2;
            } else if a1 > FRAC_PI_2 {
                a1 = -FRAC_PI_2;
            }
        }

        if (a0 < -FRAC_PI_4 && a1 < -FRAC_PI_4) || (a0 > FRAC_PI_4 && a1 > FRAC_PI_4) {
            return None;
        }

        let x0 = self.view_x(a0);
        let x1 = self.view_x(a1);
        Some(Span::new(x0.min(x1), x0.max(x1)))
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures;
    use glam::{Vec3, vec3};

    fn proj() -> Projection {
        Projection::new(Screen::default())
    }

    #[test]
    fn normalize_into_range() {
        for a in [-10.0f32, -PI, -1.0, 0.0, 1.0, PI, 7.0, 100.0] {
            let n = normalize_angle(a);
            assert!((-PI..=PI).contains(&n), "{a} → {n}");
            let turns = (n - a) / TAU;
            assert!((turns - turns.round()).abs() < 1e-4, "{a} → {n}");
        }
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn wrap_lands_in_range_for_negative_inputs() {
        for v in [-129, -64, -1, 0, 1, 63, 64, 1000] {
            assert!(wrap(v, 64) < 64);
        }
        assert_eq!(wrap(-1, 64), 63);
        assert_eq!(wrap(-64, 64), 0);
        for v in [-1e6f32, -64.5, -0.25, 0.0, 63.99, 64.0, 1e6] {
            assert!(wrap_f(v, 64) < 64, "{v}");
        }
        assert_eq!(wrap_f(-0.5, 64), 63);
        assert_eq!(wrap_f(f32::NAN, 64), 0);
    }

    #[test]
    fn view_x_centre_and_edges() {
        let p = proj();
        assert_eq!(p.view_x(0.0), 160);
        assert_eq!(p.view_x(FRAC_PI_4), -1);
        assert_eq!(p.view_x(-FRAC_PI_4 - 0.01), 320);
        // left of centre maps to smaller columns
        assert!(p.view_x(0.2) < 160);
        assert!(p.view_x(-0.2) > 160);
    }

    #[test]
    fn view_angle_inverts_view_x() {
        let p = proj();
        for x in [0, 40, 159, 160, 161, 300, 319] {
            let back = p.view_x(p.view_angle(x));
            assert!((back - x).abs() <= 1, "{x} → {back}");
        }
        assert_eq!(p.view_angle(160), 0.0);
    }

    #[test]
    fn view_y_above_and_below_horizon() {
        let p = proj();
        assert_eq!(p.view_y(100.0, 0.0), 100);
        assert!(p.view_y(100.0, 50.0) < 100);
        assert!(p.view_y(100.0, -50.0) > 100);
        // symmetric truncation
        assert_eq!(100 - p.view_y(128.0, 87.0), p.view_y(128.0, -87.0) - 100);
        assert_eq!(p.view_y(128.0, 87.0), -77);
    }

    fn cam(x: f32, y: f32, yaw: f32) -> Camera {
        Camera::new(vec3(x, y, 41.0), yaw)
    }

    #[test]
    fn wall_ahead_fills_the_view() {
        let level = fixtures::square_room();
        let p = proj();
        // east wall is segment 2: (256,256) → (256,0)
        let span = p.segment_columns(&level, &cam(128.0, 128.0, 0.0), 2).unwrap();
        assert!(span.s <= 0 && span.e >= 320, "{span:?}");
    }

    #[test]
    fn wall_behind_is_discarded() {
        let level = fixtures::square_room();
        let p = proj();
        // west wall (segment 0) is behind a camera facing east
        assert_eq!(p.segment_columns(&level, &cam(128.0, 128.0, 0.0), 0), None);
    }

    #[test]
    fn back_face_is_culled() {
        let level = fixtures::square_room();
        let p = proj();
        // outside the room, east of the east wall, looking west at its back
        let c = Camera::new(Vec3::new(400.0, 128.0, 41.0), PI);
        assert_eq!(p.segment_columns(&level, &c, 2), None);
    }

    #[test]
    fn side_wall_is_partial() {
        let level = fixtures::square_room();
        let p = proj();
        // north wall from the room centre facing north-east: left half of screen
        let span = p
            .segment_columns(&level, &cam(128.0, 128.0, FRAC_PI_4), 1)
            .unwrap();
        assert!(span.s <= 0);
        assert!(span.e > 100 && span.e < 220, "{span:?}");
    }
}
