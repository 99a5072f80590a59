use crate::{
    renderer::software::{
        Software,
        lighting::lightness,
        projection::{normalize_angle, wrap, wrap_f},
        span::{Span, SpanSet},
    },
    world::{Camera, Texture, TextureBank, TextureId},
};
use std::collections::HashMap;

/// Exact-match key; every non-finite height folds into one sky key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlaneKey {
    height: Option<u32>,
    light: u32,
    tex: TextureId,
}

impl PlaneKey {
    fn new(height: f32, light: f32, tex: TextureId) -> Self {
        Self {
            // `+ 0.0` folds -0.0 into 0.0
            height: height.is_finite().then(|| (height + 0.0).to_bits()),
            light: light.to_bits(),
            tex,
        }
    }
}

/// One floor or ceiling surface seen through any number of columns.
#[derive(Clone, Debug)]
pub struct Plane {
    /// Height relative to the eye; non-finite for sky.
    pub height: f32,
    pub light: f32,
    pub tex: TextureId,
    /// Covered columns, one set per screen row.
    pub rows: Vec<SpanSet>,
}

impl Plane {
    #[inline]
    pub fn is_sky(&self) -> bool {
        !self.height.is_finite()
    }
}

/// All visplanes of one kind (floor or ceiling) for the current frame.
#[derive(Default)]
pub struct PlaneMap {
    map: HashMap<PlaneKey, usize>,
    planes: Vec<Plane>,
    rows: usize,
}

impl PlaneMap {
    pub fn clear(&mut self, rows: usize) {
        self.map.clear();
        self.planes.clear();
        self.rows = rows;
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Plane> + '_ {
        self.planes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Record rows `[sy, ey)` of column `x` as belonging to the plane
    /// `(height, light, tex)`, creating that plane on first use.
    pub fn clip_plane(&mut self, x: i32, sy: i32, ey: i32, height: f32, light: f32, tex: TextureId) {
        let sy = sy.max(0);
        let ey = ey.min(self.rows as i32);
        if sy >= ey {
            return;
        }

        let key = PlaneKey::new(height, light, tex);
        let rows = self.rows;
        let planes = &mut self.planes;
        let idx = *self.map.entry(key).or_insert_with(|| {
            planes.push(Plane {
                height,
                light,
                tex,
                rows: vec![SpanSet::default(); rows],
            });
            planes.len() - 1
        });

        let column = Span::new(x, x + 1);
        for row in &mut self.planes[idx].rows[sy as usize..ey as usize] {
            row.insert(column);
        }
    }
}

/*──────────────────────── plane rasterisation ────────────────────────*/

impl Software {
    /// Draw every collected visplane: ceilings first, then floors.
    pub(super) fn flush_planes(&mut self, camera: &Camera, bank: &TextureBank) {
        let ceilings = std::mem::take(&mut self.ceilings);
        let floors = std::mem::take(&mut self.floors);
        for plane in ceilings.iter().chain(floors.iter()) {
            self.draw_plane(plane, camera, bank);
        }
        self.ceilings = ceilings;
        self.floors = floors;
    }

    fn draw_plane(&mut self, plane: &Plane, camera: &Camera, bank: &TextureBank) {
        if plane.is_sky() {
            if let Some(sky) = bank.sky() {
                self.draw_sky(plane, camera, sky, bank);
            }
            return;
        }
        let Some(tex) = bank.get(plane.tex) else {
            return;
        };

        let yaw = normalize_angle(camera.yaw);
        let (sin_a, cos_a) = yaw.sin_cos();
        let eye = camera.xy();
        let step = self.proj.angle_step();
        let half_w = (self.screen.width / 2) as i32;
        let centre_y = self.proj.centre_y();

        for (y, row) in plane.rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            let dist = self.proj.scale() * plane.height.abs() / (y as i32 - centre_y).abs() as f32;
            if !dist.is_finite() || dist < 1.0 {
                continue;
            }

            let light = lightness(dist, plane.light, None);
            let fwd_x = dist * cos_a;
            let fwd_y = dist * sin_a;
            // one column right = one angle step less to the left
            let step_x = fwd_y * step;
            let step_y = -fwd_x * step;

            for span in row.as_slice() {
                let lateral = step * (half_w - span.s) as f32;
                let mut tx = eye.x + fwd_x - fwd_y * lateral;
                let mut ty = eye.y + fwd_y + fwd_x * lateral;

                let mut offset = y * self.screen.width + span.s as usize;
                for _ in span.s..span.e {
                    let texel = tex.texel(wrap_f(tx, tex.w), wrap_f(ty, tex.h));
                    self.scratch[offset] = bank.shade(light, texel);
                    tx += step_x;
                    ty += step_y;
                    offset += 1;
                }
            }
        }
    }

    /// Panorama lookup: column from heading, row from screen row, unlit.
    fn draw_sky(&mut self, plane: &Plane, camera: &Camera, sky: &Texture, bank: &TextureBank) {
        let yaw = normalize_angle(camera.yaw);
        let x_scale = sky.w as f32 / std::f32::consts::FRAC_PI_4;
        let height = self.screen.height;

        for (y, row) in plane.rows.iter().enumerate() {
            let ty = wrap((y * sky.h / height) as i32, sky.h);
            for span in row.as_slice() {
                let mut offset = y * self.screen.width + span.s as usize;
                for x in span.s..span.e {
                    let tx = wrap(((yaw + self.proj.view_angle(x)) * x_scale) as i32, sky.w);
                    self.scratch[offset] = bank.palette()[sky.texel(tx, ty) as usize];
                    offset += 1;
                }
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
