use glam::Vec2;

use crate::{
    renderer::software::{
        Software,
        lighting::lightness,
        projection::wrap,
        span::Span,
    },
    world::{
        Axis, Camera, Level, Sector, SegmentId, Side, TextureBank, TextureId, Wall, WallFlags,
    },
};

/// Wall line in the camera's frame, fixed for all columns of a segment.
#[derive(Clone, Copy, Debug)]
struct WallGeometry {
    along: Vec2,
    normal: Vec2,
    /// Signed perpendicular distance from the wall line to the eye.
    perp: f32,
    /// Offset along the wall from its first vertex to the eye's foot point.
    foot: f32,
}

impl WallGeometry {
    fn new(v1: Vec2, v2: Vec2, eye: Vec2) -> Option<Self> {
        let along = (v2 - v1).try_normalize()?;
        let normal = along.perp();
        let rel = eye - v1;
        Some(Self {
            along,
            normal,
            perp: rel.dot(normal),
            foot: rel.dot(along),
        })
    }

    /// `(ray length, offset along the wall)` where the ray at world angle
    /// `theta` meets the wall line in front of the eye.
    #[inline]
    fn hit(&self, theta: f32) -> Option<(f32, f32)> {
        let ray = Vec2::from_angle(theta);
        let denom = ray.dot(self.normal);
        if denom == 0.0 {
            return None;
        }
        let t = -self.perp / denom;
        (t > 0.0).then(|| (t, self.foot + t * ray.dot(self.along)))
    }
}

/// Everything about one segment that stays constant across its columns.
struct SegmentView<'a> {
    wall: &'a Wall,
    side: &'a Side,
    front: &'a Sector,
    back: Option<&'a Sector>,
    axis: Axis,
    x_offset: f32,
    geo: WallGeometry,
}

/// One textured run of pixels in one column.
#[derive(Clone, Copy, Debug)]
struct WallSlice {
    x: i32,
    span: Span,
    x_texel: f32,
    y_scale: f32,
    y_pegging: i32,
    y_offset: i32,
    tex: TextureId,
    light: u8,
}

impl Software {
    /// Project, occlude and carve one segment, drawing its wall pixels.
    pub(super) fn render_segment(
        &mut self,
        seg: SegmentId,
        level: &Level,
        camera: &Camera,
        bank: &TextureBank,
    ) {
        let Some(columns) = self.proj.segment_columns(level, camera, seg) else {
            return;
        };
        let wall = level.segment_wall(seg);
        let visible = self
            .occlusion
            .clip_horizontal(columns.s, columns.e, !wall.two_sided());
        if visible.is_empty() {
            return;
        }

        let (v1, v2) = level.segment_line(seg);
        let Some(geo) = WallGeometry::new(v1, v2, camera.xy()) else {
            return;
        };
        let (front_side, _) = level.segment_sides(seg);
        let (front, back) = level.segment_sectors(seg);
        let side = &level.sides[front_side as usize];

        let view = SegmentView {
            wall,
            side,
            front: &level.sectors[front as usize],
            back: back.map(|b| &level.sectors[b as usize]),
            axis: level.segment_axis(seg),
            x_offset: level.segments[seg as usize].offset + side.x_off,
            geo,
        };

        self.stats.visible += 1;
        for span in visible {
            self.render_segment_span(span, &view, camera, bank);
        }
    }

    fn render_segment_span(
        &mut self,
        span: Span,
        view: &SegmentView,
        camera: &Camera,
        bank: &TextureBank,
    ) {
        let front = view.front;
        let eye_z = camera.pos.z;
        let ceil_h = if front.is_sky {
            f32::NAN
        } else {
            front.ceil_h - eye_z
        };
        let floor_h = front.floor_h - eye_z;
        let solid = view.back.is_none();
        let upper_unpegged = view.wall.flags.contains(WallFlags::UPPER_UNPEGGED);
        let lower_unpegged = view.wall.flags.contains(WallFlags::LOWER_UNPEGGED);

        for x in span.s..span.e {
            if self.clip.is_closed(x) {
                continue;
            }

            let bearing = self.proj.view_angle(x);
            let Some((ray, along)) = view.geo.hit(camera.yaw + bearing) else {
                continue;
            };
            let dist = ray * bearing.cos();
            if !(dist >= 1.0) {
                continue;
            }

            let outer_top = self.proj.view_y(dist, front.ceil_h - eye_z);
            let outer_bot = self.proj.view_y(dist, floor_h);
            let outer = self.clip_vertical(
                x,
                outer_top,
                outer_bot,
                solid,
                front,
                Some(ceil_h),
                Some(floor_h),
            );

            let middle = WallSlice {
                x,
                span: outer,
                x_texel: along + view.x_offset,
                y_scale: dist / self.proj.scale(),
                y_pegging: if lower_unpegged { outer_bot } else { outer_top },
                y_offset: view.side.y_off as i32,
                tex: view.side.middle,
                light: lightness(dist, front.light, Some(view.axis)),
            };

            let Some(back) = view.back else {
                self.draw_wall_slice(&middle, bank);
                continue;
            };

            let sky = front.is_sky && back.is_sky;
            let inner_top = self.proj.view_y(dist, back.ceil_h - eye_z);
            let inner_bot = self.proj.view_y(dist, back.floor_h - eye_z);
            let inner = self.clip_vertical(
                x,
                inner_top,
                inner_bot,
                false,
                front,
                sky.then_some(ceil_h),
                None,
            );

            if !sky {
                self.draw_wall_slice(
                    &WallSlice {
                        span: Span::new(outer.s, inner.s),
                        tex: view.side.upper,
                        y_pegging: if upper_unpegged { outer_top } else { inner_top },
                        ..middle
                    },
                    bank,
                );
            }
            self.draw_wall_slice(
                &WallSlice {
                    span: Span::new(inner.e, outer.e),
                    tex: view.side.lower,
                    y_pegging: if lower_unpegged { outer_top } else { inner_bot },
                    ..middle
                },
                bank,
            );
        }
    }

    /// Intersect rows `[sy, ey)` with the open range of column `x`.
    ///
    /// Newly hidden rows above become ceiling fragments (when `ceil_h` is
    /// given) and rows below become floor fragments (when `floor_h` is
    /// given). A solid wall closes the column; otherwise the open range
    /// narrows to the wall's projection.
    fn clip_vertical(
        &mut self,
        x: i32,
        sy: i32,
        ey: i32,
        solid: bool,
        sector: &Sector,
        ceil_h: Option<f32>,
        floor_h: Option<f32>,
    ) -> Span {
        let col = x as usize;
        let ceil = self.clip.ceil[col];
        let floor = self.clip.floor[col];
        if floor <= ceil {
            return Span::new(ceil, ceil);
        }

        let s = if sy > ceil {
            let s = sy.min(floor);
            if let Some(h) = ceil_h {
                self.ceilings
                    .clip_plane(x, ceil, s, h, sector.light, sector.ceil_tex);
            }
            s
        } else {
            ceil
        };

        let e = if ey < floor {
            let e = ey.max(ceil);
            if let Some(h) = floor_h {
                self.floors
                    .clip_plane(x, e, floor, h, sector.light, sector.floor_tex);
            }
            e
        } else {
            floor
        };

        if solid {
            self.clip.ceil[col] = floor;
        } else {
            self.clip.ceil[col] = s;
            self.clip.floor[col] = e.max(s);
        }

        Span::new(s, e)
    }

    fn draw_wall_slice(&mut self, ws: &WallSlice, bank: &TextureBank) {
        if ws.span.is_empty() {
            return;
        }
        let Some(tex) = bank.get(ws.tex) else {
            return;
        };

        let tx = wrap(ws.x_texel as i32, tex.w);
        let mut y_texel = (ws.span.s - ws.y_pegging) as f32 * ws.y_scale;
        let pitch = self.screen.width;
        let mut offset = ws.span.s as usize * pitch + ws.x as usize;
        for _ in ws.span.s..ws.span.e {
            let ty = wrap(y_texel as i32 + ws.y_offset, tex.h);
            self.scratch[offset] = bank.shade(ws.light, tex.texel(tx, ty));
            y_texel += ws.y_scale;
            offset += pitch;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
