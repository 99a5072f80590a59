//! Player movement: turning, walking, wall collision with sliding, and
//! door activation by touch.

use glam::{Vec2, vec3};
use std::f32::consts::PI;

use super::{InputCmd, SectorCommand};
use crate::world::{Camera, Level, SectorId, SegmentId, Traversal};

/// Eye height above the floor of the current sector.
pub const EYE_HEIGHT: f32 = 41.0;
/// Radians per tic at full turn input.
pub const TURN_SPEED: f32 = 0.02 * PI;
/// Map units per tic at full walk input.
pub const WALK_SPEED: f32 = 8.0;
/// Collision radius around the player's position.
pub const PLAYER_RADIUS: f32 = 8.0;
/// Largest floor rise the player can walk up.
pub const MAX_STEP: f32 = 24.0;
/// Smallest floor-to-ceiling gap the player fits through.
pub const MIN_HEADROOM: f32 = 56.0;

#[derive(Clone, Copy, Debug)]
pub struct Player {
    camera: Camera,
}

impl Player {
    /// Stand on the Player 1 start, or `None` when the map has none.
    pub fn spawn(level: &Level) -> Option<Self> {
        let start = level.player_start()?;
        let z = level.sector_at(start.pos).floor_h + EYE_HEIGHT;
        Some(Self {
            camera: Camera::new(start.pos.extend(z), start.angle),
        })
    }

    pub fn at(level: &Level, pos: Vec2, yaw: f32) -> Self {
        let z = level.sector_at(pos).floor_h + EYE_HEIGHT;
        Self {
            camera: Camera::new(vec3(pos.x, pos.y, z), yaw),
        }
    }

    /// Pose handed to the renderer.
    #[inline]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.camera.xy()
    }

    /// One tic of movement. Door walls the player bumps into queue an
    /// open command for the sector behind them.
    pub fn update(&mut self, level: &Level, cmd: &InputCmd, commands: &mut Vec<SectorCommand>) {
        self.camera.turn(cmd.turn.clamp(-1.0, 1.0) * TURN_SPEED);

        let speed = if cmd.run { 2.0 * WALK_SPEED } else { WALK_SPEED };
        let mut vel = self.camera.step_vector(
            cmd.forward.clamp(-1.0, 1.0) * speed,
            cmd.strafe.clamp(-1.0, 1.0) * speed,
        );

        let pos = self.pos();
        if vel != Vec2::ZERO {
            let current = level.sector_id_at(pos);
            for seg in level.ordered_segments(pos, Traversal::FrontToBack) {
                let (v1, v2) = level.segment_line(seg);
                if dist_sq_to_segment(pos + vel, v1, v2) >= PLAYER_RADIUS * PLAYER_RADIUS {
                    continue;
                }
                if !blocks(level, seg, current) {
                    continue;
                }

                let wall = level.segment_wall(seg);
                if wall.is_door() {
                    if let Some(back) = wall.back_side {
                        commands.push(SectorCommand::Open(level.sides[back as usize].sector));
                    }
                }

                // slide along the wall
                let dir = v2 - v1;
                vel = dir * (vel.dot(dir) / dir.length_squared());
            }
        }

        let pos = pos + vel;
        let z = level.sector_at(pos).floor_h + EYE_HEIGHT;
        self.camera.pos = pos.extend(z);
    }
}

/// Whether crossing `seg`'s wall from sector `current` is impossible.
fn blocks(level: &Level, seg: SegmentId, current: SectorId) -> bool {
    let wall = level.segment_wall(seg);
    let Some(back) = wall.back_side else {
        return true;
    };
    let front = level.sides[wall.front_side as usize].sector;
    let back = level.sides[back as usize].sector;
    let other = if front == current { back } else { front };

    let here = &level.sectors[current as usize];
    let there = &level.sectors[other as usize];
    there.floor_h - here.floor_h > MAX_STEP || there.ceil_h - there.floor_h < MIN_HEADROOM
}

/// Squared distance from `p` to the closed segment `a`–`b`.
fn dist_sq_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
