use bitflags::bitflags;
use glam::Vec2;
use std::ops::Range;

use crate::world::texture::TextureId;

pub type VertexId = u16;
pub type WallId = u16;
pub type SideId = u16;
pub type SectorId = u16;
pub type SegmentId = u16;
pub type SubsectorId = u16;
pub type NodeId = u16;

/// Doom-ednum of the Player 1 start.
pub const PLAYER1_START: u16 = 1;

/// Runtime snapshot of one map.
///
/// Everything except sector state is immutable after load; sectors are
/// only written between frames by `sim`.
#[derive(Debug, Default)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub walls: Vec<Wall>,
    pub sides: Vec<Side>,
    pub vertices: Vec<Vertex>,
    pub segments: Vec<Segment>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
}

/*------------------------- game objects -----------------------------*/

#[derive(Clone, Debug)]
pub struct Thing {
    pub pos: Vec2,
    pub angle: f32, // radians
    pub type_id: u16,
}

/*----------------------------- walls --------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WallFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0008;
        const LOWER_UNPEGGED  = 0x0010;
        const SECRET          = 0x0020;
        const BLOCK_SOUND     = 0x0040;
        const NOT_ON_MAP      = 0x0080;
        const ALREADY_ON_MAP  = 0x0100;
    }
}

#[derive(Clone, Debug)]
pub struct Wall {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: WallFlags,
    pub special: u16,
    pub tag: u16,
    pub front_side: SideId,
    pub back_side: Option<SideId>,
}

impl Wall {
    #[inline(always)]
    pub fn two_sided(&self) -> bool {
        self.back_side.is_some()
    }

    /// Manual door specials (DR / D1 variants).
    #[inline]
    pub fn is_door(&self) -> bool {
        (1..=4).contains(&self.special)
    }
}

/*----------------------------- sides --------------------------------*/

#[derive(Clone, Debug)]
pub struct Side {
    pub x_off: f32,
    pub y_off: f32,
    pub upper: TextureId,
    pub lower: TextureId,
    pub middle: TextureId,
    pub sector: SectorId,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Vec2,
}

/// Fragment of a wall produced by the node builder.
#[derive(Clone, Debug)]
pub struct Segment {
    pub v1: VertexId,
    pub v2: VertexId,
    pub wall: WallId,
    /// Segment runs against its wall, so the wall's back side faces it.
    pub opposite: bool,
    pub offset: f32,
}

/// Axis alignment of a segment, used for wall shading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
    Oblique,
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub seg_count: u16,
    pub first_seg: SegmentId,
}

impl Subsector {
    #[inline(always)]
    pub fn segments(&self) -> Range<usize> {
        let first = self.first_seg as usize;
        first..first + self.seg_count as usize
    }
}

/// Reference from a BSP node to one of its two children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeChild {
    Node(NodeId),
    Subsector(SubsectorId),
}

impl NodeChild {
    const SUBSECTOR_BIT: u16 = 0x8000;

    /// Decode the on-disk encoding where the top bit tags a leaf.
    #[inline]
    pub fn from_raw(raw: u16) -> Self {
        if raw & Self::SUBSECTOR_BIT != 0 {
            NodeChild::Subsector(raw & !Self::SUBSECTOR_BIT)
        } else {
            NodeChild::Node(raw)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// `[right, left]` of the partition line.
    pub child: [NodeChild; 2],
}

/*---------------------------- sectors -------------------------------*/

/// Door state machine driven once per tic by `sim`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectorMotion {
    #[default]
    Idle,
    Opening,
    Waiting(u32),
    Closing,
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: f32,
    pub ceil_h: f32,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    /// 0.0 (black) ..= 1.0 (full bright).
    pub light: f32,
    pub is_sky: bool,
    pub special: i16,
    pub tag: i16,
    pub motion: SectorMotion,
}

// ──────────────────────────────────────────────────────────────────────────
//                    Level – cross-reference helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    #[inline(always)]
    pub fn segment_line(&self, seg: SegmentId) -> (Vec2, Vec2) {
        let s = &self.segments[seg as usize];
        (
            self.vertices[s.v1 as usize].pos,
            self.vertices[s.v2 as usize].pos,
        )
    }

    #[inline(always)]
    pub fn segment_wall(&self, seg: SegmentId) -> &Wall {
        &self.walls[self.segments[seg as usize].wall as usize]
    }

    /// `(front, back)` sides as seen from the segment's own direction.
    pub fn segment_sides(&self, seg: SegmentId) -> (SideId, Option<SideId>) {
        let s = &self.segments[seg as usize];
        let wall = &self.walls[s.wall as usize];
        match (s.opposite, wall.back_side) {
            (false, back) => (wall.front_side, back),
            // the node builder only emits opposite segs for two-sided walls
            (true, Some(back)) => (back, Some(wall.front_side)),
            (true, None) => (wall.front_side, None),
        }
    }

    /// `(front, back)` sectors as seen from the segment's own direction.
    pub fn segment_sectors(&self, seg: SegmentId) -> (SectorId, Option<SectorId>) {
        let (front, back) = self.segment_sides(seg);
        (
            self.sides[front as usize].sector,
            back.map(|b| self.sides[b as usize].sector),
        )
    }

    pub fn segment_axis(&self, seg: SegmentId) -> Axis {
        let (a, b) = self.segment_line(seg);
        if a.y == b.y {
            Axis::Horizontal
        } else if a.x == b.x {
            Axis::Vertical
        } else {
            Axis::Oblique
        }
    }

    #[inline]
    pub fn player_start(&self) -> Option<&Thing> {
        self.things.iter().find(|t| t.type_id == PLAYER1_START)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures;

    #[test]
    fn node_child_decodes_leaf_bit() {
        assert_eq!(NodeChild::from_raw(0x8003), NodeChild::Subsector(3));
        assert_eq!(NodeChild::from_raw(0x0003), NodeChild::Node(3));
        assert_eq!(NodeChild::from_raw(0x8000), NodeChild::Subsector(0));
    }

    #[test]
    fn opposite_segment_swaps_sides() {
        let level = fixtures::window_level(128.0, 64.0);
        let window = fixtures::WINDOW_WALL;
        let fwd = level
            .segments
            .iter()
            .position(|s| s.wall == window && !s.opposite)
            .unwrap() as SegmentId;
        let back = level
            .segments
            .iter()
            .position(|s| s.wall == window && s.opposite)
            .unwrap() as SegmentId;

        let (f0, b0) = level.segment_sectors(fwd);
        let (f1, b1) = level.segment_sectors(back);
        assert_eq!(b1, Some(f0));
        assert_eq!(b0, Some(f1));
        assert_ne!(f0, f1);
    }

    #[test]
    fn axis_of_room_walls() {
        let level = fixtures::square_room();
        let axes: Vec<Axis> = (0..level.segments.len() as SegmentId)
            .map(|s| level.segment_axis(s))
            .collect();
        assert_eq!(axes.iter().filter(|a| **a == Axis::Vertical).count(), 2);
        assert_eq!(axes.iter().filter(|a| **a == Axis::Horizontal).count(), 2);
    }

    #[test]
    fn door_specials() {
        let mut w = Wall {
            v1: 0,
            v2: 1,
            flags: WallFlags::empty(),
            special: 1,
            tag: 0,
            front_side: 0,
            back_side: None,
        };
        assert!(w.is_door());
        w.special = 11;
        assert!(!w.is_door());
    }
}
