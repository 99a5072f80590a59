use crate::world::geometry::{Level, Node, NodeChild, Sector, SectorId, SegmentId, SubsectorId};
use glam::Vec2;

/// Direction of a full BSP walk relative to the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    FrontToBack,
    BackToFront,
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – public helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// The BSP root: the last node, or the only subsector of a node-free map.
    #[inline(always)]
    pub fn bsp_root(&self) -> NodeChild {
        match self.nodes.len() {
            0 => NodeChild::Subsector(0),
            n => NodeChild::Node((n - 1) as u16),
        }
    }

    /// Walk the BSP and return the subsector id containing `p`.
    pub fn locate_subsector(&self, p: Vec2) -> SubsectorId {
        let mut child = self.bsp_root();
        loop {
            match child {
                NodeChild::Subsector(ss) => return ss,
                NodeChild::Node(idx) => {
                    let node = &self.nodes[idx as usize];
                    child = node.child[node.point_side(p)];
                }
            }
        }
    }

    /// Id of the sector owning the subsector under `p`.
    pub fn sector_id_at(&self, p: Vec2) -> SectorId {
        let ss = &self.subsectors[self.locate_subsector(p) as usize];
        self.segment_sectors(ss.first_seg).0
    }

    /// Sector owning the subsector under `p`.
    #[inline]
    pub fn sector_at(&self, p: Vec2) -> &Sector {
        &self.sectors[self.sector_id_at(p) as usize]
    }

    /// Every segment of the level, ordered relative to `p`.
    pub fn ordered_segments(&self, p: Vec2, order: Traversal) -> Vec<SegmentId> {
        let mut out = Vec::with_capacity(self.segments.len());
        self.fill_ordered_segments(p, order, &mut out);
        out
    }

    /// Same as [`Level::ordered_segments`] but reuses `out`.
    ///
    /// Explicit work stack: at every node the near child is pushed last so
    /// it pops first, which makes the whole near subtree precede the far one.
    pub fn fill_ordered_segments(&self, p: Vec2, order: Traversal, out: &mut Vec<SegmentId>) {
        out.clear();

        let mut stack = vec![self.bsp_root()];
        while let Some(child) = stack.pop() {
            match child {
                NodeChild::Subsector(ss) => {
                    let range = self.subsectors[ss as usize].segments();
                    out.extend(range.map(|s| s as SegmentId));
                }
                NodeChild::Node(idx) => {
                    let node = &self.nodes[idx as usize];
                    let near = node.point_side(p);
                    stack.push(node.child[near ^ 1]);
                    stack.push(node.child[near]);
                }
            }
        }

        if order == Traversal::BackToFront {
            out.reverse();
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    /// 0 = right of the partition line, 1 = left.
    #[inline(always)]
    pub fn point_side(&self, p: Vec2) -> usize {
        let d = (p.x - self.x) * self.dy - (p.y - self.y) * self.dx;
        if d >= 0.0 { 0 } else { 1 }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
