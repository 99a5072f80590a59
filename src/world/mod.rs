mod bsp;
mod camera;
mod geometry;
mod texture;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bsp::Traversal;

pub use geometry::{
    Axis, Level, Node, NodeChild, NodeId, PLAYER1_START, Sector, SectorId, SectorMotion, Segment,
    SegmentId, Side, SideId, Subsector, SubsectorId, Thing, Vertex, VertexId, Wall, WallFlags,
    WallId,
};

pub use camera::Camera;

pub use texture::{
    Lightmap, NO_TEXTURE, Palette, Texture, TextureBank, TextureError, TextureId,
};
