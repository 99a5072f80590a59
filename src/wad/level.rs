//! Map lumps as stored on disk. Everything here is little-endian `i16`
//! records decoded by bincode; [`super::load_level`] turns them into
//! [`crate::world::Level`].

use crate::wad::{Wad, WadError};
use bincode::Decode;
use once_cell::sync::Lazy;
use regex::Regex;

/*-------------------------- map records ---------------------------*/

/// Placed object. Only the Player 1 start (`type_ == 1`) is used here.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawThing {
    pub x: i16,
    pub y: i16,
    /// Degrees, counter-clockwise from east.
    pub angle: i16,
    pub type_: i16,
    /// Skill and multiplayer bits; ignored.
    pub options: i16,
}

/// Wall line. `sidenum[1] == -1` marks a solid, single-sided wall.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawLinedef {
    pub v1: i16,
    pub v2: i16,
    /// [`crate::world::WallFlags`] bits.
    pub flags: i16,
    /// 1..=4 are the manual doors the player can bump open.
    pub special: i16,
    pub tag: i16,
    /// `[front, back]` sidedef indices.
    pub sidenum: [i16; 2],
}

/// Texture names are NUL-padded, `-` for none.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub top_tex: [u8; 8],
    pub bottom_tex: [u8; 8],
    pub mid_tex: [u8; 8],
    pub sector: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

/// Node-builder fragment of a linedef.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSeg {
    pub v1: i16,
    pub v2: i16,
    /// Binary angle; recomputed from the vertices, so unused.
    pub angle: i16,
    pub linedef: i16,
    /// 0 = along the linedef, 1 = against it.
    pub side: i16,
    /// Distance from the linedef start, feeds the texel x offset.
    pub offset: i16,
}

/// Convex leaf: a run of `seg_count` segs from `first_seg`.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSubsector {
    pub seg_count: i16,
    pub first_seg: i16,
}

/// Partition line `(x, y) + t·(dx, dy)` with its two children.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    /// Child bounding boxes; the front-to-back walk does not cull by them.
    pub bbox: [[i16; 4]; 2],
    /// `[right, left]`, top bit set for a subsector.
    pub child: [u16; 2],
}

/// `light` is 0..=255; `ceil_tex == "F_SKY1"` makes a sky ceiling.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSector {
    pub floor_h: i16,
    pub ceil_h: i16,
    pub floor_tex: [u8; 8],
    pub ceil_tex: [u8; 8],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/// One map's lumps, still in disk form.
#[derive(Debug)]
pub struct RawLevel {
    /// Marker name, e.g. `E1M1`.
    pub name: String,
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub segs: Vec<RawSeg>,
    pub subsectors: Vec<RawSubsector>,
    /// Empty for single-subsector maps.
    pub nodes: Vec<RawNode>,
    pub sectors: Vec<RawSector>,
}

/// Lumps that must directly follow a marker, in order. `REJECT` and
/// `BLOCKMAP` come after these and are not read.
const MAP_LUMPS: [&str; 8] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
];

/*----------------------------- errors -----------------------------*/

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("marker index {0} out of bounds")]
    MarkerOob(usize),

    #[error("expected lump `{0}` not found after level marker")]
    Missing(&'static str),

    #[error(transparent)]
    Wad(#[from] WadError),
}

/*------------------------- lookups on Wad -------------------------*/

static MAP_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(E[1-4]M[1-9]|MAP[0-3][0-9])$").expect("static regex"));

impl Wad {
    /// Directory indices of every map marker (`E#M#`, `MAP##`).
    pub fn level_indices(&self) -> Vec<usize> {
        self.lumps()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && MAP_MARKER.is_match(Self::lump_name_str(&l.name)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Marker index of the map called `name` (case-insensitive).
    pub fn level_index(&self, name: &str) -> Option<usize> {
        self.level_indices()
            .into_iter()
            .find(|&i| self.lump_name(i).is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Index `at` when the lump there is called `name`.
    fn idx_of(&self, at: usize, name: &'static str) -> Result<usize, LevelError> {
        match self.lump_name(at) {
            Some(n) if n == name => Ok(at),
            _ => Err(LevelError::Missing(name)),
        }
    }

    /// Decode the map whose marker sits at directory index `marker_idx`.
    pub fn parse_level(&self, marker_idx: usize) -> Result<RawLevel, LevelError> {
        if marker_idx >= self.lumps().len() {
            return Err(LevelError::MarkerOob(marker_idx));
        }

        let mut at = [0usize; MAP_LUMPS.len()];
        for (i, name) in MAP_LUMPS.into_iter().enumerate() {
            at[i] = self.idx_of(marker_idx + 1 + i, name)?;
        }
        let [things, linedefs, sidedefs, vertices, segs, ssectors, nodes, sectors] = at;

        Ok(RawLevel {
            name: self.lump_name(marker_idx).unwrap_or_default().to_owned(),
            things: self.lump_to_vec(things)?,
            linedefs: self.lump_to_vec(linedefs)?,
            sidedefs: self.lump_to_vec(sidedefs)?,
            vertices: self.lump_to_vec(vertices)?,
            segs: self.lump_to_vec(segs)?,
            subsectors: self.lump_to_vec(ssectors)?,
            nodes: self.lump_to_vec(nodes)?,
            sectors: self.lump_to_vec(sectors)?,
        })
    }
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
