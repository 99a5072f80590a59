// ──────────────────────────────────────────────────────────────────────────
// wad/loader.rs
//
//  *   RawLevel   (wad::level)            ──╮
//  *   Palette / patches / flats (Wad)      │   --->  world::Level
//  *   TextureBank (mut)                    │          + populated TextureBank
//                                           ╯
// ──────────────────────────────────────────────────────────────────────────

use crate::{
    wad::level::{self as raw_level, LevelError, RawLevel},
    wad::raw::{Wad, WadError},
    world::{
        Level, NO_TEXTURE, Node, NodeChild, Palette, Sector, SectorMotion, Segment, Side,
        Subsector, Texture, TextureBank, TextureError, TextureId, Thing, Vertex, Wall, WallFlags,
    },
};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use glam::vec2;
use std::collections::HashMap;
use thiserror::Error;

/// Ceiling flat that marks a sector as open sky.
const SKY_FLAT: &str = "F_SKY1";
/// Wall texture drawn for sky ceilings.
const SKY_TEXTURE: &str = "SKY1";
const FLAT_SIZE: usize = 64;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("PLAYPAL lump missing - cannot build palette")]
    NoPalette,

    #[error("PNAMES lump missing - cannot resolve patches")]
    NoPNames,

    #[error("lump {0} is malformed")]
    Malformed(String),

    #[error("wall {0} has no front side")]
    MissingFrontSide(usize),

    #[error("{what} {index} refers to missing {target} {id}")]
    BadReference {
        what: &'static str,
        index: usize,
        target: &'static str,
        id: i32,
    },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load the map at `marker` into a [`Level`] and populate `bank` with the
/// palette, the sky and every texture and flat that map references.
/// Unknown names resolve to [`NO_TEXTURE`] with a warning.
pub fn load_level(wad: &Wad, marker: usize, bank: &mut TextureBank) -> Result<Level, LoadError> {
    /*----- 1. Raw lumps --------------------------------------------------*/
    let raw = wad.parse_level(marker)?;
    check_references(&raw)?;

    /*----- 2. Palette, patches, texture directory ------------------------*/
    bank.set_palette(load_palette(wad)?);
    let patches = decode_all_patches(wad)?;
    let defs = TextureDefs::new(wad)?;
    let mut resolver = Resolver {
        wad,
        patches: &patches,
        defs: &defs,
        bank,
    };

    if let Some(sky) = resolver.wall(SKY_TEXTURE, true)? {
        resolver.bank.set_sky(sky);
    }

    /*----- 3. Convert raw → world lists ----------------------------------*/
    let things: Vec<Thing> = raw.things.iter().map(raw_to_world::thing_from).collect();
    let vertices: Vec<Vertex> = raw.vertices.iter().map(raw_to_world::vertex_from).collect();
    let segments: Vec<Segment> = raw.segs.iter().map(raw_to_world::segment_from).collect();
    let subsectors: Vec<Subsector> = raw
        .subsectors
        .iter()
        .map(raw_to_world::subsector_from)
        .collect();
    let nodes: Vec<Node> = raw.nodes.iter().map(raw_to_world::node_from).collect();
    let walls: Vec<Wall> = raw
        .linedefs
        .iter()
        .enumerate()
        .map(|(i, l)| raw_to_world::wall_from(i, l))
        .collect::<Result<_, _>>()?;

    /*----- lists that need texture look-ups -----------------------------*/
    let sides: Vec<Side> = raw
        .sidedefs
        .iter()
        .map(|s| {
            Ok(Side {
                x_off: s.x_off as f32,
                y_off: s.y_off as f32,
                upper: resolver.wall_or_none(&s.top_tex)?,
                lower: resolver.wall_or_none(&s.bottom_tex)?,
                middle: resolver.wall_or_none(&s.mid_tex)?,
                sector: s.sector as u16,
            })
        })
        .collect::<Result<_, LoadError>>()?;

    let sectors: Vec<Sector> = raw
        .sectors
        .iter()
        .map(|s| {
            Ok(Sector {
                floor_h: s.floor_h as f32,
                ceil_h: s.ceil_h as f32,
                floor_tex: resolver.flat_or_none(&s.floor_tex)?,
                ceil_tex: resolver.flat_or_none(&s.ceil_tex)?,
                light: f32::from(s.light.clamp(0, 255)) / 255.0,
                is_sky: Wad::lump_name_str(&s.ceil_tex).eq_ignore_ascii_case(SKY_FLAT),
                special: s.special,
                tag: s.tag,
                motion: SectorMotion::Idle,
            })
        })
        .collect::<Result<_, LoadError>>()?;

    log::info!(
        "loaded {}: {} walls, {} segments, {} subsectors, {} nodes, {} sectors, {} textures",
        raw.name,
        walls.len(),
        segments.len(),
        subsectors.len(),
        nodes.len(),
        sectors.len(),
        resolver.bank.len()
    );

    /*----- 4. Assemble world::Level -------------------------------------*/
    Ok(Level {
        name: raw.name,
        things,
        walls,
        sides,
        vertices,
        segments,
        subsectors,
        nodes,
        sectors,
    })
}

/// Every index the renderer and the BSP walk follow must land in its table.
fn check_references(raw: &RawLevel) -> Result<(), LoadError> {
    let check = |what: &'static str,
                 index: usize,
                 target: &'static str,
                 id: i32,
                 len: usize|
     -> Result<(), LoadError> {
        if id < 0 || id as usize >= len {
            Err(LoadError::BadReference {
                what,
                index,
                target,
                id,
            })
        } else {
            Ok(())
        }
    };

    for (i, l) in raw.linedefs.iter().enumerate() {
        check("linedef", i, "vertex", l.v1.into(), raw.vertices.len())?;
        check("linedef", i, "vertex", l.v2.into(), raw.vertices.len())?;
        for side in l.sidenum {
            if side != -1 {
                check("linedef", i, "sidedef", side.into(), raw.sidedefs.len())?;
            }
        }
    }
    for (i, s) in raw.sidedefs.iter().enumerate() {
        check("sidedef", i, "sector", s.sector.into(), raw.sectors.len())?;
    }
    for (i, s) in raw.segs.iter().enumerate() {
        check("seg", i, "vertex", s.v1.into(), raw.vertices.len())?;
        check("seg", i, "vertex", s.v2.into(), raw.vertices.len())?;
        check("seg", i, "linedef", s.linedef.into(), raw.linedefs.len())?;
        // a seg running against its linedef needs that linedef's back side
        let wall = &raw.linedefs[s.linedef as usize];
        if s.side != 0 && wall.sidenum[1] == -1 {
            return Err(LoadError::BadReference {
                what: "seg",
                index: i,
                target: "back sidedef of linedef",
                id: s.linedef.into(),
            });
        }
    }
    for (i, ss) in raw.subsectors.iter().enumerate() {
        let end = i32::from(ss.first_seg) + i32::from(ss.seg_count);
        if ss.seg_count <= 0 {
            return Err(LoadError::Malformed(format!("SSECTORS[{i}]")));
        }
        check("subsector", i, "seg", end - 1, raw.segs.len())?;
        check("subsector", i, "seg", ss.first_seg.into(), raw.segs.len())?;
    }
    for (i, n) in raw.nodes.iter().enumerate() {
        for child in n.child {
            match NodeChild::from_raw(child) {
                NodeChild::Node(id) => check("node", i, "node", id.into(), raw.nodes.len())?,
                NodeChild::Subsector(id) => {
                    check("node", i, "subsector", id.into(), raw.subsectors.len())?
                }
            }
        }
    }
    if raw.subsectors.is_empty() {
        return Err(LoadError::Malformed("SSECTORS".into()));
    }
    Ok(())
}

/*====================================================================*/
/*                  Raw → world helpers (local)                        */
/*====================================================================*/
mod raw_to_world {
    use super::*;

    pub fn thing_from(r: &raw_level::RawThing) -> Thing {
        Thing {
            pos: vec2(r.x as f32, r.y as f32),
            angle: (r.angle as f32).to_radians(),
            type_id: r.type_ as u16,
        }
    }

    pub fn wall_from(index: usize, r: &raw_level::RawLinedef) -> Result<Wall, LoadError> {
        let front_side = match r.sidenum[0] {
            -1 => return Err(LoadError::MissingFrontSide(index)),
            s => s as u16,
        };
        Ok(Wall {
            v1: r.v1 as u16,
            v2: r.v2 as u16,
            flags: WallFlags::from_bits_truncate(r.flags as u16),
            special: r.special as u16,
            tag: r.tag as u16,
            front_side,
            back_side: (r.sidenum[1] != -1).then_some(r.sidenum[1] as u16),
        })
    }

    pub fn vertex_from(r: &raw_level::RawVertex) -> Vertex {
        Vertex {
            pos: vec2(r.x as f32, r.y as f32),
        }
    }

    pub fn segment_from(r: &raw_level::RawSeg) -> Segment {
        Segment {
            v1: r.v1 as u16,
            v2: r.v2 as u16,
            wall: r.linedef as u16,
            opposite: r.side == 1,
            offset: r.offset as f32,
        }
    }

    pub fn subsector_from(r: &raw_level::RawSubsector) -> Subsector {
        Subsector {
            seg_count: r.seg_count as u16,
            first_seg: r.first_seg as u16,
        }
    }

    pub fn node_from(r: &raw_level::RawNode) -> Node {
        Node {
            x: r.x as f32,
            y: r.y as f32,
            dx: r.dx as f32,
            dy: r.dy as f32,
            child: r.child.map(NodeChild::from_raw),
        }
    }
}

/*====================================================================*/
/*                       Name → TextureId                             */
/*====================================================================*/

struct Resolver<'a> {
    wad: &'a Wad,
    patches: &'a [Option<Patch>],
    defs: &'a TextureDefs<'a>,
    bank: &'a mut TextureBank,
}

impl Resolver<'_> {
    fn wall_or_none(&mut self, name: &[u8; 8]) -> Result<TextureId, LoadError> {
        let name = Wad::lump_name_str(name);
        if name == "-" || name.is_empty() {
            return Ok(NO_TEXTURE);
        }
        Ok(self.wall(name, false)?.unwrap_or(NO_TEXTURE))
    }

    fn flat_or_none(&mut self, name: &[u8; 8]) -> Result<TextureId, LoadError> {
        let name = Wad::lump_name_str(name);
        if name == "-" || name.is_empty() {
            return Ok(NO_TEXTURE);
        }
        Ok(self.flat(name)?.unwrap_or(NO_TEXTURE))
    }

    /// Composed wall texture, cached in the bank under its upper-case name.
    fn wall(&mut self, name: &str, quiet: bool) -> Result<Option<TextureId>, LoadError> {
        let name = name.to_ascii_uppercase();
        if let Some(id) = self.bank.id(&name) {
            return Ok(Some(id));
        }
        match self.defs.get(&name) {
            Some(entry) => {
                let tex = compose_texture(&name, entry, self.patches)?;
                Ok(Some(self.bank.insert(name, tex)?))
            }
            None => {
                if quiet {
                    log::debug!("texture {name} not found");
                } else {
                    log::warn!("texture {name} not found, drawing nothing");
                }
                Ok(None)
            }
        }
    }

    fn flat(&mut self, name: &str) -> Result<Option<TextureId>, LoadError> {
        let name = name.to_ascii_uppercase();
        if let Some(id) = self.bank.id(&name) {
            return Ok(Some(id));
        }
        match decode_flat(self.wad, &name)? {
            Some(tex) => Ok(Some(self.bank.insert(name, tex)?)),
            None => {
                log::warn!("flat {name} not found, drawing nothing");
                Ok(None)
            }
        }
    }
}

/*====================================================================*/
/*                  Palette / patch / texture helpers                 */
/*====================================================================*/

fn load_palette(wad: &Wad) -> Result<Palette, LoadError> {
    let idx = wad.find_lump("PLAYPAL").ok_or(LoadError::NoPalette)?;
    let bytes = wad.lump_bytes(idx)?;
    if bytes.len() < 256 * 3 {
        return Err(LoadError::NoPalette);
    }
    let mut pal = Palette::default();
    for (i, rgb) in bytes.chunks_exact(3).take(256).enumerate() {
        pal[i] = (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32;
    }
    Ok(pal)
}

/*-------------------- patch cache -----------------------------------*/

/// Decoded patch; `None` texels are holes left by the column posts.
struct Patch {
    w: usize,
    h: usize,
    texels: Vec<Option<u8>>,
}

/// One entry per `PNAMES` slot so texture definitions can index it directly.
fn decode_all_patches(wad: &Wad) -> Result<Vec<Option<Patch>>, LoadError> {
    let idx = wad.find_lump("PNAMES").ok_or(LoadError::NoPNames)?;
    let bytes = wad.lump_bytes(idx)?;
    let malformed = || LoadError::Malformed("PNAMES".into());

    let mut cur = bytes;
    let num = cur.read_u32::<LE>().map_err(|_| malformed())? as usize;
    let names = cur.get(..num * 8).ok_or_else(malformed)?;

    names
        .chunks_exact(8)
        .map(|chunk| -> Result<Option<Patch>, LoadError> {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            let name = Wad::lump_name_str(&raw).to_ascii_uppercase();
            let Some(id) = wad.find_lump(&name) else {
                log::warn!("patch {name} listed in PNAMES but missing");
                return Ok(None);
            };
            decode_patch(wad.lump_bytes(id)?)
                .map(Some)
                .ok_or(LoadError::Malformed(name))
        })
        .collect()
}

fn decode_patch(raw: &[u8]) -> Option<Patch> {
    let mut hdr = raw;
    let w = hdr.read_u16::<LE>().ok()? as usize;
    let h = hdr.read_u16::<LE>().ok()? as usize;
    let mut colofs = raw.get(8..8 + w * 4)?;

    let mut texels = vec![None; w * h];
    for x in 0..w {
        let mut p = colofs.read_u32::<LE>().ok()? as usize;
        loop {
            let row = *raw.get(p)? as usize;
            if row == 0xFF {
                break;
            }
            let len = *raw.get(p + 1)? as usize;
            let post = raw.get(p + 3..p + 3 + len)?;
            for (i, &px) in post.iter().enumerate().take(h.saturating_sub(row)) {
                texels[(row + i) * w + x] = Some(px);
            }
            p += len + 4;
        }
    }
    Some(Patch { w, h, texels })
}

/*-------------------- wall texture compose --------------------------*/

/// Name → definition bytes for every entry of `TEXTURE1` and `TEXTURE2`.
struct TextureDefs<'a> {
    entries: HashMap<String, &'a [u8]>,
}

impl<'a> TextureDefs<'a> {
    fn new(wad: &'a Wad) -> Result<Self, LoadError> {
        let mut entries = HashMap::new();
        for table in ["TEXTURE1", "TEXTURE2"] {
            let Some(idx) = wad.find_lump(table) else {
                continue;
            };
            let bytes = wad.lump_bytes(idx)?;
            let malformed = || LoadError::Malformed(table.into());

            let mut cur = bytes;
            let ntex = cur.read_u32::<LE>().map_err(|_| malformed())? as usize;
            for _ in 0..ntex {
                let off = cur.read_u32::<LE>().map_err(|_| malformed())? as usize;
                let entry = bytes.get(off..).ok_or_else(malformed)?;
                let name: &[u8; 8] = entry
                    .get(..8)
                    .and_then(|n| n.try_into().ok())
                    .ok_or_else(malformed)?;
                // TEXTURE1 wins over TEXTURE2
                entries
                    .entry(Wad::lump_name_str(name).to_ascii_uppercase())
                    .or_insert(entry);
            }
        }
        Ok(Self { entries })
    }

    fn get(&self, name: &str) -> Option<&'a [u8]> {
        self.entries.get(name).copied()
    }
}

fn compose_texture(name: &str, entry: &[u8], patches: &[Option<Patch>]) -> Result<Texture, LoadError> {
    let malformed = || LoadError::Malformed(format!("texture {name}"));

    let mut hdr = entry.get(12..22).ok_or_else(malformed)?;
    let w_tex = hdr.read_i16::<LE>().map_err(|_| malformed())?;
    let h_tex = hdr.read_i16::<LE>().map_err(|_| malformed())?;
    if w_tex <= 0 || h_tex <= 0 {
        return Err(malformed());
    }
    let (w_tex, h_tex) = (w_tex as usize, h_tex as usize);
    let _column_dir = hdr.read_u32::<LE>().map_err(|_| malformed())?;
    let np = hdr.read_u16::<LE>().map_err(|_| malformed())? as usize;

    let mut canvas = vec![0u8; w_tex * h_tex];
    let mut pinfo = entry.get(22..22 + np * 10).ok_or_else(malformed)?;
    for _ in 0..np {
        let ox = pinfo.read_i16::<LE>().map_err(|_| malformed())? as i32;
        let oy = pinfo.read_i16::<LE>().map_err(|_| malformed())? as i32;
        let idx = pinfo.read_u16::<LE>().map_err(|_| malformed())? as usize;
        let _step_dir = pinfo.read_i16::<LE>().map_err(|_| malformed())?;
        let _colormap = pinfo.read_i16::<LE>().map_err(|_| malformed())?;
        match patches.get(idx) {
            Some(Some(p)) => blit_patch(&mut canvas, w_tex, h_tex, p, ox, oy),
            _ => log::warn!("texture {name} uses missing patch #{idx}"),
        }
    }
    Ok(Texture {
        w: w_tex,
        h: h_tex,
        pixels: canvas,
    })
}

fn blit_patch(dest: &mut [u8], dw: usize, dh: usize, p: &Patch, ox: i32, oy: i32) {
    for py in 0..p.h {
        let dy = oy + py as i32;
        if !(0..dh as i32).contains(&dy) {
            continue;
        }
        for px in 0..p.w {
            let dx = ox + px as i32;
            if !(0..dw as i32).contains(&dx) {
                continue;
            }
            if let Some(src) = p.texels[py * p.w + px] {
                dest[dy as usize * dw + dx as usize] = src;
            }
        }
    }
}

/*----------------------------- flats --------------------------------*/

fn decode_flat(wad: &Wad, name: &str) -> Result<Option<Texture>, LoadError> {
    let Some(idx) = wad.find_lump_between("F_START", "F_END", name) else {
        return Ok(None);
    };
    let bytes = wad.lump_bytes(idx)?;
    if bytes.len() != FLAT_SIZE * FLAT_SIZE {
        return Err(LoadError::Malformed(name.into()));
    }
    Ok(Some(Texture {
        w: FLAT_SIZE,
        h: FLAT_SIZE,
        pixels: bytes.to_vec(),
    }))
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
