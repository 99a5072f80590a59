//! Synthetic IWAD images for the WAD layer's unit tests.

use byteorder::{LittleEndian as LE, WriteBytesExt};

use crate::wad::Wad;

/// Append-only IWAD writer: lumps first, directory last.
#[derive(Default)]
pub struct WadBuilder {
    lumps: Vec<(String, Vec<u8>)>,
}

impl WadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lump(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.lumps.push((name.to_owned(), bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let data_len: usize = self.lumps.iter().map(|(_, b)| b.len()).sum();
        out.extend_from_slice(b"IWAD");
        out.write_u32::<LE>(self.lumps.len() as u32).unwrap();
        out.write_u32::<LE>(12 + data_len as u32).unwrap();

        let mut dir = Vec::new();
        for (name, bytes) in &self.lumps {
            dir.write_u32::<LE>(out.len() as u32).unwrap();
            dir.write_u32::<LE>(bytes.len() as u32).unwrap();
            dir.extend_from_slice(&name8(name));
            out.extend_from_slice(bytes);
        }
        out.extend_from_slice(&dir);
        out
    }

    pub fn wad(&self) -> Wad {
        Wad::from_bytes(self.build()).unwrap()
    }
}

pub fn name8(name: &str) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out
}

fn i16s(values: &[i16]) -> Vec<u8> {
    let mut out = Vec::new();
    for &v in values {
        out.write_i16::<LE>(v).unwrap();
    }
    out
}

/*──────────────────────── graphics lumps ───────────────────────*/

/// Palette index `i` maps to `0x00iiiiii`.
pub fn playpal() -> Vec<u8> {
    (0..=255u8).flat_map(|i| [i, i, i]).collect()
}

/// Column-post patch; `None` texels are transparent.
pub fn patch(w: usize, h: usize, texels: &[Option<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [w as i16, h as i16, 0, 0] {
        out.write_i16::<LE>(v).unwrap();
    }
    let mut posts = Vec::new();
    let mut offsets = Vec::new();
    let header = 8 + 4 * w;
    for x in 0..w {
        offsets.push((header + posts.len()) as u32);
        let mut y = 0;
        while y < h {
            if texels[y * w + x].is_none() {
                y += 1;
                continue;
            }
            let start = y;
            let mut run = Vec::new();
            while y < h {
                match texels[y * w + x] {
                    Some(px) => run.push(px),
                    None => break,
                }
                y += 1;
            }
            posts.extend_from_slice(&[start as u8, run.len() as u8, 0]);
            posts.extend_from_slice(&run);
            posts.push(0);
        }
        posts.push(0xFF);
    }
    for off in offsets {
        out.write_u32::<LE>(off).unwrap();
    }
    out.extend_from_slice(&posts);
    out
}

/// `TEXTURE1` lump: `(name, w, h, [(x, y, patch index)])`.
pub fn texture_table(defs: &[(&str, i16, i16, &[(i16, i16, u16)])]) -> Vec<u8> {
    let mut entries = Vec::new();
    let mut offsets = Vec::new();
    let head = 4 + 4 * defs.len();
    for (name, w, h, patches) in defs {
        offsets.push((head + entries.len()) as u32);
        entries.extend_from_slice(&name8(name));
        entries.write_u32::<LE>(0).unwrap();
        entries.write_i16::<LE>(*w).unwrap();
        entries.write_i16::<LE>(*h).unwrap();
        entries.write_u32::<LE>(0).unwrap();
        entries.write_i16::<LE>(patches.len() as i16).unwrap();
        for &(x, y, p) in patches.iter() {
            entries.write_i16::<LE>(x).unwrap();
            entries.write_i16::<LE>(y).unwrap();
            entries.write_u16::<LE>(p).unwrap();
            entries.write_i16::<LE>(1).unwrap();
            entries.write_i16::<LE>(0).unwrap();
        }
    }
    let mut out = Vec::new();
    out.write_u32::<LE>(defs.len() as u32).unwrap();
    for off in offsets {
        out.write_u32::<LE>(off).unwrap();
    }
    out.extend_from_slice(&entries);
    out
}

pub fn pnames(names: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LE>(names.len() as u32).unwrap();
    for n in names {
        out.extend_from_slice(&name8(n));
    }
    out
}

/*────────────────────────── map lumps ──────────────────────────*/

fn sidedef(mid: &str) -> Vec<u8> {
    let mut out = i16s(&[0, 0]);
    out.extend_from_slice(&name8("-"));
    out.extend_from_slice(&name8("-"));
    out.extend_from_slice(&name8(mid));
    out.extend(i16s(&[0]));
    out
}

fn sector(floor: i16, ceil: i16, floor_tex: &str, ceil_tex: &str, light: i16) -> Vec<u8> {
    let mut out = i16s(&[floor, ceil]);
    out.extend_from_slice(&name8(floor_tex));
    out.extend_from_slice(&name8(ceil_tex));
    out.extend(i16s(&[light, 0, 0]));
    out
}

/// Graphics shared by every test map:
///
/// * patches `SOLID` (4×2 of index 5) and `WALL00` (2×2, one transparent texel);
/// * textures `STARTAN3` (SOLID with WALL00 over it at x = 1) and `SKY1`;
/// * flats `FLOOR4_8` and `F_SKY1`.
pub fn graphics(b: WadBuilder) -> WadBuilder {
    b.lump("PLAYPAL", playpal())
        .lump("PNAMES", pnames(&["SOLID", "WALL00"]))
        .lump(
            "TEXTURE1",
            texture_table(&[
                ("STARTAN3", 4, 2, &[(0, 0, 0), (1, 0, 1)][..]),
                ("SKY1", 4, 2, &[(0, 0, 0)][..]),
            ]),
        )
        .lump("P_START", Vec::new())
        .lump("SOLID", patch(4, 2, &[Some(5); 8]))
        .lump("WALL00", patch(2, 2, &[Some(10), None, Some(11), Some(12)]))
        .lump("P_END", Vec::new())
        .lump("F_START", Vec::new())
        .lump("FLOOR4_8", vec![3; 4096])
        .lump("F_SKY1", vec![4; 4096])
        .lump("F_END", Vec::new())
}

/// `E1M1`: the 256×256 square room with a sky ceiling, one subsector and
/// an empty `NODES` lump. Side 2 names its texture in lower case and side 3
/// names one that does not exist.
pub fn room_map(b: WadBuilder) -> WadBuilder {
    let verts = i16s(&[0, 0, 256, 0, 256, 256, 0, 256]);
    let walls: Vec<u8> = [(0, 3), (3, 2), (2, 1), (1, 0)]
        .iter()
        .enumerate()
        .flat_map(|(i, &(a, z))| i16s(&[a, z, 0x0001, 0, 0, i as i16, -1]))
        .collect();
    let sides: Vec<u8> = ["STARTAN3", "STARTAN3", "startan3", "NOSUCH"]
        .iter()
        .flat_map(|m| sidedef(m))
        .collect();
    let segs: Vec<u8> = [(0, 3), (3, 2), (2, 1), (1, 0)]
        .iter()
        .enumerate()
        .flat_map(|(i, &(a, z))| i16s(&[a, z, 0, i as i16, 0, 0]))
        .collect();

    b.lump("E1M1", Vec::new())
        .lump("THINGS", i16s(&[128, 128, 90, 1, 7]))
        .lump("LINEDEFS", walls)
        .lump("SIDEDEFS", sides)
        .lump("VERTEXES", verts)
        .lump("SEGS", segs)
        .lump("SSECTORS", i16s(&[4, 0]))
        .lump("NODES", Vec::new())
        .lump("SECTORS", sector(0, 128, "FLOOR4_8", "F_SKY1", 255))
}

/// Graphics plus [`room_map`].
pub fn room_wad() -> WadBuilder {
    room_map(graphics(WadBuilder::new()))
}
