// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use std::ops::{Index, IndexMut};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// Handle that never resolves: the slice or plane using it is not drawn.
pub const NO_TEXTURE: TextureId = TextureId::MAX;

/// Palette-indexed image in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Single-colour image, handy for tests and placeholder flats.
    pub fn solid(w: usize, h: usize, index: u8) -> Self {
        Self {
            w,
            h,
            pixels: vec![index; w * h],
        }
    }

    /// Palette index at already-wrapped coordinates.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.w + x]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Zero width or height; texel coordinates could not wrap.
    #[error("texture `{0}` has no pixels")]
    Empty(String),
}

/// Palette index → `0x00RRGGBB`.
pub struct Palette(pub [u32; 256]);
impl Default for Palette {
    fn default() -> Self {
        Palette([0u32; 256])
    }
}
impl Index<usize> for Palette {
    type Output = u32;
    fn index(&self, idx: usize) -> &u32 {
        &self.0[idx]
    }
}
impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut u32 {
        &mut self.0[idx]
    }
}

/// Brightness remap: `map[light][component] = component * light / 256`.
pub struct Lightmap(Vec<[u8; 256]>);
impl Default for Lightmap {
    fn default() -> Self {
        let table = (0..256u32)
            .map(|l| {
                let mut row = [0u8; 256];
                for (v, out) in row.iter_mut().enumerate() {
                    *out = (v as u32 * l / 256) as u8;
                }
                row
            })
            .collect();
        Lightmap(table)
    }
}
impl Index<usize> for Lightmap {
    type Output = [u8; 256];
    fn index(&self, idx: usize) -> &Self::Output {
        &self.0[idx]
    }
}
impl Lightmap {
    /// Darken every 8-bit channel of `rgb` to `light`.
    #[inline(always)]
    pub fn apply(&self, light: u8, rgb: u32) -> u32 {
        let row = &self.0[light as usize];
        let r = row[(rgb >> 16 & 0xFF) as usize] as u32;
        let g = row[(rgb >> 8 & 0xFF) as usize] as u32;
        let b = row[(rgb & 0xFF) as usize] as u32;
        r << 16 | g << 8 | b
    }
}

/// A palette-agnostic, format-agnostic cache of textures.
///
/// * Does **not** know about WADs, that's the loader's job.
/// * Stores exactly one copy of every name.
/// * Wall textures and flats share one id space.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    palette: Palette,
    lightmap: Lightmap,
    sky: TextureId,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            data: Vec::new(),
            palette: Palette::default(),
            lightmap: Lightmap::default(),
            sky: NO_TEXTURE,
        }
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Select the panorama used for sky ceilings.
    pub fn set_sky(&mut self, id: TextureId) {
        self.sky = id;
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn lightmap(&self) -> &Lightmap {
        &self.lightmap
    }

    /// Final pixel for palette `index` at brightness `light`.
    #[inline(always)]
    pub fn shade(&self, light: u8, index: u8) -> u32 {
        self.lightmap.apply(light, self.palette[index as usize])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// `None` for [`NO_TEXTURE`] or a stale id.
    #[inline(always)]
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.data.get(id as usize)
    }

    /// Bounds-checked borrow that reports the offending id.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.get(id).ok_or(TextureError::BadId(id))
    }

    #[inline]
    pub fn sky(&self) -> Option<&Texture> {
        self.get(self.sky)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the image has a
    ///   zero dimension (`Empty`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::Empty(name));
        }
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.by_name.insert(name, id);
        self.data.push(tex);
        Ok(id)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
