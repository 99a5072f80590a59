//! # IWAD directory reader
//!
//! * Reads the entire IWAD into RAM.
//! * Provides zero-copy access to individual lumps.
//! * Decodes binary lumps into typed vectors with **bincode 2**.
//!
//! Only the "IWAD" magic is accepted.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    mem,
    path::Path,
};
use thiserror::Error;

/// Size (in bytes) of one directory entry.
const DIR_ENTRY_SIZE: usize = 16;

/// One entry in the lump directory.
#[derive(Clone, Debug)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

/// Entire WAD in memory (raw bytes + parsed directory).
#[derive(Debug)]
pub struct Wad {
    lumps: Vec<LumpInfo>,
    bytes: Vec<u8>,
    by_name: HashMap<String, usize>,
}

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is not an IWAD")]
    BadMagic,

    #[error("directory extends beyond end of file")]
    DirectoryOutOfBounds,

    #[error("lump index {0} out of range")]
    BadIndex(usize),

    #[error("lump {name} (# {index}) slice {offset}+{size} past EOF ({file_size})")]
    BadOffset {
        index: usize,
        name: String,
        offset: u32,
        size: u32,
        file_size: usize,
    },

    #[error("lump {name} (# {index}) size {size} not multiple of element {elem_size}")]
    BadLumpSize {
        index: usize,
        name: String,
        size: usize,
        elem_size: usize,
    },

    #[error("lump {name} (# {index}) element {elem}: {source}")]
    BadElement {
        index: usize,
        name: String,
        elem: usize,
        source: bincode::error::DecodeError,
    },
}

impl Wad {
    // ------------------------------------------------------------------ //
    // Low-level helpers
    // ------------------------------------------------------------------ //

    /// Directory as a read-only slice.
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.lumps
    }

    /// &str view of an 8-byte lump name (trimmed at first NUL).
    pub fn lump_name_str(name: &[u8; 8]) -> &str {
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        std::str::from_utf8(&name[..end]).unwrap_or("?")
    }

    pub fn lump_name(&self, idx: usize) -> Option<&str> {
        self.lumps.get(idx).map(|l| Self::lump_name_str(&l.name))
    }

    /// Raw bytes of lump `idx` (slice into the file buffer).
    pub fn lump_bytes(&self, idx: usize) -> Result<&[u8], WadError> {
        let l = self.lumps.get(idx).ok_or(WadError::BadIndex(idx))?;
        let start = l.offset as usize;
        let end = start + l.size as usize;
        self.bytes.get(start..end).ok_or_else(|| WadError::BadOffset {
            index: idx,
            name: Self::lump_name_str(&l.name).into(),
            offset: l.offset,
            size: l.size,
            file_size: self.bytes.len(),
        })
    }

    /// Last lump called `name` (case-sensitive like vanilla Doom).
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Last lump called `name` strictly between the `start` and `end`
    /// namespace markers (e.g. `F_START` / `F_END`).
    pub fn find_lump_between(&self, start: &str, end: &str, name: &str) -> Option<usize> {
        let first = self.find_lump(start)? + 1;
        let last = self.find_lump(end)?;
        (first..last)
            .rev()
            .find(|&i| Self::lump_name_str(&self.lumps[i].name) == name)
    }

    // ------------------------------------------------------------------ //
    // Generic decode helper
    // ------------------------------------------------------------------ //

    /// Decode lump `idx` as a packed array of `T`. An empty lump is an
    /// empty vector.
    pub fn lump_to_vec<T>(&self, idx: usize) -> Result<Vec<T>, WadError>
    where
        T: Decode<()>,
    {
        let bytes = self.lump_bytes(idx)?;
        let elem = mem::size_of::<T>();
        let name = || Self::lump_name_str(&self.lumps[idx].name).to_owned();

        if bytes.len() % elem != 0 {
            return Err(WadError::BadLumpSize {
                index: idx,
                name: name(),
                size: bytes.len(),
                elem_size: elem,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let mut out = Vec::with_capacity(bytes.len() / elem);
        let mut slice = bytes;

        while !slice.is_empty() {
            let (val, read) =
                decode_from_slice::<T, _>(slice, cfg).map_err(|e| WadError::BadElement {
                    index: idx,
                    name: name(),
                    elem: out.len(),
                    source: e,
                })?;
            out.push(val);
            slice = &slice[read..];
        }
        Ok(out)
    }

    // ------------------------------------------------------------------ //
    // Loading
    // ------------------------------------------------------------------ //

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Parse an in-memory IWAD image.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WadError> {
        let mut header = bytes.as_slice();

        let mut magic = [0u8; 4];
        header.read_exact(&mut magic)?;
        if &magic != b"IWAD" {
            return Err(WadError::BadMagic);
        }

        let num_lumps = header.read_u32::<LE>()? as usize;
        let dir_offset = header.read_u32::<LE>()? as usize;

        // directory bounds check
        let dir_end = num_lumps
            .checked_mul(DIR_ENTRY_SIZE)
            .and_then(|len| len.checked_add(dir_offset))
            .filter(|&end| end <= bytes.len())
            .ok_or(WadError::DirectoryOutOfBounds)?;

        // parse directory
        let mut lumps = Vec::with_capacity(num_lumps);
        let mut cur = &bytes[dir_offset..dir_end];

        for _ in 0..num_lumps {
            let offset = cur.read_u32::<LE>()?;
            let size = cur.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            cur.read_exact(&mut name)?;
            lumps.push(LumpInfo { name, offset, size });
        }

        // validate each lump slice
        for (i, l) in lumps.iter().enumerate() {
            let end = l.offset as usize + l.size as usize;
            if end > bytes.len() {
                return Err(WadError::BadOffset {
                    index: i,
                    name: Self::lump_name_str(&l.name).into(),
                    offset: l.offset,
                    size: l.size,
                    file_size: bytes.len(),
                });
            }
        }

        // build name → idx map (later lumps shadow earlier ones)
        let mut by_name = HashMap::with_capacity(lumps.len());
        for (i, l) in lumps.iter().enumerate().rev() {
            by_name
                .entry(Self::lump_name_str(&l.name).to_owned())
                .or_insert(i);
        }

        log::debug!("WAD directory: {} lumps, {} bytes", lumps.len(), bytes.len());

        Ok(Self {
            lumps,
            bytes,
            by_name,
        })
    }
}

// ==========================================================================
// Tests
// ==========================================================================
