//! Doom-format WAD access: directory, map lumps, and conversion into
//! [`crate::world::Level`] plus a populated texture bank.

mod level;
mod loader;
mod raw;

#[cfg(test)]
pub(crate) mod testwad;

pub use level::{LevelError, RawLevel};
pub use loader::{LoadError, load_level};
pub use raw::{LumpInfo, Wad, WadError};
