//! Rendering abstraction layer.
//!
//! *Game logic never touches a pixel buffer directly.* It hands the level,
//! the camera and the texture bank to a type implementing [`Renderer`] and
//! receives the finished frame through the `end_frame` callback.
//!
//! A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//! stay short.

use crate::world::{Camera, Level, TextureBank};
use thiserror::Error;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Output resolution of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub width: usize,
    pub height: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScreenError {
    #[error("resolution {width}x{height} has a zero dimension")]
    Empty { width: usize, height: usize },

    #[error("resolution {width}x{height} exceeds {max}x{max}")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

impl Screen {
    pub const MAX_DIM: usize = 4096;

    pub fn new(width: usize, height: usize) -> Result<Self, ScreenError> {
        if width == 0 || height == 0 {
            return Err(ScreenError::Empty { width, height });
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(ScreenError::TooLarge {
                width,
                height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn pixels(&self) -> usize {
        self.width * self.height
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
        }
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure, so the
/// buffer can never be observed half-written.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, screen: Screen);

    /// Render every visible wall and plane of `level` as seen from `camera`.
    fn draw_level(&mut self, level: &Level, camera: &Camera, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        screen: Screen,
        level: &Level,
        camera: &Camera,
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(screen);
        self.draw_level(level, camera, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;
