//! ---------------------------------------------------------------------------
//! Classic software (CPU) span renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Walks every segment front-to-back from the BSP, so no Z-buffer is
//!   needed: horizontal occlusion plus per-column clip bands decide what is
//!   still visible.
//! * Walls are drawn as soon as a column is carved; floors and ceilings are
//!   collected into visplanes and flushed once all walls are done.
//! ---------------------------------------------------------------------------

mod lighting;
mod occlusion;
mod planes;
mod projection;
mod renderer;
mod span;
mod walls;

pub use lighting::lightness;
pub use occlusion::Occlusion;
pub use planes::{Plane, PlaneMap};
pub use projection::{Projection, normalize_angle, wrap, wrap_f};
pub use renderer::{ClipBands, FrameStats, Software};
pub use span::{Span, SpanSet, Spans};
