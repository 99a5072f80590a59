use crate::{
    renderer::software::{occlusion::Occlusion, planes::PlaneMap, projection::Projection},
    renderer::{Renderer, Rgba, Screen},
    world::{Camera, Level, SegmentId, TextureBank, Traversal},
};

/// Dark-grey clear colour; never produced by a lit surface in practice.
const CLEAR: Rgba = 0x0020_2020;

/// Per-column vertical open range `[ceil, floor)`.
///
/// A column is closed once `floor <= ceil`; nothing farther can show in it.
#[derive(Default)]
pub struct ClipBands {
    pub ceil: Vec<i32>,
    pub floor: Vec<i32>,
}

impl ClipBands {
    fn reset(&mut self, width: usize, height: usize) {
        self.ceil.clear();
        self.ceil.resize(width, 0);
        self.floor.clear();
        self.floor.resize(width, height as i32);
    }

    #[inline(always)]
    pub fn is_closed(&self, x: i32) -> bool {
        let col = x as usize;
        self.floor[col] <= self.ceil[col]
    }

    pub fn open_columns(&self) -> usize {
        self.ceil
            .iter()
            .zip(&self.floor)
            .filter(|(c, f)| c < f)
            .count()
    }
}

/// Counters for the last frame drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Segments handed out by the BSP walk before the screen filled.
    pub segments: usize,
    /// Segments that reached at least one open column.
    pub visible: usize,
    pub ceilings: usize,
    pub floors: usize,
}

#[derive(Default)]
pub struct Software {
    pub(super) scratch: Vec<Rgba>,
    pub(super) screen: Screen,
    pub(super) proj: Projection,
    pub(super) clip: ClipBands,
    pub(super) occlusion: Occlusion,
    pub(super) ceilings: PlaneMap,
    pub(super) floors: PlaneMap,
    pub(super) stats: FrameStats,
    order: Vec<SegmentId>,
}

impl Renderer for Software {
    fn begin_frame(&mut self, screen: Screen) {
        if screen != self.screen || self.scratch.len() != screen.pixels() {
            self.screen = screen;
            self.proj = Projection::new(screen);
            self.scratch.resize(screen.pixels(), 0);
        }
        self.scratch.fill(CLEAR);

        // fully open clips at start of frame
        self.clip.reset(screen.width, screen.height);
        self.occlusion.reset(screen.width);
        self.ceilings.clear(screen.height);
        self.floors.clear(screen.height);
        self.stats = FrameStats::default();
    }

    fn draw_level(&mut self, level: &Level, camera: &Camera, bank: &TextureBank) {
        if level.subsectors.is_empty() {
            return;
        }

        let mut order = std::mem::take(&mut self.order);
        level.fill_ordered_segments(camera.xy(), Traversal::FrontToBack, &mut order);

        for &seg in &order {
            if self.occlusion.is_full() {
                break;
            }
            self.stats.segments += 1;
            self.render_segment(seg, level, camera, bank);
        }
        self.order = order;

        self.flush_planes(camera, bank);

        self.stats.ceilings = self.ceilings.len();
        self.stats.floors = self.floors.len();
        log::trace!(
            "{}: {} segments walked, {} visible, {} ceilings, {} floors",
            level.name,
            self.stats.segments,
            self.stats.visible,
            self.stats.ceilings,
            self.stats.floors
        );
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.screen.width, self.screen.height);
    }
}

impl Software {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[inline]
    pub fn clip_bands(&self) -> &ClipBands {
        &self.clip
    }

    #[inline]
    pub fn occlusion(&self) -> &Occlusion {
        &self.occlusion
    }

    #[inline]
    pub fn ceilings(&self) -> &PlaneMap {
        &self.ceilings
    }

    #[inline]
    pub fn floors(&self) -> &PlaneMap {
        &self.floors
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
