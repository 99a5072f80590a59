use crate::renderer::software::span::{Span, SpanSet, Spans};

/// Screen columns already sealed by nearer single-sided walls.
#[derive(Default)]
pub struct Occlusion {
    solid: SpanSet,
    width: i32,
}

impl Occlusion {
    pub fn reset(&mut self, width: usize) {
        self.solid.clear();
        self.width = width as i32;
    }

    /// Still-visible parts of columns `[start, end)`.
    ///
    /// The request is clamped to the screen first. With `solid` set the
    /// returned parts are sealed as well, so nothing farther reaches them.
    pub fn clip_horizontal(&mut self, start: i32, end: i32, solid: bool) -> Spans {
        let start = start.clamp(0, self.width);
        let end = end.clamp(0, self.width);
        if start >= end {
            return Spans::new();
        }

        let visible = self.solid.gaps(start, end);
        if solid {
            for &gap in &visible {
                self.solid.insert(gap);
            }
        }
        visible
    }

    /// Every column is sealed; traversal can stop.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.solid.covers(0, self.width)
    }

    #[inline]
    pub fn intervals(&self) -> &[Span] {
        self.solid.as_slice()
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn occ(width: usize) -> Occlusion {
        let mut o = Occlusion::default();
        o.reset(width);
        o
    }

    #[test]
    fn adjacent_solid_ranges_merge() {
        let mut o = occ(320);
        o.clip_horizontal(10, 20, true);
        o.clip_horizontal(20, 30, true);
        assert_eq!(o.intervals(), &[Span::new(10, 30)]);
    }

    #[test]
    fn disjoint_solid_ranges_stay_apart() {
        let mut o = occ(320);
        for (s, e) in [(100, 110), (10, 20), (50, 60)] {
            o.clip_horizontal(s, e, true);
        }
        assert_eq!(o.intervals().len(), 3);
    }

    #[test]
    fn result_stays_inside_request() {
        let mut o = occ(320);
        o.clip_horizontal(0, 40, true);
        o.clip_horizontal(60, 80, true);
        for (s, e) in [(30, 70), (-50, 500), (79, 81), (10, 20)] {
            for sp in o.clip_horizontal(s, e, false) {
                assert!(sp.s >= s.max(0) && sp.e <= e.min(320), "{sp:?} outside [{s},{e})");
                assert!(!sp.is_empty());
            }
        }
        assert_eq!(
            o.clip_horizontal(30, 70, false).as_slice(),
            &[Span::new(40, 60)]
        );
    }

    #[test]
    fn window_does_not_occlude() {
        let mut o = occ(320);
        let seen = o.clip_horizontal(100, 200, false);
        assert_eq!(seen.as_slice(), &[Span::new(100, 200)]);
        assert!(o.intervals().is_empty());
        assert_eq!(o.clip_horizontal(100, 200, true).len(), 1);
        assert!(o.clip_horizontal(120, 180, true).is_empty());
    }

    #[test]
    fn offscreen_request_is_empty() {
        let mut o = occ(320);
        assert!(o.clip_horizontal(-10, -1, true).is_empty());
        assert!(o.clip_horizontal(320, 400, true).is_empty());
        assert!(o.intervals().is_empty());
    }

    #[test]
    fn full_after_covering_screen() {
        let mut o = occ(64);
        o.clip_horizontal(0, 30, true);
        assert!(!o.is_full());
        o.clip_horizontal(-5, 100, true);
        assert!(o.is_full());
        assert_eq!(o.intervals(), &[Span::new(0, 64)]);
    }
}
