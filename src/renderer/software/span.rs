use smallvec::SmallVec;

/// Half-open pixel interval `[s, e)` along one screen axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub s: i32,
    pub e: i32,
}

impl Span {
    #[inline(always)]
    pub const fn new(s: i32, e: i32) -> Self {
        Self { s, e }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.e <= self.s
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        (self.e - self.s).max(0) as usize
    }
}

/// Up to four gaps fit inline; more spill to the heap.
pub type Spans = SmallVec<[Span; 4]>;

/// Sorted, disjoint, coalesced set of spans.
///
/// Touching spans (`a.e == b.s`) are merged on insert, so the set always
/// holds the minimal number of intervals.
#[derive(Clone, Debug, Default)]
pub struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    #[inline]
    pub fn clear(&mut self) {
        self.spans.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[Span] {
        &self.spans
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// True when a single interval covers all of `[s, e)`.
    pub fn covers(&self, s: i32, e: i32) -> bool {
        self.spans.iter().any(|sp| sp.s <= s && sp.e >= e)
    }

    /// Add `span`, merging with every interval it overlaps or touches.
    pub fn insert(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }

        // columns usually arrive left to right
        let tail = self.spans.len().wrapping_sub(1);
        match self.spans.last().map(|last| last.e) {
            None => return self.spans.push(span),
            Some(e) if e < span.s => return self.spans.push(span),
            Some(e) if e == span.s => {
                self.spans[tail].e = span.e;
                return;
            }
            _ => {}
        }

        // 1) skip everything that ends strictly before us
        let first = self.spans.partition_point(|sp| sp.e < span.s);

        // 2) swallow every interval that starts at or before our end
        let mut merged = span;
        let mut last = first;
        while last < self.spans.len() && self.spans[last].s <= merged.e {
            merged.s = merged.s.min(self.spans[last].s);
            merged.e = merged.e.max(self.spans[last].e);
            last += 1;
        }

        // 3) replace the swallowed run with the coalesced span
        self.spans.splice(first..last, std::iter::once(merged));
    }

    /// Parts of `[s, e)` not covered by the set, in ascending order.
    pub fn gaps(&self, s: i32, e: i32) -> Spans {
        let mut out = Spans::new();
        let mut cursor = s;
        for sp in &self.spans {
            if cursor >= e {
                break;
            }
            if sp.e <= cursor {
                continue;
            }
            if sp.s >= e {
                break;
            }
            if sp.s > cursor {
                out.push(Span::new(cursor, sp.s));
            }
            cursor = cursor.max(sp.e);
        }
        if cursor < e {
            out.push(Span::new(cursor, e));
        }
        out
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
