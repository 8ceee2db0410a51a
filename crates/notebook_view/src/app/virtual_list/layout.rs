//! Prefix-sum height index for variable-height list items.

use std::ops::Range;

/// Item heights plus prefix offsets, patchable from any index onward.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeightIndex {
    heights: Vec<f32>,
    prefix: Vec<f32>,
}

impl HeightIndex {
    /// Replace `start..start + delete_count` with `inserted` and reflow.
    pub(crate) fn splice(&mut self, start: usize, delete_count: usize, inserted: &[f32]) {
        let start = start.min(self.heights.len());
        let end = start.saturating_add(delete_count).min(self.heights.len());
        self.heights.splice(start..end, inserted.iter().copied());
        self.reflow_from(start);
    }

    /// Patch one height and reflow everything after it.
    pub(crate) fn set_height(&mut self, index: usize, height: f32) -> bool {
        match self.heights.get_mut(index) {
            Some(slot) => {
                *slot = height.max(0.0);
                self.reflow_from(index);
                true
            }
            None => false,
        }
    }

    fn reflow_from(&mut self, start: usize) {
        let start = start.min(self.heights.len());
        if self.prefix.is_empty() {
            self.prefix.push(0.0);
        }
        self.prefix.truncate(start + 1);
        let mut total = self.prefix.last().copied().unwrap_or(0.0);
        for height in &self.heights[start..] {
            total += *height;
            self.prefix.push(total);
        }
    }

    pub(crate) fn height(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    /// Total scrollable content height in pixels.
    pub(crate) fn total_height(&self) -> f32 {
        self.prefix.last().copied().unwrap_or(0.0)
    }

    /// Top y-offset of an item; the total height past the end.
    pub(crate) fn top(&self, index: usize) -> f32 {
        self.prefix
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total_height())
    }

    /// Index of the item covering `y`, clamped to the last item.
    pub(crate) fn index_at(&self, y: f32) -> usize {
        if self.heights.is_empty() {
            return 0;
        }
        let y = y.clamp(0.0, self.total_height());
        let mut lo = 0usize;
        let mut hi = self.heights.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.prefix[mid + 1] <= y {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.min(self.heights.len() - 1)
    }

    /// Items intersecting `[top - overscan, top + height + overscan]`.
    pub(crate) fn visible_range(&self, top: f32, height: f32, overscan: f32) -> Range<usize> {
        if self.heights.is_empty() || height <= 0.0 {
            return 0..0;
        }
        let start = self.index_at((top - overscan).max(0.0));
        let bottom = top + height + overscan;
        let mut end = self.index_at(bottom) + 1;
        // An item starting exactly at the bottom edge is not visible.
        if end > start + 1 && self.top(end - 1) >= bottom {
            end -= 1;
        }
        start..end.min(self.heights.len())
    }
}
