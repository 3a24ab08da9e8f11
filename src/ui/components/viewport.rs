//! Scroll window over the palette's result list.

use std::ops::Range;

/// A fixed-height window into a list. Only this window scrolls; nothing
/// outside the result list is affected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            offset: 0,
            height: height.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Scroll the minimum amount needed for `index` to be visible.
    /// Returns whether the offset moved.
    pub fn scroll_into_view(&mut self, index: usize) -> bool {
        let before = self.offset;
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.height {
            self.offset = index + 1 - self.height;
        }
        self.offset != before
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Rows of a `len`-long list currently inside the window.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = (self.offset + self.height).min(len);
        start..end
    }
}
