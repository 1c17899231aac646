//! Scroll region management and line shifts.
//!
//! All line shifts rotate whole `Row` allocations within the region and
//! stamp the vacated rows with the current background, then mark the whole
//! region dirty.

use std::ops::Range;

use crate::cell::Glyph;
use crate::index::Column;

use super::Grid;

impl Grid {
    /// DECSTBM: set the scroll region from 1-based parameters.
    ///
    /// `top` and `bottom` are clamped to the screen; a region where
    /// `top > bottom` after clamping is rejected. The cursor moves to the
    /// region's first line, column 0.
    pub fn set_scroll_region(&mut self, top1: usize, bottom1: usize) {
        let top = top1.max(1) - 1;
        let bottom = bottom1.max(1).min(self.lines); // exclusive end

        if top >= bottom {
            return;
        }

        self.scroll_region = top..bottom;
        self.cursor.set_line(top);
        self.cursor.set_col(Column(0));
    }

    /// Shift region content up by `count`; blank rows appear at the region
    /// bottom.
    pub fn scroll_up(&mut self, count: usize) {
        let region = self.scroll_region.clone();
        self.shift_up(region, count);
    }

    /// Shift region content down by `count`; blank rows appear at the region
    /// top.
    pub fn scroll_down(&mut self, count: usize) {
        let region = self.scroll_region.clone();
        self.shift_down(region, count);
    }

    /// IL: insert `count` blank lines at the cursor, pushing lines below it
    /// down within the scroll region. No-op when the cursor is outside the
    /// region.
    pub fn insert_lines(&mut self, count: usize) {
        let line = self.cursor.line();
        if !self.scroll_region.contains(&line) {
            return;
        }
        self.shift_down(line..self.scroll_region.end, count);
    }

    /// DL: delete `count` lines at the cursor, pulling lines below it up
    /// within the scroll region. No-op when the cursor is outside the region.
    pub fn delete_lines(&mut self, count: usize) {
        let line = self.cursor.line();
        if !self.scroll_region.contains(&line) {
            return;
        }
        self.shift_up(line..self.scroll_region.end, count);
    }

    fn shift_up(&mut self, range: Range<usize>, count: usize) {
        if range.is_empty() || count == 0 {
            return;
        }
        let count = count.min(range.len());
        let blank = Glyph::blank(&self.cursor.template);

        self.rows[range.clone()].rotate_left(count);
        for row in &mut self.rows[range.end - count..range.end] {
            row.reset(&blank);
        }
        self.dirty.mark_span(range.start, range.end - 1);
    }

    fn shift_down(&mut self, range: Range<usize>, count: usize) {
        if range.is_empty() || count == 0 {
            return;
        }
        let count = count.min(range.len());
        let blank = Glyph::blank(&self.cursor.template);

        self.rows[range.clone()].rotate_right(count);
        for row in &mut self.rows[range.start..range.start + count] {
            row.reset(&blank);
        }
        self.dirty.mark_span(range.start, range.end - 1);
    }
}
