//! Cursor movement.
//!
//! Relative movement clamps at the scroll-region edge when the cursor starts
//! inside the region and at the screen edge otherwise; it never scrolls.
//! `linefeed` and `reverse_index` are the only movements that shift lines.

use crate::index::Column;

use super::Grid;

impl Grid {
    /// CUU: up by `count`, clamped.
    pub fn move_up(&mut self, count: usize) {
        let line = self.cursor.line();
        let top = if self.in_scroll_region(line) { self.scroll_region.start } else { 0 };
        self.cursor.set_line(line.saturating_sub(count).max(top));
    }

    /// CUD: down by `count`, clamped.
    pub fn move_down(&mut self, count: usize) {
        let line = self.cursor.line();
        let bottom = if self.in_scroll_region(line) {
            self.scroll_region.end - 1
        } else {
            self.lines - 1
        };
        self.cursor.set_line((line + count).min(bottom));
    }

    /// CUF: right by `count`, clamped to the last column.
    pub fn move_forward(&mut self, count: usize) {
        let col = self.cursor.col().0;
        self.cursor.set_col(Column((col + count).min(self.cols - 1)));
    }

    /// CUB: left by `count`, clamped to column 0. From the pending-wrap
    /// position one step lands on the last column.
    pub fn move_backward(&mut self, count: usize) {
        let col = self.cursor.col().0;
        self.cursor.set_col(Column(col.saturating_sub(count).min(self.cols - 1)));
    }

    /// CUP/HVP: absolute position from 1-based parameters. The row argument
    /// is relative to the scroll-region top; both are clamped to the screen.
    pub fn goto(&mut self, row1: usize, col1: usize) {
        let line = self.scroll_region.start + row1.saturating_sub(1);
        self.cursor.set_line(line.min(self.lines - 1));
        self.cursor.set_col(Column(col1.saturating_sub(1).min(self.cols - 1)));
    }

    /// VPA: absolute row from a 1-based parameter, clamped.
    pub fn goto_line(&mut self, row1: usize) {
        self.cursor.set_line(row1.saturating_sub(1).min(self.lines - 1));
    }

    /// CHA: absolute column from a 1-based parameter, clamped.
    pub fn goto_col(&mut self, col1: usize) {
        self.cursor.set_col(Column(col1.saturating_sub(1).min(self.cols - 1)));
    }

    /// CR: column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.set_col(Column(0));
    }

    /// BS: one column left, clamped at 0. From the pending-wrap position it
    /// lands on the last column.
    pub fn backspace(&mut self) {
        let col = self.cursor.col().0;
        self.cursor.set_col(Column(col.saturating_sub(1).min(self.cols - 1)));
    }

    /// LF: one line down; at the scroll-region bottom the region scrolls up
    /// instead of the cursor moving.
    ///
    /// The destination row is marked dirty so the cursor gets repainted
    /// where it landed.
    pub fn linefeed(&mut self) {
        let line = self.cursor.line();
        if line + 1 == self.scroll_region.end {
            self.scroll_up(1);
        } else if line + 1 < self.lines {
            self.cursor.set_line(line + 1);
            self.dirty.mark(line + 1);
        }
    }

    /// RI: one line up; at the scroll-region top the region scrolls down
    /// instead of the cursor moving.
    pub fn reverse_index(&mut self) {
        let line = self.cursor.line();
        if line == self.scroll_region.start {
            self.scroll_down(1);
        } else if line > 0 {
            self.cursor.set_line(line - 1);
            self.dirty.mark(line - 1);
        }
    }

    fn in_scroll_region(&self, line: usize) -> bool {
        self.scroll_region.contains(&line)
    }
}
