//! The screen grid: cell storage, cursor, scroll region, and dirty tracking.
//!
//! `Grid` is the authoritative screen model. It is mutated only by the engine
//! task; the paint path reads rows it names in the drained dirty set. Editing,
//! navigation, and scroll operations live in submodules.

pub mod cursor;
pub mod dirty;
pub mod editing;
pub mod navigation;
pub mod row;
pub mod scroll;

use std::ops::{Index, IndexMut, Range};

use crate::cell::Glyph;
use crate::index::{Column, Line, Point};

pub use cursor::Cursor;
pub use dirty::DirtyTracker;
pub use editing::EraseMode;
pub use row::Row;

/// The screen: a fixed `lines x cols` glyph grid.
///
/// Created once with its final dimensions; resize is destroy-and-recreate.
/// The cursor's template glyph carries the current graphic state (fg, bg,
/// flags) applied to everything written or erased.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Visible rows, index 0 = top of screen.
    rows: Vec<Row>,
    /// Number of columns.
    cols: usize,
    /// Number of lines.
    lines: usize,
    /// Cursor position and write template.
    cursor: Cursor,
    /// Scroll region as a 0-based half-open range. Line shifts act only on
    /// rows inside it.
    scroll_region: Range<usize>,
    /// Rows changed since the last paint.
    dirty: DirtyTracker,
}

impl Grid {
    /// Create a grid with all cells null, cursor at the origin, and the
    /// scroll region spanning the whole screen.
    pub fn new(lines: usize, cols: usize) -> Self {
        debug_assert!(lines >= 1 && cols >= 1, "grid dimensions must be >= 1 (got {lines}x{cols})");
        Self {
            rows: (0..lines).map(|_| Row::new(cols)).collect(),
            cols,
            lines,
            cursor: Cursor::new(),
            scroll_region: 0..lines,
            dirty: DirtyTracker::new(lines),
        }
    }

    /// Number of lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Immutable reference to the cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Mutable reference to the cursor.
    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Cursor position clamped into the visible grid.
    ///
    /// At the pending-wrap position (`col == cols`) this reports the last
    /// column, which is where the cursor is drawn.
    pub fn cursor_point(&self) -> Point {
        Point::new(
            Line(self.cursor.line()),
            Column(self.cursor.col().0.min(self.cols - 1)),
        )
    }

    /// First line of the scroll region.
    pub fn scroll_top(&self) -> usize {
        self.scroll_region.start
    }

    /// Last line of the scroll region (inclusive).
    pub fn scroll_bottom(&self) -> usize {
        self.scroll_region.end - 1
    }

    /// Immutable reference to the dirty tracker.
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Mutable reference to the dirty tracker.
    pub fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Reset to the initial state: null cells everywhere, default template,
    /// cursor at the origin, full-screen scroll region, full repaint.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.reset(&Glyph::default());
        }
        self.cursor = Cursor::new();
        self.scroll_region = 0..self.lines;
        self.dirty.mark_all();
    }
}

impl Index<Line> for Grid {
    type Output = Row;

    fn index(&self, line: Line) -> &Row {
        &self.rows[line.0]
    }
}

impl IndexMut<Line> for Grid {
    fn index_mut(&mut self, line: Line) -> &mut Row {
        &mut self.rows[line.0]
    }
}
