//! Cursor state: position plus the template glyph for new writes.

use crate::cell::Glyph;
use crate::index::Column;

/// The write position and current graphic state.
///
/// `col` may equal the grid width: that is the pending-wrap position reached
/// after writing into the last column. The next character write wraps first;
/// any other column mutation snaps back into range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Line index (0-based, always < grid lines).
    line: usize,
    /// Column index (0-based, at most the grid width).
    col: Column,
    /// Template applied to written and erased cells. The dispatch layer sets
    /// SGR state directly on this glyph.
    pub template: Glyph,
}

impl Cursor {
    /// A cursor at the origin with the default template.
    pub fn new() -> Self {
        Self { line: 0, col: Column(0), template: Glyph::default() }
    }

    /// Current line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current column.
    pub fn col(&self) -> Column {
        self.col
    }

    /// Set the line.
    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Set the column.
    pub fn set_col(&mut self, col: Column) {
        self.col = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
