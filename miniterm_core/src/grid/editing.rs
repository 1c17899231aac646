//! Writing and erasing: the operations that put glyphs into the grid.

use crate::cell::Glyph;
use crate::index::Column;

use super::Grid;

/// Erase mode for display and line erase operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// From the cursor to the end (of display or line).
    Below,
    /// From the start (of display or line) through the cursor.
    Above,
    /// The entire display or line.
    All,
}

impl EraseMode {
    /// Map an erase parameter to its mode; 0 is the default.
    pub fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(Self::Below),
            1 => Some(Self::Above),
            2 => Some(Self::All),
            _ => None,
        }
    }
}

impl Grid {
    /// Write one character at the cursor and advance one cell.
    ///
    /// At the pending-wrap position (`col == cols`) a linefeed plus carriage
    /// return happens first, so the character lands at the start of the next
    /// line. Advancing out of the last column leaves the cursor pending-wrap
    /// rather than wrapping eagerly.
    pub fn write_char(&mut self, ch: char) {
        if self.cursor.col().0 >= self.cols {
            self.linefeed();
            self.cursor.set_col(Column(0));
        }

        let line = self.cursor.line();
        let col = self.cursor.col().0;

        let mut glyph = self.cursor.template;
        glyph.ch = ch;
        self.rows[line][Column(col)] = glyph;

        self.cursor.set_col(Column(col + 1));
        self.dirty.mark(line);
    }

    /// ICH: insert `count` blank cells at the cursor, shifting the tail of
    /// the row right. Cells pushed past the right edge are lost.
    pub fn insert_blank(&mut self, count: usize) {
        let line = self.cursor.line();
        let col = self.cursor.col().0;
        if col >= self.cols {
            return;
        }

        let count = count.min(self.cols - col);
        let blank = Glyph::blank(&self.cursor.template);
        let cells = self.rows[line].cells_mut();

        cells[col..].rotate_right(count);
        cells[col..col + count].fill(blank);

        self.dirty.mark(line);
    }

    /// DCH: delete `count` cells at the cursor, shifting the tail of the row
    /// left. The vacated right edge becomes null cells.
    pub fn delete_chars(&mut self, count: usize) {
        let line = self.cursor.line();
        let col = self.cursor.col().0;
        if col >= self.cols {
            return;
        }

        let count = count.min(self.cols - col);
        let cells = self.rows[line].cells_mut();

        cells[col..].rotate_left(count);
        cells[self.cols - count..].fill(Glyph::default());

        self.dirty.mark(line);
    }

    /// EL: erase part or all of the cursor's line. Erased cells take the
    /// current template colors.
    pub fn erase_line(&mut self, mode: EraseMode) {
        let line = self.cursor.line();
        let col = self.cursor.col().0.min(self.cols - 1);
        let blank = Glyph::blank(&self.cursor.template);

        let row = &mut self.rows[line];
        match mode {
            EraseMode::Below => row.clear_range(Column(col)..Column(self.cols), &blank),
            EraseMode::Above => row.clear_range(Column(0)..Column(col + 1), &blank),
            EraseMode::All => row.reset(&blank),
        }
        self.dirty.mark(line);
    }

    /// ED: erase part or all of the display. The cursor does not move.
    pub fn erase_display(&mut self, mode: EraseMode) {
        let line = self.cursor.line();
        let blank = Glyph::blank(&self.cursor.template);

        match mode {
            EraseMode::Below => {
                self.erase_line(EraseMode::Below);
                for row in &mut self.rows[line + 1..] {
                    row.reset(&blank);
                }
                self.dirty.mark_span(line, self.lines - 1);
            }
            EraseMode::Above => {
                self.erase_line(EraseMode::Above);
                for row in &mut self.rows[..line] {
                    row.reset(&blank);
                }
                self.dirty.mark_span(0, line);
            }
            EraseMode::All => {
                for row in &mut self.rows {
                    row.reset(&blank);
                }
                self.dirty.mark_all();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EraseMode;
    use crate::cell::Glyph;
    use crate::color::Rgba;
    use crate::grid::Grid;
    use crate::index::{Column, Line};

    fn grid_with_text(lines: usize, cols: usize, text: &str) -> Grid {
        let mut grid = Grid::new(lines, cols);
        for ch in text.chars() {
            grid.write_char(ch);
        }
        grid
    }

    #[test]
    fn write_char_stores_and_advances() {
        let mut grid = Grid::new(4, 10);
        grid.write_char('A');
        assert_eq!(grid[Line(0)][Column(0)].ch, 'A');
        assert_eq!(grid.cursor().col(), Column(1));
        assert!(grid.dirty().is_dirty(0));
    }

    #[test]
    fn write_char_uses_template_colors() {
        let mut grid = Grid::new(4, 10);
        grid.cursor_mut().template.fg = Rgba::GREEN;
        grid.write_char('g');
        assert_eq!(grid[Line(0)][Column(0)].fg, Rgba::GREEN);
    }

    #[test]
    fn last_column_write_leaves_pending_wrap() {
        let mut grid = Grid::new(4, 3);
        for ch in "abc".chars() {
            grid.write_char(ch);
        }
        // Cursor is past the last column but no wrap has happened yet.
        assert_eq!(grid.cursor().col(), Column(3));
        assert_eq!(grid.cursor().line(), 0);
    }

    #[test]
    fn pending_wrap_write_moves_to_next_line_first() {
        let mut grid = Grid::new(4, 3);
        for ch in "abcX".chars() {
            grid.write_char(ch);
        }
        assert_eq!(grid[Line(0)][Column(2)].ch, 'c');
        assert_eq!(grid[Line(1)][Column(0)].ch, 'X');
        assert_eq!(grid.cursor().line(), 1);
        assert_eq!(grid.cursor().col(), Column(1));
    }

    #[test]
    fn wrap_write_equals_explicit_newline_write() {
        // Filling a row then writing produces the same grid as an explicit
        // LF + CR before the write.
        let mut wrapped = Grid::new(4, 5);
        for ch in "abcdeX".chars() {
            wrapped.write_char(ch);
        }

        let mut explicit = Grid::new(4, 5);
        for ch in "abcde".chars() {
            explicit.write_char(ch);
        }
        explicit.linefeed();
        explicit.carriage_return();
        explicit.write_char('X');

        for line in 0..4 {
            assert_eq!(wrapped[Line(line)], explicit[Line(line)]);
        }
        assert_eq!(wrapped.cursor().line(), explicit.cursor().line());
        assert_eq!(wrapped.cursor().col(), explicit.cursor().col());
    }

    #[test]
    fn multibyte_char_is_one_cell() {
        let mut grid = Grid::new(4, 10);
        grid.write_char('你');
        grid.write_char('x');
        assert_eq!(grid[Line(0)][Column(0)].ch, '你');
        assert_eq!(grid[Line(0)][Column(1)].ch, 'x');
        assert_eq!(grid.cursor().col(), Column(2));
    }

    #[test]
    fn insert_blank_shifts_right() {
        let mut grid = grid_with_text(4, 10, "ABCDE");
        grid.cursor_mut().set_col(Column(1));
        grid.insert_blank(2);
        let line = Line(0);
        assert_eq!(grid[line][Column(0)].ch, 'A');
        assert_eq!(grid[line][Column(1)].ch, ' ');
        assert_eq!(grid[line][Column(2)].ch, ' ');
        assert_eq!(grid[line][Column(3)].ch, 'B');
        assert_eq!(grid[line][Column(4)].ch, 'C');
    }

    #[test]
    fn insert_blank_uses_template_background() {
        let mut grid = grid_with_text(4, 10, "AB");
        grid.cursor_mut().set_col(Column(0));
        grid.cursor_mut().template.bg = Rgba::GREEN;
        grid.insert_blank(1);
        assert_eq!(grid[Line(0)][Column(0)].bg, Rgba::GREEN);
    }

    #[test]
    fn insert_blank_past_width_clears_to_end() {
        let mut grid = grid_with_text(4, 6, "ABCDEF");
        grid.cursor_mut().set_col(Column(2));
        grid.insert_blank(100);
        let line = Line(0);
        assert_eq!(grid[line][Column(1)].ch, 'B');
        for col in 2..6 {
            assert_eq!(grid[line][Column(col)].ch, ' ', "col {col}");
        }
    }

    #[test]
    fn delete_chars_shifts_left_and_nulls_tail() {
        let mut grid = grid_with_text(4, 6, "ABCDEF");
        grid.cursor_mut().set_col(Column(1));
        grid.delete_chars(2);
        let line = Line(0);
        assert_eq!(grid[line][Column(0)].ch, 'A');
        assert_eq!(grid[line][Column(1)].ch, 'D');
        assert_eq!(grid[line][Column(2)].ch, 'E');
        assert_eq!(grid[line][Column(3)].ch, 'F');
        assert!(grid[line][Column(4)].is_null());
        assert!(grid[line][Column(5)].is_null());
    }

    #[test]
    fn erase_line_below_from_cursor() {
        let mut grid = grid_with_text(4, 10, "ABCDEFGHIJ");
        grid.cursor_mut().set_col(Column(5));
        grid.erase_line(EraseMode::Below);
        let line = Line(0);
        assert_eq!(grid[line][Column(4)].ch, 'E');
        assert_eq!(grid[line][Column(5)].ch, ' ');
        assert_eq!(grid[line][Column(9)].ch, ' ');
    }

    #[test]
    fn erase_line_above_includes_cursor() {
        let mut grid = grid_with_text(4, 10, "ABCDEFGHIJ");
        grid.cursor_mut().set_col(Column(5));
        grid.erase_line(EraseMode::Above);
        let line = Line(0);
        assert_eq!(grid[line][Column(5)].ch, ' ');
        assert_eq!(grid[line][Column(6)].ch, 'G');
    }

    #[test]
    fn erase_line_all_is_cursor_position_independent() {
        for col in [0, 4, 9] {
            let mut grid = grid_with_text(4, 10, "ABCDEFGHIJ");
            grid.cursor_mut().set_col(Column(col));
            grid.erase_line(EraseMode::All);
            assert!(
                grid[Line(0)].cells().iter().all(|g| g.ch == ' '),
                "cursor at col {col}"
            );
        }
    }

    #[test]
    fn erase_line_stamps_current_background() {
        let mut grid = grid_with_text(4, 10, "AB");
        grid.cursor_mut().template.bg = Rgba::GREEN;
        grid.cursor_mut().set_col(Column(0));
        grid.erase_line(EraseMode::All);
        assert_eq!(grid[Line(0)][Column(9)].bg, Rgba::GREEN);
    }

    #[test]
    fn erase_display_below() {
        let mut grid = Grid::new(3, 4);
        for line in 0..3 {
            grid.cursor_mut().set_line(line);
            grid.cursor_mut().set_col(Column(0));
            for _ in 0..4 {
                grid.write_char('X');
            }
        }
        grid.cursor_mut().set_line(1);
        grid.cursor_mut().set_col(Column(2));
        grid.erase_display(EraseMode::Below);

        assert_eq!(grid[Line(0)][Column(0)].ch, 'X');
        assert_eq!(grid[Line(1)][Column(1)].ch, 'X');
        assert_eq!(grid[Line(1)][Column(2)].ch, ' ');
        assert_eq!(grid[Line(2)][Column(0)].ch, ' ');
        // Cursor unchanged.
        assert_eq!(grid.cursor().line(), 1);
        assert_eq!(grid.cursor().col(), Column(2));
    }

    #[test]
    fn erase_display_above() {
        let mut grid = Grid::new(3, 4);
        for line in 0..3 {
            grid.cursor_mut().set_line(line);
            grid.cursor_mut().set_col(Column(0));
            for _ in 0..4 {
                grid.write_char('X');
            }
        }
        grid.cursor_mut().set_line(1);
        grid.cursor_mut().set_col(Column(2));
        grid.erase_display(EraseMode::Above);

        assert_eq!(grid[Line(0)][Column(3)].ch, ' ');
        assert_eq!(grid[Line(1)][Column(2)].ch, ' ');
        assert_eq!(grid[Line(1)][Column(3)].ch, 'X');
        assert_eq!(grid[Line(2)][Column(0)].ch, 'X');
    }

    #[test]
    fn erase_display_all_marks_full_repaint() {
        let mut grid = grid_with_text(3, 4, "XXXX");
        grid.dirty_mut().take();
        grid.erase_display(EraseMode::All);
        assert!(grid[Line(0)].cells().iter().all(|g| g.ch == ' '));
        assert_eq!(grid.dirty().pending(), 3);
    }

    #[test]
    fn erase_mode_from_param() {
        assert_eq!(EraseMode::from_param(0), Some(EraseMode::Below));
        assert_eq!(EraseMode::from_param(1), Some(EraseMode::Above));
        assert_eq!(EraseMode::from_param(2), Some(EraseMode::All));
        assert_eq!(EraseMode::from_param(3), None);
    }

    #[test]
    fn default_glyph_equals_erased_glyph_with_default_template() {
        let erased = Glyph::blank(&Glyph::default());
        assert!(erased.is_null());
    }
}
