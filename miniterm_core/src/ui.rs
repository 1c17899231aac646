//! The front-end interface.
//!
//! The engine owns the screen; the front-end only ever sees the rows handed
//! to it at paint time. Implementations draw pixels (or characters) however
//! they like but must not retain references past the call.

use crate::grid::Row;
use crate::index::Point;

/// Drawing sink implemented by the front-end.
///
/// The engine queries `cell_size` once at startup, calls `clear` when the
/// whole surface resets, and otherwise drives everything through `paint`,
/// which receives only the rows that changed plus the cursor position.
pub trait Ui: Send {
    /// Pixel size of one grid cell. Queried once at engine startup.
    fn cell_size(&mut self) -> (u16, u16);

    /// Repaint the given rows. Each entry is the row index and its cells.
    /// The current cursor position accompanies every paint so the front-end
    /// can draw the cursor after the cells.
    fn paint(&mut self, rows: &[(usize, &Row)], cursor: Point);

    /// Clear the whole surface to the default background.
    fn clear(&mut self);

    /// Show or hide the cursor (blink support).
    fn set_cursor_visible(&mut self, visible: bool);

    /// Set the window title.
    fn set_window_title(&mut self, title: &str);
}
