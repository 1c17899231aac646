//! A front-end that paints into the hosting terminal.
//!
//! Dirty rows become cursor-addressed writes with truecolor SGR on the
//! process's own stdout. This exercises the full `Ui` interface without any
//! windowing system; the engine's default colors resolve to the configured
//! scheme at paint time.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use miniterm_core::cell::GlyphFlags;
use miniterm_core::grid::Row;
use miniterm_core::index::Point;
use miniterm_core::ui::Ui;
use miniterm_core::{Glyph, Rgba};

/// Paints the grid into the hosting terminal via ANSI sequences.
pub struct HostUi<W: Write + Send> {
    out: W,
    /// Configured replacement for the engine's default foreground.
    foreground: Rgba,
    /// Configured replacement for the engine's default background.
    background: Rgba,
    /// Last emitted rendition, to skip redundant SGR changes.
    rendition: Option<(Rgba, Rgba, bool)>,
}

impl HostUi<io::Stdout> {
    pub fn stdout(foreground: Rgba, background: Rgba) -> Self {
        Self::new(io::stdout(), foreground, background)
    }
}

impl<W: Write + Send> HostUi<W> {
    pub fn new(out: W, foreground: Rgba, background: Rgba) -> Self {
        Self { out, foreground, background, rendition: None }
    }

    /// Undo our sequences on the host terminal: default rendition, cursor
    /// shown.
    pub fn restore(&mut self) {
        let _ = self.out.write_all(b"\x1b[0m\x1b[?25h\r\n");
        let _ = self.out.flush();
    }

    /// Map the engine's default colors to the configured scheme.
    fn resolve(&self, color: Rgba) -> Rgba {
        if color == Rgba::FOREGROUND {
            self.foreground
        } else if color == Rgba::BACKGROUND {
            self.background
        } else {
            color
        }
    }

    fn emit_rendition(&mut self, glyph: &Glyph) -> io::Result<()> {
        let fg = self.resolve(glyph.fg);
        let bg = self.resolve(glyph.bg);
        let bold = glyph.flags.contains(GlyphFlags::BOLD);
        if self.rendition == Some((fg, bg, bold)) {
            return Ok(());
        }
        self.rendition = Some((fg, bg, bold));

        let weight = if bold { "1" } else { "22" };
        write!(
            self.out,
            "\x1b[{weight};38;2;{};{};{};48;2;{};{};{}m",
            fg.r, fg.g, fg.b, bg.r, bg.g, bg.b,
        )
    }

    fn paint_inner(&mut self, rows: &[(usize, &Row)], cursor: Point) -> io::Result<()> {
        for &(line, row) in rows {
            write!(self.out, "\x1b[{};1H", line + 1)?;
            for glyph in row.cells() {
                self.emit_rendition(glyph)?;
                write!(self.out, "{}", glyph.ch)?;
            }
        }
        // Park the host cursor where the grid cursor is.
        write!(self.out, "\x1b[{};{}H", cursor.line.0 + 1, cursor.column.0 + 1)?;
        self.out.flush()
    }
}

impl<W: Write + Send> Ui for HostUi<W> {
    fn cell_size(&mut self) -> (u16, u16) {
        // Host terminal cells are the unit.
        (1, 1)
    }

    fn paint(&mut self, rows: &[(usize, &Row)], cursor: Point) {
        if let Err(e) = self.paint_inner(rows, cursor) {
            log::warn!("paint failed: {e}");
        }
    }

    fn clear(&mut self) {
        self.rendition = None;
        let bg = self.background;
        let _ = write!(self.out, "\x1b[48;2;{};{};{}m\x1b[2J\x1b[H", bg.r, bg.g, bg.b);
        let _ = self.out.flush();
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        let seq: &[u8] = if visible { b"\x1b[?25h" } else { b"\x1b[?25l" };
        let _ = self.out.write_all(seq);
        let _ = self.out.flush();
    }

    fn set_window_title(&mut self, title: &str) {
        let _ = write!(self.out, "\x1b]0;{title}\x07");
        let _ = self.out.flush();
    }
}

/// Clonable handle sharing one `HostUi` between the engine (paints) and the
/// event listener (titles) behind a short-held lock.
pub struct SharedUi(Arc<Mutex<HostUi<io::Stdout>>>);

impl SharedUi {
    pub fn new(ui: HostUi<io::Stdout>) -> Self {
        Self(Arc::new(Mutex::new(ui)))
    }

    /// Title update from the event listener side.
    pub fn set_title(&self, title: &str) {
        self.0.lock().set_window_title(title);
    }

    /// Restore the host terminal at shutdown.
    pub fn restore(&self) {
        self.0.lock().restore();
    }
}

impl Clone for SharedUi {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Ui for SharedUi {
    fn cell_size(&mut self) -> (u16, u16) {
        self.0.lock().cell_size()
    }

    fn paint(&mut self, rows: &[(usize, &Row)], cursor: Point) {
        self.0.lock().paint(rows, cursor);
    }

    fn clear(&mut self) {
        self.0.lock().clear();
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.0.lock().set_cursor_visible(visible);
    }

    fn set_window_title(&mut self, title: &str) {
        self.0.lock().set_window_title(title);
    }
}
