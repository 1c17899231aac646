//! The engine loop: single consumer of the token channel.
//!
//! Applies tokens to the terminal, batches damage, and drives the front-end
//! at a repaint cadence. Bursts (a full-screen redraw from `ls`, a compile
//! log) collapse into few paints; slow interactive output still paints within
//! one idle interval.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::event::EventListener;
use crate::grid::Row;
use crate::index::Line;
use crate::lexer::Token;
use crate::term::Term;
use crate::ui::Ui;

/// Engine timing knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Idle interval after which pending damage is flushed to the front-end.
    pub repaint_interval: Duration,
    /// Cursor blink half-period; `None` disables blinking.
    pub blink_interval: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repaint_interval: Duration::from_millis(8),
            blink_interval: Some(Duration::from_millis(500)),
        }
    }
}

/// Repaint state machine: damage accumulates in `Dirty`, is flushed during
/// `Painting`, and the loop returns to `Clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaintPhase {
    Clean,
    Dirty,
    Painting,
}

/// The engine: owns the terminal and the front-end, consumes tokens.
pub struct Engine<T: EventListener, U: Ui> {
    term: Term<T>,
    ui: U,
    tokens: Receiver<Token>,
    config: EngineConfig,
    phase: PaintPhase,
    cursor_visible: bool,
}

impl<T: EventListener, U: Ui> Engine<T, U> {
    pub fn new(term: Term<T>, ui: U, tokens: Receiver<Token>, config: EngineConfig) -> Self {
        Self { term, ui, tokens, config, phase: PaintPhase::Clean, cursor_visible: true }
    }

    /// Run until the token channel closes (terminal exited), then perform a
    /// final paint and hand the terminal back.
    pub fn run(mut self) -> Term<T> {
        let (cell_w, cell_h) = self.ui.cell_size();
        log::info!(
            "engine started: {}x{} cells of {cell_w}x{cell_h}px",
            self.term.grid().cols(),
            self.term.grid().lines(),
        );
        self.ui.clear();
        self.ui.set_cursor_visible(self.cursor_visible);

        // During a long burst, flush once half the screen is damaged rather
        // than waiting for the stream to pause.
        let burst_threshold = self.term.grid().lines().div_ceil(2).max(2);
        let mut next_blink = self.config.blink_interval.map(|period| Instant::now() + period);

        loop {
            let timeout = match next_blink {
                Some(at) => self
                    .config
                    .repaint_interval
                    .min(at.saturating_duration_since(Instant::now())),
                None => self.config.repaint_interval,
            };

            match self.tokens.recv_timeout(timeout) {
                Ok(token) => {
                    self.term.apply(&token);
                    if self.term.grid().dirty().is_any_dirty() {
                        self.phase = PaintPhase::Dirty;
                    }
                    if self.term.grid().dirty().pending() >= burst_threshold {
                        self.paint();
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let (Some(at), Some(period)) = (next_blink, self.config.blink_interval) {
                        if Instant::now() >= at {
                            self.cursor_visible = !self.cursor_visible;
                            self.ui.set_cursor_visible(self.cursor_visible);
                            next_blink = Some(Instant::now() + period);
                        }
                    }
                    if self.phase == PaintPhase::Dirty {
                        self.paint();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("token channel closed; shutting down");
                    self.paint();
                    return self.term;
                }
            }
        }
    }

    /// Flush the dirty set to the front-end.
    ///
    /// The set is taken before painting, so damage marked by tokens that
    /// arrive mid-paint lands in the next frame rather than tearing this one.
    fn paint(&mut self) {
        self.phase = PaintPhase::Painting;

        let cursor = self.term.grid().cursor_point();
        let dirty = self.term.grid_mut().dirty_mut().take();
        if !dirty.is_empty() {
            let grid = self.term.grid();
            let rows: Vec<(usize, &Row)> =
                dirty.iter().map(|&line| (line, &grid[Line(line)])).collect();
            self.ui.paint(&rows, cursor);
        }

        self.phase = PaintPhase::Clean;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crossbeam_channel::bounded;

    use super::{Engine, EngineConfig};
    use crate::event::VoidListener;
    use crate::grid::Row;
    use crate::index::Point;
    use crate::lexer::Lexer;
    use crate::term::Term;
    use crate::ui::Ui;

    /// Everything the engine told the front-end, in order.
    #[derive(Debug, Default)]
    struct UiLog {
        clears: usize,
        /// Each paint: the rows (index, text) plus the cursor.
        paints: Vec<(Vec<(usize, String)>, Point)>,
        cursor_toggles: Vec<bool>,
    }

    #[derive(Clone)]
    struct RecordingUi(Arc<Mutex<UiLog>>);

    impl RecordingUi {
        fn new() -> (Self, Arc<Mutex<UiLog>>) {
            let log = Arc::new(Mutex::new(UiLog::default()));
            (Self(Arc::clone(&log)), log)
        }
    }

    impl Ui for RecordingUi {
        fn cell_size(&mut self) -> (u16, u16) {
            (8, 16)
        }

        fn paint(&mut self, rows: &[(usize, &Row)], cursor: Point) {
            let rows = rows
                .iter()
                .map(|&(i, row)| (i, row.cells().iter().map(|g| g.ch).collect()))
                .collect();
            self.0.lock().unwrap().paints.push((rows, cursor));
        }

        fn clear(&mut self) {
            self.0.lock().unwrap().clears += 1;
        }

        fn set_cursor_visible(&mut self, visible: bool) {
            self.0.lock().unwrap().cursor_toggles.push(visible);
        }

        fn set_window_title(&mut self, _title: &str) {}
    }

    fn config() -> EngineConfig {
        EngineConfig { repaint_interval: Duration::from_millis(1), blink_interval: None }
    }

    fn send_all(input: &[u8], tx: &crossbeam_channel::Sender<crate::lexer::Token>) {
        let mut lexer = Lexer::new();
        let mut sink = |t| drop(tx.send(t));
        for &b in input {
            lexer.advance(b, &mut sink);
        }
        lexer.finish_input(&mut sink);
    }

    #[test]
    fn drains_and_final_paints_on_disconnect() {
        let (tx, rx) = bounded(64);
        send_all(b"hi\r\nworld", &tx);
        drop(tx);

        let (ui, log) = RecordingUi::new();
        let term = Engine::new(Term::new(4, 10, VoidListener), ui, rx, config()).run();

        // Terminal state is final.
        assert_eq!(term.grid().cursor().line(), 1);

        let log = log.lock().unwrap();
        assert_eq!(log.clears, 1);
        assert!(!log.paints.is_empty());

        // Replaying every paint in order yields the final screen content.
        let mut screen = vec![String::new(); 4];
        for (rows, _) in &log.paints {
            for (line, text) in rows {
                screen[*line] = text.clone();
            }
        }
        assert_eq!(screen[0], "hi        ");
        assert_eq!(screen[1], "world     ");
    }

    #[test]
    fn paint_carries_cursor_position() {
        let (tx, rx) = bounded(64);
        send_all(b"abc", &tx);
        drop(tx);

        let (ui, log) = RecordingUi::new();
        let _ = Engine::new(Term::new(4, 10, VoidListener), ui, rx, config()).run();

        let log = log.lock().unwrap();
        let (_, cursor) = log.paints.last().expect("at least one paint");
        assert_eq!(cursor.column.0, 3);
        assert_eq!(cursor.line.0, 0);
    }

    #[test]
    fn no_paint_without_damage() {
        let (tx, rx) = bounded(64);
        // Cursor movement only; nothing marked dirty.
        send_all(b"\x1b[2;2H\x1b[5C", &tx);
        drop(tx);

        let (ui, log) = RecordingUi::new();
        let _ = Engine::new(Term::new(4, 10, VoidListener), ui, rx, config()).run();

        assert!(log.lock().unwrap().paints.is_empty());
    }

    #[test]
    fn burst_flushes_before_idle() {
        let (tx, rx) = bounded(2048);
        // Fill the whole screen in one burst; with a 4-line grid the burst
        // threshold is 2, so at least two paints happen before the final one.
        send_all(b"aaaaaaaaaa\r\nbbbbbbbbbb\r\ncccccccccc\r\ndddddddddd", &tx);
        drop(tx);

        let (ui, log) = RecordingUi::new();
        let _ = Engine::new(Term::new(4, 10, VoidListener), ui, rx, config()).run();

        assert!(log.lock().unwrap().paints.len() >= 2);
    }

    #[test]
    fn initial_cursor_state_is_visible() {
        let (tx, rx) = bounded(4);
        drop(tx);

        let (ui, log) = RecordingUi::new();
        let _ = Engine::new(Term::new(4, 10, VoidListener), ui, rx, config()).run();

        assert_eq!(log.lock().unwrap().cursor_toggles.first(), Some(&true));
    }
}
