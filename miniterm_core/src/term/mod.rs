//! Terminal state machine.
//!
//! `Term<T: EventListener>` owns the screen grid and window title and turns
//! lexed tokens into grid mutations and outward events. Generic over the
//! listener so tests can run headless with `VoidListener`.

mod dispatch;

use crate::event::EventListener;
use crate::grid::Grid;

/// The terminal: screen grid plus title, driven by tokens.
#[derive(Debug)]
pub struct Term<T: EventListener> {
    /// The screen.
    grid: Grid,
    /// Window title (set by OSC 0, cleared by full reset).
    title: String,
    /// Event sink.
    listener: T,
}

impl<T: EventListener> Term<T> {
    /// Create a terminal with the given screen dimensions.
    pub fn new(lines: usize, cols: usize, listener: T) -> Self {
        Self { grid: Grid::new(lines, cols), title: String::new(), listener }
    }

    /// Reference to the screen.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable reference to the screen.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Reference to the event listener.
    pub fn listener(&self) -> &T {
        &self.listener
    }
}
