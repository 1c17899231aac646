//! Core terminal emulation for miniterm.
//!
//! Three cooperating pieces: the [`lexer`] turns the raw PTY byte stream into
//! tokens on a bounded channel, the [`grid`] is the authoritative screen
//! model, and the [`engine`] loop applies tokens to a [`term::Term`] and
//! drives a front-end through the [`ui::Ui`] interface. Contains no GUI,
//! rendering, or platform-specific code.

#![deny(unsafe_code)]

pub mod cell;
pub mod color;
pub mod engine;
pub mod event;
pub mod grid;
pub mod index;
pub mod lexer;
pub mod term;
pub mod ui;

pub use cell::{Glyph, GlyphFlags};
pub use color::Rgba;
pub use engine::{Engine, EngineConfig};
pub use event::{Event, EventListener, VoidListener};
pub use grid::{Cursor, DirtyTracker, EraseMode, Grid, Row};
pub use index::{Column, Line, Point};
pub use lexer::{Lexer, Token, TokenKind, TOKEN_CHANNEL_DEPTH};
pub use term::Term;
pub use ui::Ui;
