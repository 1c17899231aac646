//! Terminal cell types.
//!
//! A `Glyph` is one character position in the screen grid: a single logical
//! character (one `char`, which may encode to multiple UTF-8 bytes) plus the
//! graphic rendition it was written with. A default glyph — space, default
//! colors, no flags — is the "null cell": rows start out full of them and
//! erase operations put them back.

use bitflags::bitflags;

use crate::color::Rgba;

bitflags! {
    /// Per-glyph attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GlyphFlags: u8 {
        const BOLD    = 1 << 0;
        const REVERSE = 1 << 1;
    }
}

impl Default for GlyphFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One character position in the screen grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// The character stored in this cell.
    pub ch: char,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Rendition flags.
    pub flags: GlyphFlags,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::FOREGROUND,
            bg: Rgba::BACKGROUND,
            flags: GlyphFlags::empty(),
        }
    }
}

impl Glyph {
    /// A blank cell carrying the given colors and flags but no character.
    ///
    /// Erase operations use this to stamp the current background onto
    /// cleared cells.
    pub fn blank(template: &Self) -> Self {
        Self { ch: ' ', ..*template }
    }

    /// Returns `true` if this cell is visually indistinguishable from an
    /// unwritten one.
    pub fn is_null(&self) -> bool {
        *self == Self::default()
    }
}
