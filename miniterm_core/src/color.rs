//! RGBA color type and the engine's mapped color subset.
//!
//! The engine resolves colors eagerly: every glyph carries concrete channel
//! values rather than palette indices. Only the small subset reachable
//! through the supported SGR codes is named here.

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Default text color (dark gray).
    pub const FOREGROUND: Self = Self::opaque(0x22, 0x22, 0x22);
    /// Default screen background (pale yellow).
    pub const BACKGROUND: Self = Self::opaque(0xff, 0xff, 0xdd);
    /// SGR 32 / 42.
    pub const GREEN: Self = Self::opaque(0x00, 0xff, 0x00);
    /// SGR 34. Mapped to red rather than the standard ANSI blue; see
    /// DESIGN.md for the rationale.
    pub const RED: Self = Self::opaque(0xff, 0x00, 0x00);

    /// A fully opaque color from its red, green, and blue channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}
