//! Token interpretation: the mapping from lexed tokens to screen mutations
//! and outward events.
//!
//! Parameter handling follows the resilience rule: a missing or malformed
//! parameter takes its default, an unknown sequence is logged and skipped,
//! and interpretation always resumes at the next token. Nothing here panics
//! on shell output.

use crate::cell::GlyphFlags;
use crate::color::Rgba;
use crate::event::{Event, EventListener};
use crate::grid::EraseMode;
use crate::lexer::{Token, TokenKind};

use super::Term;

const BEL: u8 = 0x07;

impl<T: EventListener> Term<T> {
    /// Apply one token to the terminal.
    pub fn apply(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Text => self.write_run(&token.literal),
            TokenKind::CarriageReturn => self.grid.carriage_return(),
            TokenKind::LineFeed => self.grid.linefeed(),
            TokenKind::Backspace => self.grid.backspace(),
            TokenKind::Csi => self.csi_dispatch(&token.literal),
            TokenKind::Osc => self.osc_dispatch(&token.literal),
            TokenKind::ResetState => self.reset_state(),
            TokenKind::ReverseIndex => self.grid.reverse_index(),
            // Charset designation, device control strings, and discarded
            // escapes have no screen effect.
            TokenKind::CharsetG0 | TokenKind::Dcs | TokenKind::Discard => {}
        }
    }

    /// Write a run of printable bytes.
    ///
    /// The run is decoded as UTF-8; bytes that do not form a valid sequence
    /// are dropped silently, as is BEL. A tab expands to four spaces.
    fn write_run(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    for ch in text.chars() {
                        self.write_char(ch);
                    }
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    // valid_up_to guarantees this slice decodes.
                    for ch in std::str::from_utf8(valid).unwrap_or("").chars() {
                        self.write_char(ch);
                    }
                    let skip = err.error_len().unwrap_or(tail.len());
                    rest = &tail[skip..];
                }
            }
        }
    }

    fn write_char(&mut self, ch: char) {
        match ch {
            '\t' => {
                for _ in 0..4 {
                    self.grid.write_char(' ');
                }
            }
            '\u{7}' => {}
            _ => self.grid.write_char(ch),
        }
    }

    /// ESC c: reset everything and tell the host to restore its title.
    fn reset_state(&mut self) {
        self.grid.reset();
        self.title.clear();
        self.listener.send_event(Event::ResetTitle);
    }

    /// Dispatch a complete CSI sequence on its final byte.
    fn csi_dispatch(&mut self, literal: &[u8]) {
        // The lexer only emits `ESC [ … final`, but stay defensive.
        let Some((&final_byte, rest)) = literal.split_last() else {
            return;
        };
        let params = split_params(rest.get(2..).unwrap_or(&[]));
        let arg = |i: usize, default: u16| params.get(i).copied().flatten().unwrap_or(default);
        // Movement and shift counts: absent or zero means one.
        let count = |i: usize| arg(i, 1).max(1) as usize;

        match final_byte {
            b'A' => self.grid.move_up(count(0)),
            b'B' => self.grid.move_down(count(0)),
            b'C' => self.grid.move_forward(count(0)),
            b'D' => self.grid.move_backward(count(0)),
            b'G' => self.grid.goto_col(count(0)),
            b'd' => self.grid.goto_line(count(0)),
            b'H' | b'f' => self.grid.goto(count(0), count(1)),
            b'J' => match EraseMode::from_param(arg(0, 0)) {
                Some(mode) => self.grid.erase_display(mode),
                None => log::debug!("ignored erase-display parameter in {literal:?}"),
            },
            b'K' => match EraseMode::from_param(arg(0, 0)) {
                Some(mode) => self.grid.erase_line(mode),
                None => log::debug!("ignored erase-line parameter in {literal:?}"),
            },
            b'm' => self.sgr(&params),
            b'@' => self.grid.insert_blank(count(0)),
            b'L' => self.grid.insert_lines(count(0)),
            b'M' => self.grid.delete_lines(count(0)),
            b'P' => self.grid.delete_chars(count(0)),
            b'r' => self.grid.set_scroll_region(count(0), arg(1, self.grid.lines() as u16) as usize),
            // Mode set/reset: accepted, no modes implemented.
            b'h' | b'l' => log::debug!("ignored mode sequence {:?}", String::from_utf8_lossy(literal)),
            b'n' => {
                if arg(0, 0) == 6 {
                    self.device_status_report();
                }
            }
            b'c' => self.primary_device_attributes(),
            _ => log::debug!("unhandled CSI sequence {:?}", String::from_utf8_lossy(literal)),
        }
    }

    /// SGR: apply every parameter in order. Unknown codes are skipped, never
    /// aborting the rest of the sequence.
    fn sgr(&mut self, params: &[Option<u16>]) {
        for &param in params {
            let template = &mut self.grid.cursor_mut().template;
            match param.unwrap_or(0) {
                0 => {
                    template.fg = Rgba::FOREGROUND;
                    template.bg = Rgba::BACKGROUND;
                    template.flags = GlyphFlags::empty();
                }
                1 => template.flags |= GlyphFlags::BOLD,
                7 => {
                    // Reverse video swaps the current pair once; repeated
                    // SGR 7 must not swap back.
                    if !template.flags.contains(GlyphFlags::REVERSE) {
                        std::mem::swap(&mut template.fg, &mut template.bg);
                        template.flags |= GlyphFlags::REVERSE;
                    }
                }
                27 => {
                    template.flags.remove(GlyphFlags::REVERSE);
                    template.fg = Rgba::FOREGROUND;
                    template.bg = Rgba::BACKGROUND;
                }
                32 => template.fg = Rgba::GREEN,
                34 => template.fg = Rgba::RED,
                39 => template.fg = Rgba::FOREGROUND,
                42 => template.bg = Rgba::GREEN,
                other => log::debug!("ignored SGR parameter {other}"),
            }
        }
    }

    /// CSI 6 n: report the cursor position, 1-based.
    fn device_status_report(&mut self) {
        let point = self.grid.cursor_point();
        let reply = format!("\x1b[{};{}R", point.line.0 + 1, point.column.0 + 1);
        self.listener.send_event(Event::PtyWrite(reply.into_bytes()));
    }

    /// CSI c: identify as a VT100 with advanced video option.
    fn primary_device_attributes(&mut self) {
        self.listener.send_event(Event::PtyWrite(b"\x1b[?1;2c".to_vec()));
    }

    /// Dispatch a complete OSC sequence.
    fn osc_dispatch(&mut self, literal: &[u8]) {
        let body = strip_osc(literal);
        let (selector, payload) = match body.iter().position(|&b| b == b';') {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, &body[body.len()..]),
        };

        match selector {
            b"0" => {
                let title = String::from_utf8_lossy(payload).into_owned();
                self.title = title.clone();
                self.listener.send_event(Event::Title(title));
            }
            b"10" if payload == b"?" => {
                let fg = Rgba::FOREGROUND;
                let reply = format!(
                    "\x1b]10;rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}\x07",
                    r = fg.r,
                    g = fg.g,
                    b = fg.b,
                );
                self.listener.send_event(Event::PtyWrite(reply.into_bytes()));
            }
            _ => log::debug!("ignored OSC sequence {:?}", String::from_utf8_lossy(literal)),
        }
    }
}

/// Split CSI parameter bytes on `;`.
///
/// A segment that is empty or not a plain decimal number yields `None`, which
/// the dispatch treats as the parameter's default.
fn split_params(bytes: &[u8]) -> Vec<Option<u16>> {
    bytes
        .split(|&b| b == b';')
        .map(|part| {
            if part.is_empty() || !part.iter().all(u8::is_ascii_digit) {
                return None;
            }
            std::str::from_utf8(part).ok()?.parse().ok()
        })
        .collect()
}

/// Strip the `ESC ]` introducer and the BEL / `ESC \` terminator.
fn strip_osc(literal: &[u8]) -> &[u8] {
    let body = &literal[2..];
    if body.last() == Some(&BEL) {
        &body[..body.len() - 1]
    } else if body.ends_with(b"\x1b\\") {
        &body[..body.len() - 2]
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::{split_params, strip_osc};

    #[test]
    fn split_params_plain() {
        assert_eq!(split_params(b"2;5"), vec![Some(2), Some(5)]);
    }

    #[test]
    fn split_params_empty_and_missing() {
        assert_eq!(split_params(b""), vec![None]);
        assert_eq!(split_params(b";5"), vec![None, Some(5)]);
        assert_eq!(split_params(b"5;"), vec![Some(5), None]);
    }

    #[test]
    fn split_params_invalid_segments() {
        assert_eq!(split_params(b"?25"), vec![None]);
        assert_eq!(split_params(b"1x;2"), vec![None, Some(2)]);
        assert_eq!(split_params(b"99999"), vec![None]);
    }

    #[test]
    fn strip_osc_bel_and_st() {
        assert_eq!(strip_osc(b"\x1b]0;hi\x07"), b"0;hi");
        assert_eq!(strip_osc(b"\x1b]0;hi\x1b\\"), b"0;hi");
    }
}
