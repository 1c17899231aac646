//! Incremental escape-sequence lexer.
//!
//! Classifies the raw PTY byte stream into [`Token`]s: printable runs,
//! single-byte controls, and the CSI/OSC/DCS escape families. The lexer only
//! delimits sequences; splitting CSI parameters and deciding what a sequence
//! means is the dispatch layer's job.
//!
//! Every consumed byte lands in exactly one token's `literal`, so the
//! concatenation of all literals reproduces the input stream byte for byte.

use std::io::{self, Read};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

/// Token channel depth. A full channel blocks the PTY reader, which is the
/// intended flow control between the shell and the engine.
pub const TOKEN_CHANNEL_DEPTH: usize = 2000;

/// Read buffer size for the reader task.
const READ_CHUNK: usize = 4096;

/// What a token means to the screen model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of printable bytes.
    Text,
    /// `\r`.
    CarriageReturn,
    /// `\n`.
    LineFeed,
    /// `\x08`.
    Backspace,
    /// `ESC ( B` — designate ASCII into G0. No screen effect.
    CharsetG0,
    /// A full CSI sequence, `ESC [` through its final byte.
    Csi,
    /// A full OSC sequence, `ESC ]` through BEL or `ESC \`.
    Osc,
    /// A full DCS sequence, `ESC P` through `ESC \`. No screen effect.
    Dcs,
    /// `ESC c` — reset to initial state.
    ResetState,
    /// `ESC M` — reverse index.
    ReverseIndex,
    /// Bytes consumed without screen effect: `ESC =`, `ESC >`, unrecognized
    /// escapes, and sequences truncated by EOF.
    Discard,
}

/// One lexed unit of the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact bytes this token consumed.
    pub literal: Vec<u8>,
}

impl Token {
    fn new(kind: TokenKind, literal: Vec<u8>) -> Self {
        Self { kind, literal }
    }
}

/// Lexer states. `Ground` accumulates text runs; the others accumulate one
/// escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    /// Seen `ESC`, waiting for the discriminator byte.
    Escape,
    /// Seen `ESC (`, waiting for the charset designator.
    CharsetPending,
    /// Inside `ESC [ …`, waiting for a final byte in `[@A-Za-z]`.
    CsiParams,
    /// Inside `ESC ] …`, waiting for BEL or `ESC \`.
    OscBody,
    /// Seen `ESC` inside an OSC body.
    OscEscape,
    /// Inside `ESC P …`, waiting for `ESC \`.
    DcsBody,
    /// Seen `ESC` inside a DCS body.
    DcsEscape,
}

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// The escape-sequence state machine.
///
/// Feed bytes with [`Lexer::advance`]; completed tokens are handed to the
/// sink callback. State (including a partially accumulated sequence) persists
/// across calls, so input may be fed in arbitrary chunks.
#[derive(Debug, Default)]
pub struct Lexer {
    state: State,
    /// Bytes of the escape sequence being accumulated.
    seq: Vec<u8>,
    /// Bytes of the text run being accumulated.
    run: Vec<u8>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one input byte, emitting any completed token to `sink`.
    pub fn advance(&mut self, byte: u8, sink: &mut dyn FnMut(Token)) {
        match self.state {
            State::Ground => self.advance_ground(byte, sink),
            State::Escape => self.advance_escape(byte, sink),
            State::CharsetPending => {
                self.seq.push(byte);
                let kind = if byte == b'B' { TokenKind::CharsetG0 } else { TokenKind::Discard };
                self.finish(kind, sink);
            }
            State::CsiParams => {
                self.seq.push(byte);
                if byte == b'@' || byte.is_ascii_alphabetic() {
                    self.finish(TokenKind::Csi, sink);
                }
            }
            State::OscBody => {
                self.seq.push(byte);
                match byte {
                    BEL => self.finish(TokenKind::Osc, sink),
                    ESC => self.state = State::OscEscape,
                    _ => {}
                }
            }
            State::OscEscape => {
                self.seq.push(byte);
                if byte == b'\\' {
                    self.finish(TokenKind::Osc, sink);
                } else {
                    // Not a terminator; the ESC belongs to the body.
                    self.state = State::OscBody;
                }
            }
            State::DcsBody => {
                self.seq.push(byte);
                if byte == ESC {
                    self.state = State::DcsEscape;
                }
            }
            State::DcsEscape => {
                self.seq.push(byte);
                if byte == b'\\' {
                    self.finish(TokenKind::Dcs, sink);
                } else {
                    self.state = State::DcsBody;
                }
            }
        }
    }

    /// Flush any pending text run.
    ///
    /// Called at the end of each read chunk to bound latency, and at EOF.
    /// Escape accumulation is untouched — sequences may span chunks.
    pub fn flush_run(&mut self, sink: &mut dyn FnMut(Token)) {
        if !self.run.is_empty() {
            sink(Token::new(TokenKind::Text, std::mem::take(&mut self.run)));
        }
    }

    /// Flush everything at end of input.
    ///
    /// A sequence truncated by EOF is surfaced as `Discard` so the consumed
    /// byte stream stays fully accounted for.
    pub fn finish_input(&mut self, sink: &mut dyn FnMut(Token)) {
        self.flush_run(sink);
        if !self.seq.is_empty() {
            sink(Token::new(TokenKind::Discard, std::mem::take(&mut self.seq)));
        }
        self.state = State::Ground;
    }

    fn advance_ground(&mut self, byte: u8, sink: &mut dyn FnMut(Token)) {
        let single = match byte {
            b'\r' => Some(TokenKind::CarriageReturn),
            b'\n' => Some(TokenKind::LineFeed),
            0x08 => Some(TokenKind::Backspace),
            ESC => None,
            _ => {
                self.run.push(byte);
                return;
            }
        };

        self.flush_run(sink);
        match single {
            Some(kind) => sink(Token::new(kind, vec![byte])),
            None => {
                self.seq.push(byte);
                self.state = State::Escape;
            }
        }
    }

    fn advance_escape(&mut self, byte: u8, sink: &mut dyn FnMut(Token)) {
        self.seq.push(byte);
        match byte {
            b'[' => self.state = State::CsiParams,
            b']' => self.state = State::OscBody,
            b'P' => self.state = State::DcsBody,
            b'(' => self.state = State::CharsetPending,
            b'c' => self.finish(TokenKind::ResetState, sink),
            b'M' => self.finish(TokenKind::ReverseIndex, sink),
            b'=' | b'>' => self.finish(TokenKind::Discard, sink),
            _ => {
                log::debug!("unrecognized escape: {:?}", self.seq);
                self.finish(TokenKind::Discard, sink);
            }
        }
    }

    fn finish(&mut self, kind: TokenKind, sink: &mut dyn FnMut(Token)) {
        sink(Token::new(kind, std::mem::take(&mut self.seq)));
        self.state = State::Ground;
    }
}

/// Spawn the reader task: read `stream` until EOF, lex, and send tokens.
///
/// The channel send blocks when the engine falls behind, which in turn blocks
/// the PTY read — intentional backpressure. Dropping the sender on return
/// closes the channel; the engine treats a closed channel as terminal-exited.
/// A read error other than EOF is fatal for the stream and is returned
/// through the join handle after the channel closes.
pub fn spawn<R>(mut stream: R, tokens: Sender<Token>) -> JoinHandle<io::Result<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("pty-reader".into())
        .spawn(move || {
            let mut lexer = Lexer::new();
            let mut buf = [0u8; READ_CHUNK];
            loop {
                let n = match stream.read(&mut buf) {
                    Ok(0) => {
                        log::info!("pty stream reached eof");
                        let mut send = |t| drop(tokens.send(t));
                        lexer.finish_input(&mut send);
                        return Ok(());
                    }
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        log::error!("pty read failed: {e}");
                        let mut send = |t| drop(tokens.send(t));
                        lexer.finish_input(&mut send);
                        return Err(e);
                    }
                };

                let mut disconnected = false;
                {
                    let mut send = |t| {
                        if tokens.send(t).is_err() {
                            disconnected = true;
                        }
                    };
                    for &byte in &buf[..n] {
                        lexer.advance(byte, &mut send);
                    }
                    lexer.flush_run(&mut send);
                }
                if disconnected {
                    // Engine is gone; nothing left to deliver to.
                    return Ok(());
                }
            }
        })
        .expect("failed to spawn pty reader thread")
}
