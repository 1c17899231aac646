//! Binary entry point: spawn a shell behind a PTY and run the engine against
//! the hosting terminal.
//!
//! Thread layout: the reader/lexer thread produces tokens, the main thread
//! runs the engine, a writer thread owns the PTY writer and merges keyboard
//! input with engine replies, and a relay thread forwards stdin.

mod config;
mod frontend;
mod pty;

use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use portable_pty::Child as _;

use miniterm_core::event::{Event, EventListener};
use miniterm_core::lexer::{self, TOKEN_CHANNEL_DEPTH};
use miniterm_core::{Engine, Term};

use config::Config;
use frontend::{HostUi, SharedUi};

/// Reply channel depth. Overflow drops the oldest reply; the shell will
/// re-query.
const REPLY_CHANNEL_DEPTH: usize = 16;

/// Keyboard channel depth. Senders block instead of dropping keystrokes.
const INPUT_CHANNEL_DEPTH: usize = 128;

const DEFAULT_TITLE: &str = "miniterm";

/// Routes terminal events to the PTY write-back channel and the front-end.
struct HostLink {
    replies: Sender<Vec<u8>>,
    /// Second handle on the reply queue, used to discard the oldest entry
    /// when the channel overflows.
    overflow: Receiver<Vec<u8>>,
    ui: SharedUi,
}

impl EventListener for HostLink {
    fn send_event(&self, event: Event) {
        match event {
            Event::PtyWrite(bytes) => {
                let mut pending = bytes;
                loop {
                    match self.replies.try_send(pending) {
                        Ok(()) => break,
                        Err(TrySendError::Full(rejected)) => {
                            log::debug!("reply channel full; dropping oldest");
                            let _ = self.overflow.try_recv();
                            pending = rejected;
                        }
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
            }
            Event::Title(title) => self.ui.set_title(&title),
            Event::ResetTitle => self.ui.set_title(DEFAULT_TITLE),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let config = Config::load();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("miniterm: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> io::Result<()> {
    let shell = pty::spawn_shell(
        config.terminal.shell.as_deref(),
        config.terminal.rows.max(1),
        config.terminal.cols.max(1),
    )?;

    // Reader -> engine.
    let (token_tx, token_rx) = bounded(TOKEN_CHANNEL_DEPTH);
    let reader = lexer::spawn(shell.reader, token_tx);

    // Engine replies and keyboard input -> PTY.
    let (reply_tx, reply_rx) = bounded::<Vec<u8>>(REPLY_CHANNEL_DEPTH);
    let (input_tx, input_rx) = bounded::<Vec<u8>>(INPUT_CHANNEL_DEPTH);
    let writer = spawn_pty_writer(shell.writer, input_rx, reply_rx.clone());
    spawn_stdin_relay(input_tx);

    let ui = SharedUi::new(HostUi::stdout(config.foreground(), config.background()));
    ui.set_title(DEFAULT_TITLE);

    let listener = HostLink { replies: reply_tx, overflow: reply_rx, ui: ui.clone() };
    let term = Term::new(
        config.terminal.rows.max(1) as usize,
        config.terminal.cols.max(1) as usize,
        listener,
    );

    // The engine owns the main thread until the shell exits.
    let engine = Engine::new(term, ui.clone(), token_rx, config.engine_config());
    let _term = engine.run();

    ui.restore();

    let mut child = shell.child;
    match child.wait() {
        Ok(status) => log::info!("shell exited with code {}", status.exit_code()),
        Err(e) => log::warn!("could not reap shell: {e}"),
    }

    drop(writer);
    match reader.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(io::Error::other("pty reader thread panicked")),
    }
}

/// The single owner of the PTY writer: merges keyboard input with engine
/// replies. Write errors mean the shell is gone; they are logged and end the
/// thread.
fn spawn_pty_writer(
    mut writer: Box<dyn Write + Send>,
    input: Receiver<Vec<u8>>,
    replies: Receiver<Vec<u8>>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("pty-writer".into())
        .spawn(move || {
            loop {
                let bytes = crossbeam_channel::select! {
                    recv(input) -> msg => match msg {
                        Ok(bytes) => bytes,
                        Err(_) => return,
                    },
                    recv(replies) -> msg => match msg {
                        Ok(bytes) => bytes,
                        Err(_) => return,
                    },
                };
                if let Err(e) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
                    log::warn!("pty write failed: {e}");
                    return;
                }
            }
        })
        .expect("failed to spawn pty writer thread")
}

/// Forward the hosting terminal's stdin to the shell, byte for byte.
fn spawn_stdin_relay(input: Sender<Vec<u8>>) {
    let _ = thread::Builder::new().name("stdin-relay".into()).spawn(move || {
        let mut stdin = io::stdin();
        let mut buf = [0u8; 1024];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    if input.send(buf[..n].to_vec()).is_err() {
                        return;
                    }
                }
            }
        }
    });
}
