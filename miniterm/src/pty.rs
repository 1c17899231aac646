//! PTY spawn: open a pseudoterminal pair and start the shell on its slave
//! side.

use std::io::{self, Read, Write};

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

/// A running shell behind a PTY.
///
/// The master handle must stay alive as long as the reader and writer are in
/// use, so it travels with them.
pub struct ShellPty {
    pub reader: Box<dyn Read + Send>,
    pub writer: Box<dyn Write + Send>,
    pub child: Box<dyn Child + Send + Sync>,
    _master: Box<dyn MasterPty + Send>,
}

/// Spawn `shell` (or the platform default) on a new PTY of the given size.
pub fn spawn_shell(shell: Option<&str>, rows: u16, cols: u16) -> io::Result<ShellPty> {
    let pty_system = native_pty_system();

    let pair = pty_system
        .openpty(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
        .map_err(io::Error::other)?;

    let mut cmd = match shell {
        Some(program) => CommandBuilder::new(program),
        None => CommandBuilder::new_default_prog(),
    };
    cmd.env("TERM", "xterm");

    let child = pair.slave.spawn_command(cmd).map_err(io::Error::other)?;
    // Drop the slave so the reader sees EOF when the shell exits.
    drop(pair.slave);

    let reader = pair.master.try_clone_reader().map_err(io::Error::other)?;
    let writer = pair.master.take_writer().map_err(io::Error::other)?;

    log::info!("spawned shell on a {cols}x{rows} pty");

    Ok(ShellPty { reader, writer, child, _master: pair.master })
}
