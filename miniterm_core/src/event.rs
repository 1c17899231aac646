//! Events flowing outward from the terminal state machine.
//!
//! The `EventListener` trait decouples `Term<T>` from the host: tests use
//! `VoidListener`, the real binary routes titles to its front-end and reply
//! bytes to the PTY write-back channel.

/// An effect of token interpretation that the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Window title changed (OSC 0).
    Title(String),
    /// Window title reset to the host default (full terminal reset).
    ResetTitle,
    /// Reply bytes owed to the PTY (DSR, primary DA, color query).
    PtyWrite(Vec<u8>),
}

/// Receives events from `Term<T>`.
///
/// `Send + 'static` because the engine runs on its own thread. The default
/// implementation is a no-op.
pub trait EventListener: Send + 'static {
    fn send_event(&self, _event: Event) {}
}

/// No-op listener for tests and headless use.
pub struct VoidListener;

impl EventListener for VoidListener {}

/// Listener that records events for inspection in tests.
#[cfg(test)]
pub(crate) struct RecordingListener(pub std::sync::Mutex<Vec<Event>>);

#[cfg(test)]
impl RecordingListener {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(Vec::new()))
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut self.0.lock().unwrap())
    }
}

#[cfg(test)]
impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl EventListener for RecordingListener {
    fn send_event(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}
