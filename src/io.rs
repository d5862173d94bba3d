//! Output capture and interactive input plumbing.
//!
//! The sink and bridge sit between the embedded engine and the caller: the
//! engine pushes categorized output fragments into the sink and reads input
//! one character at a time through the bridge, while the dispatcher drains
//! the sink after each form and the caller supplies whole lines on demand.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Channels routed to the sink; writes on any other channel are dropped.
const DISPLAY_CHANNELS: [&str; 3] = ["stdout", "stderr", "stdwrn"];

/// Buffering collector for engine-emitted output.
///
/// Handles are cheap clones sharing one buffer: the session keeps one to
/// drain, the engine glue keeps another to write. Dispatch is strictly
/// sequential, so writes never interleave with a drain.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    buffer: Rc<RefCell<String>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `channel` is one of the displayable channels.
    pub fn accepts(channel: &str) -> bool {
        DISPLAY_CHANNELS.contains(&channel)
    }

    /// Append `text` if `channel` is displayable; no-op otherwise.
    pub fn write(&self, channel: &str, text: &str) {
        if !Self::accepts(channel) {
            return;
        }
        self.buffer.borrow_mut().push_str(text);
    }

    /// Return everything captured so far and clear the buffer.
    pub fn drain(&self) -> String {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}

/// Caller-provided line input: the front-end's blocking stdin request.
pub trait LineSource {
    fn read_line(&mut self) -> String;
}

impl<F: FnMut() -> String> LineSource for F {
    fn read_line(&mut self) -> String {
        self()
    }
}

/// Serves characters one at a time from lines pulled on demand.
///
/// The engine's input protocol is character-oriented while the caller hands
/// over whole lines. A line is requested lazily on the first read after
/// exhaustion; once its characters are spent, one `'\n'` is returned and the
/// buffer cleared so the next read requests a fresh line.
pub struct InputBridge {
    source: Box<dyn LineSource>,
    pending: Option<VecDeque<char>>,
}

impl InputBridge {
    pub fn new(source: Box<dyn LineSource>) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    /// Next input character, line-terminated with `'\n'`.
    pub fn read_char(&mut self) -> char {
        if self.pending.is_none() {
            let line = self.source.read_line();
            self.pending = Some(line.chars().collect());
        }
        if let Some(queue) = self.pending.as_mut() {
            if let Some(c) = queue.pop_front() {
                return c;
            }
        }
        self.pending = None;
        '\n'
    }
}
