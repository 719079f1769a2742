//! Newline line codec for stream transports.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────┬────┐
//! │ message (≤ 1024 B)       │ \n │      (\r directly before \n is dropped)
//! └──────────────────────────┴────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete lines. This
//! handles partial reads: a single read may return part of a
//! line or several lines at once. An over-long line is dropped in full.

use log::warn;

use crate::link::transport::Message;
use crate::protocol::MAX_MESSAGE_LEN;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Collecting bytes of the current line.
    Collecting,
    /// Current line overflowed; skipping until the next newline.
    Discarding,
}

/// Streaming line decoder.
///
/// Carriage returns are held back until a non-terminator byte follows,
/// so any run of `\r` directly before `\n` is stripped and never counts
/// against the line limit.
pub struct LineDecoder {
    state: DecoderState,
    line: Message,
    pending_cr: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            line: Message::new(),
            pending_cr: 0,
        }
    }

    /// Feed bytes into the decoder, calling `on_line` for every complete,
    /// non-empty line in arrival order.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(Message)) {
        for &byte in data {
            match self.state {
                DecoderState::Collecting if byte == LF => {
                    self.pending_cr = 0;
                    if !self.line.is_empty() {
                        on_line(core::mem::take(&mut self.line));
                    }
                }
                DecoderState::Collecting if byte == CR => self.pending_cr += 1,
                DecoderState::Collecting => {
                    // Held-back CRs were interior after all.
                    let held = core::mem::take(&mut self.pending_cr);
                    let fits = (0..held).all(|_| self.line.push(CR).is_ok())
                        && self.line.push(byte).is_ok();
                    if !fits {
                        warn!("Line exceeds {} bytes, dropping", MAX_MESSAGE_LEN);
                        self.line.clear();
                        self.state = DecoderState::Discarding;
                    }
                }
                DecoderState::Discarding if byte == LF => {
                    self.state = DecoderState::Collecting;
                }
                DecoderState::Discarding => {}
            }
        }
    }

    /// Reset decoder state (e.g. after a reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::Collecting;
        self.line.clear();
        self.pending_cr = 0;
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the line terminator to `payload`.
///
/// Returns `None` if the framed line would exceed [`MAX_MESSAGE_LEN`] + 1.
pub fn encode_line(payload: &[u8]) -> Option<heapless::Vec<u8, { MAX_MESSAGE_LEN + 1 }>> {
    let mut out = heapless::Vec::new();
    out.extend_from_slice(payload).ok()?;
    out.push(LF).ok()?;
    Some(out)
}
