//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing session events to the logger
//! (UART / USB-CDC in production, stderr on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Connected => info!("LINK | connected"),
            AppEvent::Running => info!("LINK | running"),
            AppEvent::Executed(action) => debug!("EXEC | {:?}", action),
            AppEvent::Replied(payload) => debug!("REPLY | {}", payload),
            AppEvent::Ignored => debug!("EXEC | no action defined"),
            AppEvent::Discarded => debug!("EXEC | not addressed to us"),
            AppEvent::Rejected(e) => warn!("EXEC | rejected: {}", e),
            AppEvent::Renamed { from, to } => info!("NAME | {} -> {}", from, to),
            AppEvent::Closed(reason) => info!("LINK | {}", reason),
        }
    }
}
