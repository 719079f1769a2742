//! Session loop.
//!
//! A single cooperative task that owns the device identity and walks the
//! link through its lifecycle:
//!
//! ```text
//!  wait Connected ──▶ send greeting ──▶ wait echo ──▶ dispatch loop ──▶ Closed
//!        │                                  │               │
//!        └────────── Closed ────────────────┴───────────────┘
//! ```
//!
//! Exactly one message is in flight at a time: the next event is not
//! awaited until the current request has been dispatched, its reply (if
//! any) sent, and its tokens dropped. Requests are therefore handled
//! strictly in arrival order.

use log::{debug, info, warn};

use crate::app::dispatcher::{Dispatcher, Outcome};
use crate::app::events::AppEvent;
use crate::app::identity::Identity;
use crate::app::ports::{EventSink, GpioPort, I2cPort, StoragePort};
use crate::error::{Error, Result};
use crate::protocol::command::Pin;

use super::handshake::{Handshake, HandshakeState};
use super::transport::{CloseReason, Transport, TransportEvent};

/// Protocol session over one transport connection.
pub struct Session {
    dispatcher: Dispatcher,
    identity: Identity,
    running: bool,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, identity: Identity) -> Self {
        Self {
            dispatcher,
            identity,
            running: false,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// `true` between a successful handshake and the end of the link.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drive one connection from bring-up to teardown.
    ///
    /// Returns the close reason when the transport goes away, or an error
    /// if the transport fails or the handshake is rejected. Either way the
    /// session is no longer running afterwards; the identity survives for
    /// the next call.
    pub async fn run(
        &mut self,
        transport: &mut impl Transport,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Result<CloseReason> {
        let result = self.drive(transport, hw, storage, sink).await;
        self.running = false;
        if let Err(e) = &result {
            warn!("Session ended: {}", e);
        }
        result
    }

    async fn drive(
        &mut self,
        transport: &mut impl Transport,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Result<CloseReason> {
        set_status_leds(hw, true);

        // ── 1. Wait for the link ──────────────────────────────
        info!("Creating connection...");
        loop {
            match transport.next_event().await? {
                TransportEvent::Connected => break,
                TransportEvent::Message(_) => debug!("Not connected yet, dropping message"),
                TransportEvent::Closed(reason) => return Ok(self.closed(reason, sink)),
            }
        }
        sink.emit(&AppEvent::Connected);

        // ── 2. Handshake ──────────────────────────────────────
        let mut handshake = Handshake::new(self.dispatcher.variant(), self.identity.name());
        info!("Sending \"{}\"", handshake.greeting());
        transport.send(handshake.greeting().as_bytes()).await?;

        info!("Wait for the server to reply \"{}\"", handshake.expected_echo());
        loop {
            match transport.next_event().await? {
                TransportEvent::Message(message) => match handshake.on_message(&message) {
                    HandshakeState::Running => break,
                    HandshakeState::AwaitingEcho => {}
                    HandshakeState::Rejected => return Err(Error::HandshakeRejected),
                },
                TransportEvent::Connected => {}
                TransportEvent::Closed(reason) => return Ok(self.closed(reason, sink)),
            }
        }

        // Ready for normal operations.
        self.running = true;
        set_status_leds(hw, false);
        sink.emit(&AppEvent::Running);

        // ── 3. Dispatch ───────────────────────────────────────
        loop {
            match transport.next_event().await? {
                TransportEvent::Message(message) => {
                    self.handle(&message, transport, hw, storage, sink).await?;
                }
                TransportEvent::Connected => debug!("Duplicate connected event ignored"),
                TransportEvent::Closed(reason) => return Ok(self.closed(reason, sink)),
            }
        }
    }

    /// Dispatch one message. Only transport failures propagate.
    async fn handle(
        &mut self,
        message: &[u8],
        transport: &mut impl Transport,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match self
            .dispatcher
            .dispatch_message(message, &mut self.identity, hw, storage)
        {
            Ok(Outcome::Reply(payload)) => {
                transport.send(payload.as_bytes()).await?;
                sink.emit(&AppEvent::Replied(payload));
            }
            Ok(Outcome::Executed(action)) => sink.emit(&AppEvent::Executed(action)),
            Ok(Outcome::Renamed { from, to }) => sink.emit(&AppEvent::Renamed { from, to }),
            Ok(Outcome::Ignored) => sink.emit(&AppEvent::Ignored),
            Ok(Outcome::Discarded) => sink.emit(&AppEvent::Discarded),
            Err(e) => {
                warn!("Error, {}", e);
                sink.emit(&AppEvent::Rejected(e));
            }
        }
        Ok(())
    }

    fn closed(&mut self, reason: CloseReason, sink: &mut impl EventSink) -> CloseReason {
        info!("Connection {}", reason);
        self.running = false;
        sink.emit(&AppEvent::Closed(reason));
        reason
    }
}

/// LED1 and LED2 stay lit while the link is being brought up.
fn set_status_leds(hw: &mut impl GpioPort, on: bool) {
    for pin in [Pin::Led1, Pin::Led2] {
        if let Err(e) = hw.set(pin, on) {
            warn!("Status LED {}: {}", pin, e);
        }
    }
}
