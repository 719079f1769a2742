//! Channel transport.
//!
//! Lets an I/O task that owns the real link (or a test) feed the session
//! through `embassy-sync` bounded channels, without heap allocation:
//!
//! ```text
//! ┌──────────────┐ TransportEvent ┌──────────────┐
//! │   I/O Task   │──────────────▶│   Session    │
//! │              │◀──────────────│              │
//! └──────────────┘    Message     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::link::transport::{Message, Transport, TransportError, TransportEvent};

/// The pair of channels between an I/O task and the session.
///
/// Usually placed in a `static` so both sides can borrow it.
pub struct LinkChannels<M: RawMutex, const N: usize> {
    inbound: Channel<M, TransportEvent, N>,
    outbound: Channel<M, Message, N>,
}

impl<M: RawMutex, const N: usize> LinkChannels<M, N> {
    pub const fn new() -> Self {
        Self {
            inbound: Channel::new(),
            outbound: Channel::new(),
        }
    }

    /// Session side of the link.
    pub fn transport(&self) -> ChannelTransport<'_, M, N> {
        ChannelTransport { channels: self }
    }

    /// Queue an event for the session, waiting for room.
    pub async fn deliver(&self, event: TransportEvent) {
        self.inbound.send(event).await;
    }

    /// Queue an event for the session. Hands the event back if the queue is full.
    pub fn try_deliver(&self, event: TransportEvent) -> Result<(), TransportEvent> {
        self.inbound
            .try_send(event)
            .map_err(|e| match e {
                TrySendError::Full(event) => event,
            })
    }

    /// Wait for the next message the session sent.
    pub async fn take_outbound(&self) -> Message {
        self.outbound.receive().await
    }

    pub fn try_take_outbound(&self) -> Option<Message> {
        self.outbound.try_receive().ok()
    }
}

impl<M: RawMutex, const N: usize> Default for LinkChannels<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Transport`] backed by a borrowed [`LinkChannels`].
pub struct ChannelTransport<'a, M: RawMutex, const N: usize> {
    channels: &'a LinkChannels<M, N>,
}

impl<M: RawMutex, const N: usize> Transport for ChannelTransport<'_, M, N> {
    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        Ok(self.channels.inbound.receive().await)
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let message = Message::from_slice(data).map_err(|_| TransportError::MessageTooLarge)?;
        self.channels.outbound.send(message).await;
        Ok(())
    }
}
