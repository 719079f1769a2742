//! Outbound application events.
//!
//! The session emits these through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide what to do with them (log to
//! serial, count them, forward them elsewhere).

use crate::link::transport::CloseReason;
use crate::protocol::name::DeviceName;

use super::actions::Action;
use super::dispatcher::DispatchError;

/// Structured events emitted by the session.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The transport reported the link up; the greeting is going out.
    Connected,

    /// The handshake echo arrived; requests are now dispatched.
    Running,

    /// A request was carried out.
    Executed(Action),

    /// A read completed and its reply was sent.
    Replied(String),

    /// A well-formed request with no defined action.
    Ignored,

    /// A request addressed to another device was dropped.
    Discarded,

    /// A request failed and was dropped.
    Rejected(DispatchError),

    /// The device name changed.
    Renamed { from: DeviceName, to: DeviceName },

    /// The transport went away; the session is over.
    Closed(CloseReason),
}
