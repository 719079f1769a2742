//! Transport-agnostic link layer.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Link Stack                          │
//! │                                                            │
//! │  ┌───────────┐   ┌────────────┐   ┌─────────────────────┐  │
//! │  │ Transport │──▶│ Handshake  │──▶│ Session (dispatch)  │  │
//! │  │ (trait)   │   │ (greeting) │   │  → Dispatcher       │  │
//! │  └───────────┘   └────────────┘   └─────────────────────┘  │
//! │       ▲                                    │               │
//! │       └──────────── read replies ──────────┘               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod handshake;
pub mod session;
pub mod transport;
