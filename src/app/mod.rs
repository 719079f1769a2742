//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the remote-control protocol: request
//! dispatch, peripheral actions and the persisted device identity. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod actions;
pub mod dispatcher;
pub mod events;
pub mod identity;
pub mod ports;
