//! Clicker link firmware library.
//!
//! A small command/response protocol that lets a remote server drive the
//! I2C bus and two GPIO lines of a wireless node over UDP or TCP.
//!
//! Exposes the pure-logic modules for integration testing and fuzzing.
//! ESP-IDF specific code is guarded by the `espidf` feature within each
//! module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod protocol;

pub use error::{Error, Result};
