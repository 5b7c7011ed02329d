//! Window status bridge library.
//!
//! Keeps the latest reading of every window/room sensor published on MQTT,
//! derives the dashboard status from them, and forwards window control
//! commands from HTTP back onto the bus.

pub mod config;
pub mod control;
pub mod error;
pub mod http;
pub mod input;
pub mod sensors;
pub mod status;
