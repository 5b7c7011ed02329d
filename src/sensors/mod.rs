//! Sensor state shared between the MQTT ingest task and the HTTP API.
//!
//! The bus writes raw text readings into a [`SensorStore`]; the status
//! endpoint takes [`Readings`] copies from it and derives the snapshot.

pub mod channel;
pub mod store;

pub use channel::Channel;
pub use store::{Readings, SensorStore};
