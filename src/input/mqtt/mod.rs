//! MQTT input source for the window controller's sensor topics.
//!
//! This module provides the MQTT client wrapper, the topic layout, and the
//! ingest task that writes sensor messages into the shared store.

mod client;
mod ingest;
mod topics;

pub use client::{BusEvent, MqttClient, MqttMessage, MqttPublisher, granted_codes};
pub use ingest::SensorIngest;
pub use topics::{DEFAULT_TOPIC_PREFIX, Topics};
