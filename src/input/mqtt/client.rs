//! MQTT client wrapper for the sensor bus.

use crate::config::MqttConfig;
use crate::control::Publisher;
use crate::error::Result;
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeReasonCode};
use std::time::Duration;
use tokio::sync::mpsc;

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Message received from MQTT broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
}

/// Events forwarded from the MQTT event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// The broker acknowledged a (re)connection. Subscriptions must be
    /// issued again after this, the session is not persistent.
    Connected,
    /// Broker answer to a SUBSCRIBE, one entry per requested filter in
    /// request order. `false` means the broker refused that filter.
    SubAck { pkid: u16, granted: Vec<bool> },
    Message(MqttMessage),
}

/// Per-filter outcome of a SUBACK.
pub fn granted_codes(codes: &[SubscribeReasonCode]) -> Vec<bool> {
    codes
        .iter()
        .map(|code| matches!(code, SubscribeReasonCode::Success(_)))
        .collect()
}

/// MQTT client for the sensor bus.
pub struct MqttClient {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttClient {
    /// Create a new MQTT client from configuration.
    pub fn new(config: &MqttConfig) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(30));

        // Set credentials if provided
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(options, 100);

        Self { client, event_loop }
    }

    /// Run the MQTT event loop and forward events to the provided channel.
    ///
    /// This method runs until the receiving side is dropped. Connection
    /// errors are logged and the loop polls again after a short delay, which
    /// makes rumqttc reconnect.
    pub async fn run(mut self, tx: mpsc::Sender<BusEvent>) {
        info!("[MQTT] Starting event loop");

        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("[MQTT] Connected to broker");
                    if tx.send(BusEvent::Connected).await.is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    debug!("[MQTT] SubAck {}: {:?}", ack.pkid, ack.return_codes);
                    let event = BusEvent::SubAck {
                        pkid: ack.pkid,
                        granted: granted_codes(&ack.return_codes),
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let topic = publish.topic.clone();
                    let payload = match String::from_utf8(publish.payload.to_vec()) {
                        Ok(s) => s,
                        Err(e) => {
                            warn!("[MQTT] Invalid UTF-8 in payload on {}: {}", topic, e);
                            continue;
                        }
                    };

                    debug!("[MQTT] Received on {}: {}", topic, payload);

                    let msg = MqttMessage { topic, payload };
                    if tx.send(BusEvent::Message(msg)).await.is_err() {
                        error!("[MQTT] Message channel closed");
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("[MQTT] Connection error: {:?}", e);
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }

    /// Get a clone of the async client for publishing from other tasks.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Publisher handle for the command gateway.
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher::new(self.client())
    }
}

/// Fire-and-forget publisher on top of [`AsyncClient`].
///
/// Uses `try_publish`, so a publish never waits on the event loop and no
/// acknowledgment is requested (QoS 0).
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl Publisher for MqttPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        debug!("[MQTT] Publishing to {}: {}", topic, payload);
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_codes() {
        let codes = [
            SubscribeReasonCode::Success(QoS::AtMostOnce),
            SubscribeReasonCode::Failure,
            SubscribeReasonCode::Success(QoS::AtLeastOnce),
        ];
        assert_eq!(granted_codes(&codes), vec![true, false, true]);
        assert!(granted_codes(&[]).is_empty());
    }
}
