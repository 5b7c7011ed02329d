//! Sensor ingest: subscribes to the sensor topics and writes every message
//! into the shared [`SensorStore`].

use super::client::{BusEvent, MqttClient, MqttMessage};
use super::topics::Topics;
use crate::sensors::SensorStore;
use log::{debug, info, warn};
use rumqttc::{AsyncClient, QoS, SubscribeFilter};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Buffered bus events between the event loop and the store writer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Aborts the wrapped task when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Routes sensor messages into the store.
///
/// This task is the only writer of the store. Messages are applied in the
/// order the event loop delivers them.
pub struct SensorIngest {
    topics: Topics,
    store: Arc<SensorStore>,
}

impl SensorIngest {
    pub fn new(topics: Topics, store: Arc<SensorStore>) -> Self {
        Self { topics, store }
    }

    /// Start ingesting from the given client.
    ///
    /// Spawns the MQTT event loop and a routing task. Aborting the returned
    /// handle stops both.
    pub fn start(self, mqtt_client: MqttClient) -> JoinHandle<()> {
        let subscribe_client = mqtt_client.client();
        let (event_tx, event_rx) = mpsc::channel::<BusEvent>(EVENT_CHANNEL_CAPACITY);
        let event_loop = AbortOnDrop(tokio::spawn(mqtt_client.run(event_tx)));

        tokio::spawn(async move {
            let _event_loop = event_loop;
            self.run(subscribe_client, event_rx).await;
        })
    }

    async fn run(self, client: AsyncClient, mut event_rx: mpsc::Receiver<BusEvent>) {
        while let Some(event) = event_rx.recv().await {
            match event {
                BusEvent::Connected => self.subscribe_all(&client).await,
                BusEvent::SubAck { pkid, granted } => {
                    self.handle_suback(pkid, &granted);
                }
                BusEvent::Message(msg) => {
                    self.handle_message(&msg);
                }
            }
        }
    }

    /// Request every sensor topic in a single SUBSCRIBE. The broker answers
    /// per topic; see [`SensorIngest::handle_suback`].
    async fn subscribe_all(&self, client: &AsyncClient) {
        let topics = self.topics.sensor_topics();
        let filters = topics
            .iter()
            .map(|topic| SubscribeFilter::new(topic.clone(), QoS::AtMostOnce));

        match client.subscribe_many(filters).await {
            Ok(()) => info!(
                "[MQTT] Requested {} sensor topic(s) under {}",
                topics.len(),
                self.topics.prefix()
            ),
            Err(e) => {
                for topic in &topics {
                    warn!("[MQTT] Failed to subscribe to {}: {:?}", topic, e);
                }
            }
        }
    }

    /// Report the broker's answer to the sensor subscription. A refused topic
    /// only affects its own channel, which then stays absent. Returns the
    /// refused topics.
    pub fn handle_suback(&self, pkid: u16, granted: &[bool]) -> Vec<String> {
        let topics = self.topics.sensor_topics();
        if granted.len() != topics.len() {
            warn!(
                "[MQTT] SubAck {} has {} code(s), expected {}",
                pkid,
                granted.len(),
                topics.len()
            );
        }

        let mut refused = Vec::new();
        let mut subscribed = 0;
        for (topic, ok) in topics.into_iter().zip(granted.iter().copied()) {
            if ok {
                subscribed += 1;
            } else {
                warn!("[MQTT] Broker refused subscription to {}", topic);
                refused.push(topic);
            }
        }

        info!(
            "[MQTT] Subscribed to {} sensor topic(s) under {}",
            subscribed,
            self.topics.prefix()
        );
        refused
    }

    /// Apply one message to the store. Returns false if the topic is not a
    /// sensor topic.
    pub fn handle_message(&self, msg: &MqttMessage) -> bool {
        let Some(key) = self.topics.channel_key(&msg.topic) else {
            debug!("[MQTT] Ignoring message on {}", msg.topic);
            return false;
        };

        self.store.update_key(key, msg.payload.as_str());
        debug!("[MQTT] {} = {}", key, msg.payload);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::Channel;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn message(topic: &str, payload: &str) -> MqttMessage {
        MqttMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        }
    }

    #[test]
    fn test_routes_sensor_messages() {
        let store = Arc::new(SensorStore::new());
        let ingest = SensorIngest::new(Topics::default(), store.clone());

        assert!(ingest.handle_message(&message("mykmou/window25/sensor/temperature", "24.1")));
        assert!(ingest.handle_message(&message("mykmou/window25/sensor/window", "open")));

        assert_eq!(store.get(Channel::Temperature).as_deref(), Some("24.1"));
        assert_eq!(store.get(Channel::Window).as_deref(), Some("open"));
    }

    #[test]
    fn test_ignores_foreign_topics() {
        let store = Arc::new(SensorStore::new());
        let ingest = SensorIngest::new(Topics::default(), store.clone());

        assert!(!ingest.handle_message(&message("mykmou/window25/control", "open")));
        assert!(!ingest.handle_message(&message("home/sensor/temperature", "1")));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_unknown_channel_kept_out_of_readings() {
        let store = Arc::new(SensorStore::new());
        let ingest = SensorIngest::new(Topics::default(), store.clone());

        assert!(ingest.handle_message(&message("mykmou/window25/sensor/co2", "800")));
        assert_eq!(store.get_key("co2").as_deref(), Some("800"));
        assert!(store.readings().is_empty());
    }

    #[test]
    fn test_out_of_order_delivery_keeps_last_applied() {
        let store = Arc::new(SensorStore::new());
        let ingest = SensorIngest::new(Topics::default(), store.clone());

        ingest.handle_message(&message("mykmou/window25/sensor/distance", "30"));
        ingest.handle_message(&message("mykmou/window25/sensor/distance", "80"));
        // A stale reading arriving late still wins
        ingest.handle_message(&message("mykmou/window25/sensor/distance", "30"));

        assert_eq!(store.get(Channel::Distance).as_deref(), Some("30"));
    }

    #[test]
    fn test_suback_all_granted() {
        let ingest = SensorIngest::new(Topics::default(), Arc::new(SensorStore::new()));
        assert!(ingest.handle_suback(1, &[true; 9]).is_empty());
    }

    #[test]
    fn test_suback_reports_refused_topics() {
        let ingest = SensorIngest::new(Topics::default(), Arc::new(SensorStore::new()));
        let mut granted = [true; 9];
        granted[0] = false;
        granted[5] = false;

        let refused = ingest.handle_suback(1, &granted);
        assert_eq!(
            refused,
            vec![
                "mykmou/window25/sensor/temperature".to_string(),
                "mykmou/window25/sensor/distance".to_string(),
            ]
        );
    }

    #[test]
    fn test_suback_all_refused() {
        let ingest = SensorIngest::new(Topics::default(), Arc::new(SensorStore::new()));
        let refused = ingest.handle_suback(1, &[false; 9]);
        assert_eq!(refused, Topics::default().sensor_topics());
    }

    #[test]
    fn test_short_suback_only_reports_listed_codes() {
        let ingest = SensorIngest::new(Topics::default(), Arc::new(SensorStore::new()));
        let refused = ingest.handle_suback(1, &[true, false]);
        assert_eq!(refused, vec!["mykmou/window25/sensor/humidity".to_string()]);
    }

    #[tokio::test]
    async fn test_abort_on_drop_stops_inner_task() {
        let (alive_tx, alive_rx) = oneshot::channel::<()>();
        let inner = tokio::spawn(async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });
        let guard = AbortOnDrop(inner);
        let outer = tokio::spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });

        outer.abort();

        // The sender is dropped once the inner task is gone
        let closed = tokio::time::timeout(Duration::from_secs(1), alive_rx)
            .await
            .expect("inner task still running");
        assert!(closed.is_err());
    }
}
