//! Development tool for watching the sensor bus.
//!
//! Usage:
//!   cargo run --bin bus-monitor
//!   cargo run --bin bus-monitor -- --send open
//!
//! Connects to the MQTT broker, subscribes to the sensor topics, and logs
//! the computed status snapshot at a fixed interval. Optionally sends one
//! control command after connecting.

use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use window_status_bridge::config::{self, Config};
use window_status_bridge::control::{CommandGateway, ControlAction};
use window_status_bridge::input::mqtt::{MqttClient, SensorIngest, Topics};
use window_status_bridge::sensors::SensorStore;
use window_status_bridge::status::{Labels, Locale, compute_snapshot};

#[derive(Parser)]
#[command(name = "bus-monitor")]
#[command(about = "Log window sensor status from the MQTT bus")]
struct Cli {
    /// MQTT broker host (defaults to MQTT_BROKER_HOST or the public broker)
    #[arg(long)]
    host: Option<String>,

    /// Topic prefix
    #[arg(long, env = "MQTT_TOPIC_PREFIX")]
    prefix: Option<String>,

    /// Seconds between status reports
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Label language (en or ko)
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Send a control command once connected
    #[arg(long, value_parser = parse_action)]
    send: Option<ControlAction>,
}

fn parse_action(s: &str) -> Result<ControlAction, String> {
    s.parse()
        .map_err(|_| format!("unknown action '{}', expected open or close", s))
}

#[tokio::main]
async fn main() {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.mqtt.broker_host = host;
    }
    if let Some(prefix) = cli.prefix {
        config.mqtt.topic_prefix = prefix;
    }

    info!(
        "Connecting to MQTT broker at {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );

    let labels = Labels::for_locale(cli.locale);
    let topics = Topics::new(config.mqtt.topic_prefix.clone());
    let store = Arc::new(SensorStore::new());

    let mqtt_client = MqttClient::new(&config.mqtt);
    let gateway = CommandGateway::new(
        Arc::new(mqtt_client.publisher()),
        topics.control_topic(),
        labels,
    );
    let ingest_handle = SensorIngest::new(topics, store.clone()).start(mqtt_client);

    if let Some(action) = cli.send {
        // Wait a moment for connection
        tokio::time::sleep(Duration::from_secs(2)).await;
        match gateway.send(action) {
            Ok(accepted) => info!(">>> {}", accepted.message),
            Err(e) => warn!("Failed to send {:?}: {}", action, e),
        }
    }

    let mut interval = tokio::time::interval(Duration::from_secs(cli.interval.max(1)));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let snapshot = compute_snapshot(&store.readings(), &labels);
                match serde_json::to_string(&snapshot) {
                    Ok(json) => info!("[v{}] {}", store.version(), json),
                    Err(e) => warn!("Failed to serialize snapshot: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    ingest_handle.abort();
}
