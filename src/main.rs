use log::{error, info};
use std::sync::Arc;
use tokio::signal;
use window_status_bridge::config::{self, Config};
use window_status_bridge::control::CommandGateway;
use window_status_bridge::http::{self, AppState};
use window_status_bridge::input::mqtt::{MqttClient, SensorIngest, Topics};
use window_status_bridge::sensors::SensorStore;
use window_status_bridge::status::Labels;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    config::load_dotenv();
    init_logger();
    info!("Starting Window Status Bridge");

    let config = Config::from_env();
    info!("Configuration loaded:");
    info!(
        "  MQTT broker: {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );
    info!("  MQTT client ID: {}", config.mqtt.client_id);
    info!("  Topic prefix: {}", config.mqtt.topic_prefix);
    info!("  HTTP address: {}", config.http.socket_addr());
    info!("  Locale: {}", config.locale);

    let labels = Labels::for_locale(config.locale);
    let topics = Topics::new(config.mqtt.topic_prefix.clone());
    let store = Arc::new(SensorStore::new());

    let mqtt_client = MqttClient::new(&config.mqtt);
    let gateway = Arc::new(CommandGateway::new(
        Arc::new(mqtt_client.publisher()),
        topics.control_topic(),
        labels,
    ));

    let ingest_task = SensorIngest::new(topics, store.clone()).start(mqtt_client);

    let state = AppState {
        store,
        gateway,
        labels,
    };

    let result = http::serve(config.http.socket_addr(), state, shutdown_signal()).await;

    ingest_task.abort();

    match result {
        Ok(()) => info!("Window Status Bridge stopped"),
        Err(e) => {
            error!("HTTP server error: {}", e);
            std::process::exit(1);
        }
    }
}
