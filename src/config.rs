use crate::input::mqtt::DEFAULT_TOPIC_PREFIX;
use crate::status::Locale;
use log::warn;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: Called from main before the async runtime starts any threads
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Find the first '=' and split there
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let mut value = value.trim();

            // Remove surrounding quotes if present
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            if !key.is_empty() {
                pairs.push((key, value));
            }
        }
    }

    pairs
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpConfig,
    pub mqtt: MqttConfig,
    pub locale: Locale,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl HttpConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic_prefix: String,
}

/// Public brokers drop the older session on a client ID clash, so each
/// process gets its own.
fn random_client_id() -> String {
    format!("window-status-bridge-{:08x}", rand::random::<u32>())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig {
                bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 3000,
            },
            mqtt: MqttConfig {
                broker_host: "broker.hivemq.com".to_string(),
                broker_port: 1883,
                client_id: random_client_id(),
                username: None,
                password: None,
                topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            },
            locale: Locale::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Values that fail to parse
    /// keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // HTTP configuration
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(p) => config.http.port = p,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(addr) = lookup("HTTP_BIND_ADDR") {
            match addr.parse() {
                Ok(a) => config.http.bind_addr = a,
                Err(_) => warn!("Ignoring invalid HTTP_BIND_ADDR value: {}", addr),
            }
        }

        // MQTT configuration
        if let Some(host) = lookup("MQTT_BROKER_HOST") {
            config.mqtt.broker_host = host;
        }
        if let Some(port) = lookup("MQTT_BROKER_PORT") {
            match port.parse() {
                Ok(p) => config.mqtt.broker_port = p,
                Err(_) => warn!("Ignoring invalid MQTT_BROKER_PORT value: {}", port),
            }
        }
        if let Some(client_id) = lookup("MQTT_CLIENT_ID") {
            config.mqtt.client_id = client_id;
        }
        if let Some(username) = lookup("MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }
        if let Some(password) = lookup("MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }
        if let Some(prefix) = lookup("MQTT_TOPIC_PREFIX") {
            config.mqtt.topic_prefix = prefix;
        }

        if let Some(locale) = lookup("STATUS_LOCALE") {
            match locale.parse() {
                Ok(l) => config.locale = l,
                Err(_) => warn!("Ignoring unknown STATUS_LOCALE: {}", locale),
            }
        }

        config
    }
}
