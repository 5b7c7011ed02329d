use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum BridgeError {
    #[error("Invalid control command: {0:?}")]
    InvalidCommand(String),

    #[error("Failed to enqueue MQTT publish: {0}")]
    Publish(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<rumqttc::ClientError> for BridgeError {
    fn from(e: rumqttc::ClientError) -> Self {
        BridgeError::Publish(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
