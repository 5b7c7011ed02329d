//! Allow-list validation and one-way publish of control commands.
//!
//! A command is considered done once the bus client has accepted it for
//! sending. Nothing waits for the actuator to react.

use crate::error::{BridgeError, Result};
use crate::status::Labels;
use log::info;
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, EnumString, IntoStaticStr};

/// Actions the actuator understands. The payload is the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    Open,
    Close,
}

impl ControlAction {
    pub fn payload(self) -> &'static str {
        self.into()
    }
}

/// Outbound side of the bus.
///
/// Implementations must not block on the remote end: returning `Ok` means the
/// message was queued locally, not that anyone received it.
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<()>;
}

/// Successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAccepted {
    pub action: ControlAction,
    pub message: String,
}

/// Validates control actions and forwards them to the control topic.
pub struct CommandGateway {
    publisher: Arc<dyn Publisher>,
    control_topic: String,
    labels: Labels,
}

impl CommandGateway {
    pub fn new(
        publisher: Arc<dyn Publisher>,
        control_topic: impl Into<String>,
        labels: Labels,
    ) -> Self {
        Self {
            publisher,
            control_topic: control_topic.into(),
            labels,
        }
    }

    pub fn control_topic(&self) -> &str {
        &self.control_topic
    }

    /// Submit a raw action string. Only the exact texts `open` and `close` are
    /// accepted; anything else is rejected without publishing.
    pub fn submit(&self, action: &str) -> Result<CommandAccepted> {
        let action = ControlAction::from_str(action)
            .map_err(|_| BridgeError::InvalidCommand(action.to_string()))?;
        self.send(action)
    }

    pub fn send(&self, action: ControlAction) -> Result<CommandAccepted> {
        self.publisher.publish(&self.control_topic, action.payload())?;
        info!("[Control] Sent '{}' to {}", action.payload(), self.control_topic);

        Ok(CommandAccepted {
            action,
            message: self.labels.command_sent(action.payload()),
        })
    }
}
