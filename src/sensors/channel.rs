//! The fixed set of sensor channels published under `sensor/<channel>`.

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A sensor channel. The wire name is the snake_case variant name, which is
/// both the MQTT topic suffix and the key in the status JSON.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Channel {
    Temperature,
    Humidity,
    Motion,
    Window,
    Sound,
    Distance,
    Vibration,
    WindowMotorState,
    Danger,
}

impl Channel {
    /// All channels in status-report order.
    pub fn all() -> impl Iterator<Item = Channel> {
        Channel::iter()
    }

    /// Parse a topic suffix. Matching is exact; `"Temperature"` is not a channel.
    pub fn from_key(key: &str) -> Option<Channel> {
        key.parse().ok()
    }

    /// Wire name, e.g. `window_motor_state`.
    pub fn key(self) -> &'static str {
        self.into()
    }
}
