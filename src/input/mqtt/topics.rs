//! Topic layout under the configured prefix.

use crate::sensors::Channel;

/// Default prefix used by the window controller firmware.
pub const DEFAULT_TOPIC_PREFIX: &str = "mykmou/window25/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    prefix: String,
}

impl Topics {
    /// The prefix is used verbatim, so it normally ends with `/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sensor_topic(&self, channel: Channel) -> String {
        format!("{}sensor/{}", self.prefix, channel.key())
    }

    pub fn sensor_topics(&self) -> Vec<String> {
        Channel::all().map(|c| self.sensor_topic(c)).collect()
    }

    pub fn control_topic(&self) -> String {
        format!("{}control", self.prefix)
    }

    /// Channel key for a sensor topic, or `None` for any other topic.
    pub fn channel_key<'a>(&self, topic: &'a str) -> Option<&'a str> {
        topic
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix("sensor/")
            .filter(|key| !key.is_empty())
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_topics() {
        let topics = Topics::default();
        let all = topics.sensor_topics();

        assert_eq!(all.len(), 9);
        assert_eq!(all[0], "mykmou/window25/sensor/temperature");
        assert!(all.contains(&"mykmou/window25/sensor/window_motor_state".to_string()));
        assert_eq!(topics.control_topic(), "mykmou/window25/control");
    }

    #[test]
    fn test_channel_key_extraction() {
        let topics = Topics::default();

        assert_eq!(
            topics.channel_key("mykmou/window25/sensor/distance"),
            Some("distance")
        );
        assert_eq!(
            topics.channel_key("mykmou/window25/sensor/pressure"),
            Some("pressure")
        );
        assert_eq!(topics.channel_key("mykmou/window25/control"), None);
        assert_eq!(topics.channel_key("other/window25/sensor/distance"), None);
        assert_eq!(topics.channel_key("mykmou/window25/sensor/"), None);
    }

    #[test]
    fn test_custom_prefix() {
        let topics = Topics::new("lab/");
        assert_eq!(topics.sensor_topic(Channel::Danger), "lab/sensor/danger");
        assert_eq!(topics.channel_key("lab/sensor/sound"), Some("sound"));
    }
}
