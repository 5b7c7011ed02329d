//! Snapshot computation.
//!
//! Every rule here is total: a missing or malformed reading maps to a default,
//! never to an error.

use super::Labels;
use crate::sensors::{Channel, Readings};
use serde::Serialize;

/// Rendered in place of passthrough values that were never received.
pub const PLACEHOLDER: &str = "--";

/// Anything closer than this counts as motion (centimetres).
pub const DISTANCE_THRESHOLD_CM: f64 = 50.0;

/// Typed view of the readings after applying the detection rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorStatus {
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub distance: Option<String>,
    pub window_motor_state: Option<String>,
    pub vibration: bool,
    pub sound: bool,
    /// Parsed distance, `0.0` when absent or unparseable.
    pub distance_cm: f64,
    pub distance_motion: bool,
    /// vibration OR sound OR distance_motion
    pub motion: bool,
    pub window_open: bool,
    pub danger: bool,
}

impl SensorStatus {
    pub fn from_readings(readings: &Readings) -> Self {
        let vibration = is_flag_set(readings.get(Channel::Vibration));
        let sound = is_flag_set(readings.get(Channel::Sound));
        let distance_cm = parse_distance(readings.get(Channel::Distance));
        let distance_motion = distance_cm < DISTANCE_THRESHOLD_CM;

        Self {
            temperature: passthrough(readings.get(Channel::Temperature)),
            humidity: passthrough(readings.get(Channel::Humidity)),
            distance: passthrough(readings.get(Channel::Distance)),
            window_motor_state: passthrough(readings.get(Channel::WindowMotorState)),
            vibration,
            sound,
            distance_cm,
            distance_motion,
            motion: vibration || sound || distance_motion,
            window_open: readings.get(Channel::Window) == Some("open"),
            danger: readings.get(Channel::Danger) == Some("true"),
        }
    }

    pub fn render(&self, labels: &Labels) -> StatusSnapshot {
        let text = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        StatusSnapshot {
            temperature: text(&self.temperature),
            humidity: text(&self.humidity),
            motion: labels.detection(self.motion).to_string(),
            window: labels.window(self.window_open).to_string(),
            sound: labels.detection(self.sound).to_string(),
            distance: text(&self.distance),
            vibration: labels.detection(self.vibration).to_string(),
            window_motor_state: text(&self.window_motor_state),
            danger: labels.hazard(self.danger).to_string(),
        }
    }
}

/// Presentation-ready status, serialized as the `/api/status` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub temperature: String,
    pub humidity: String,
    pub motion: String,
    pub window: String,
    pub sound: String,
    pub distance: String,
    pub vibration: String,
    pub window_motor_state: String,
    pub danger: String,
}

impl StatusSnapshot {
    /// Rendered value for a channel.
    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Motion => &self.motion,
            Channel::Window => &self.window,
            Channel::Sound => &self.sound,
            Channel::Distance => &self.distance,
            Channel::Vibration => &self.vibration,
            Channel::WindowMotorState => &self.window_motor_state,
            Channel::Danger => &self.danger,
        }
    }
}

pub fn compute_snapshot(readings: &Readings, labels: &Labels) -> StatusSnapshot {
    SensorStatus::from_readings(readings).render(labels)
}

/// Empty text is treated like a missing reading.
fn passthrough(raw: Option<&str>) -> Option<String> {
    raw.filter(|value| !value.is_empty()).map(str::to_string)
}

/// Only the exact text `"1"` counts.
fn is_flag_set(raw: Option<&str>) -> bool {
    raw == Some("1")
}

fn parse_distance(raw: Option<&str>) -> f64 {
    raw.and_then(|value| leading_number(value.trim_start())).unwrap_or(0.0)
}

/// Longest leading decimal number, so a unit suffix is ignored: `"60cm"`
/// reads as 60. `None` when the text does not start with a number.
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}
