//! Human-readable labels used by the status and control endpoints.

use strum::{Display, EnumString};

/// Language of the rendered labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

/// Fixed label set for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub detected: &'static str,
    pub none: &'static str,
    pub open: &'static str,
    pub closed: &'static str,
    pub danger: &'static str,
    pub safe: &'static str,
    pub invalid_command: &'static str,
    pub publish_failed: &'static str,
    locale: Locale,
}

impl Labels {
    pub const EN: Labels = Labels {
        detected: "detected",
        none: "none",
        open: "open",
        closed: "closed",
        danger: "danger",
        safe: "safe",
        invalid_command: "invalid command",
        publish_failed: "command could not be sent",
        locale: Locale::En,
    };

    pub const KO: Labels = Labels {
        detected: "감지됨",
        none: "없음",
        open: "열림",
        closed: "닫힘",
        danger: "위험",
        safe: "안전",
        invalid_command: "잘못된 명령어입니다.",
        publish_failed: "명령을 전송하지 못했습니다.",
        locale: Locale::Ko,
    };

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::EN,
            Locale::Ko => Self::KO,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Confirmation returned after a control command was handed to the bus.
    pub fn command_sent(&self, action: &str) -> String {
        match self.locale {
            Locale::En => format!("command '{}' sent", action),
            Locale::Ko => format!("명령 '{}' 전송 완료", action),
        }
    }

    pub fn detection(&self, detected: bool) -> &'static str {
        if detected { self.detected } else { self.none }
    }

    pub fn window(&self, open: bool) -> &'static str {
        if open { self.open } else { self.closed }
    }

    pub fn hazard(&self, danger: bool) -> &'static str {
        if danger { self.danger } else { self.safe }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::EN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("KO".parse::<Locale>().unwrap(), Locale::Ko);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_for_locale() {
        assert_eq!(Labels::for_locale(Locale::En), Labels::EN);
        assert_eq!(Labels::for_locale(Locale::Ko).locale(), Locale::Ko);
    }

    #[test]
    fn test_command_sent_message() {
        assert_eq!(Labels::EN.command_sent("open"), "command 'open' sent");
        assert_eq!(Labels::KO.command_sent("close"), "명령 'close' 전송 완료");
    }

    #[test]
    fn test_binary_labels() {
        assert_eq!(Labels::EN.detection(true), "detected");
        assert_eq!(Labels::EN.detection(false), "none");
        assert_eq!(Labels::KO.window(true), "열림");
        assert_eq!(Labels::KO.hazard(false), "안전");
    }
}
