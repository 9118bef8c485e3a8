//! Device classification from user-agent strings.
//!
//! Uses woothee for UA parsing. The dashboard only distinguishes mobile
//! from desktop, so everything that is not a phone (including crawlers and
//! unparseable strings) falls back to desktop.

use serde::{Deserialize, Serialize};
use woothee::parser::Parser;

/// Coarse device class attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }

    /// Parses a stored class name, defaulting to desktop.
    pub fn parse(s: &str) -> Self {
        match s {
            "mobile" => Self::Mobile,
            _ => Self::Desktop,
        }
    }
}

/// Pure user-agent classifier.
pub struct DeviceClassifier {
    parser: Parser,
}

impl DeviceClassifier {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Classifies a user-agent string. `None` (non-browser execution)
    /// classifies as desktop.
    pub fn classify(&self, user_agent: Option<&str>) -> DeviceClass {
        let Some(ua) = user_agent else {
            return DeviceClass::Desktop;
        };
        if ua.is_empty() {
            return DeviceClass::Desktop;
        }

        match self.parser.parse(ua) {
            // woothee categories: pc, smartphone, mobilephone, crawler,
            // appliance, misc
            Some(result) => match result.category {
                "smartphone" | "mobilephone" => DeviceClass::Mobile,
                _ => DeviceClass::Desktop,
            },
            None => DeviceClass::Desktop,
        }
    }
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new()
    }
}
