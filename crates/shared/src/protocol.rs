use serde::{Deserialize, Serialize};

use crate::domain::{WiperSpeed, WiperTarget};

/// Body of `GET {sensor-endpoint}`. Every field is optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SensorReading {
    /// Timestamp if present and non-empty.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref().filter(|raw| !raw.is_empty())
    }
}

/// Body of `POST {command-endpoint}`.
///
/// `cycles` is `None` when the cycle field did not parse as an integer; it is
/// sent as JSON `null` without further validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiperCommand {
    pub wiper_type: WiperTarget,
    pub speed: WiperSpeed,
    pub cycles: Option<i64>,
}

impl WiperCommand {
    pub fn cycles_label(&self) -> String {
        match self.cycles {
            Some(cycles) => cycles.to_string(),
            None => "NaN".to_string(),
        }
    }
}

/// Acknowledgement body returned by the actuator endpoint. Its content is not
/// inspected.
pub type CommandAck = serde_json::Value;
