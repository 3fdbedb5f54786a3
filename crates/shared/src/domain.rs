use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Blade selection carried by a wiper command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiperTarget {
    Front,
    Back,
    Both,
}

impl WiperTarget {
    /// Blades driven by this target, front first.
    pub fn blades(self) -> &'static [Blade] {
        match self {
            Self::Front => &[Blade::Front],
            Self::Back => &[Blade::Rear],
            Self::Both => &[Blade::Front, Blade::Rear],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Both => "both",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

impl fmt::Display for WiperTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiperSpeed {
    Normal,
    Fast,
}

impl WiperSpeed {
    /// Duration of one sweep for this speed.
    pub fn cycle_duration(self) -> Duration {
        match self {
            Self::Fast => Duration::from_millis(600),
            Self::Normal => Duration::from_millis(1000),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }

    /// Anything other than `fast` runs at normal timing.
    pub fn from_selection(raw: &str) -> Self {
        if raw.trim() == "fast" {
            Self::Fast
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for WiperSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blade {
    Front,
    Rear,
}

impl Blade {
    pub const ALL: [Blade; 2] = [Blade::Front, Blade::Rear];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Rear => "rear",
        }
    }
}

impl fmt::Display for Blade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
