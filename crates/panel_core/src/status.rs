//! Status indicator: one active state with its message and class set.

use serde::Serialize;

pub const STARTUP_MESSAGE: &str = "System ready for commands";
pub const FETCHING_MESSAGE: &str = "Fetching sensor data...";
pub const FETCHED_MESSAGE: &str = "Sensor data updated successfully";
pub const SENDING_MESSAGE: &str = "Sending command to wiper system...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Ready,
    Processing,
    Success,
    Error,
}

impl StatusKind {
    /// Icon classes rendered for this state.
    pub fn icon_classes(self) -> &'static [&'static str] {
        match self {
            Self::Ready => &["status-icon", "fas", "fa-check-circle", "ready"],
            Self::Error => &["status-icon", "fas", "fa-exclamation-circle", "error"],
            Self::Processing => &["status-icon", "fas", "fa-cog", "processing", "fa-spin"],
            Self::Success => &["status-icon", "fas", "fa-check-circle", "success"],
        }
    }

    pub fn container_class(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    kind: StatusKind,
    message: String,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            kind: StatusKind::Ready,
            message: STARTUP_MESSAGE.to_string(),
        }
    }
}

impl StatusIndicator {
    /// Replaces the active state and its message. Nothing of the previous
    /// state is kept.
    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.kind = kind;
        self.message = message.into();
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn icon_classes(&self) -> &'static [&'static str] {
        self.kind.icon_classes()
    }
}
