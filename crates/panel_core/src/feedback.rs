//! Transient feedback on the refresh and activation controls.

use std::time::Duration;

use serde::Serialize;

pub const FEEDBACK_REVERT: Duration = Duration::from_millis(2000);
pub const REFRESH_SPIN: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshIcon {
    #[default]
    Sync,
    Check,
    Cross,
}

impl RefreshIcon {
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Sync => "fa-sync-alt",
            Self::Check => "fa-check",
            Self::Cross => "fa-times",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshControl {
    pub icon: RefreshIcon,
    pub rotating: bool,
}

/// Activation control phase: `Idle -> {Sent, Failed} -> Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivateFeedback {
    #[default]
    Idle,
    Sent,
    Failed,
}

impl ActivateFeedback {
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Idle => "fa-play",
            Self::Sent => "fa-check",
            Self::Failed => "fa-times",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Activate Wipers",
            Self::Sent => "Command Sent!",
            Self::Failed => "Failed!",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Idle => "secondary",
            Self::Sent => "success",
            Self::Failed => "danger",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivateControl {
    pub feedback: ActivateFeedback,
}
