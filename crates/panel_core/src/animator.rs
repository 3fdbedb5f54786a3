//! Displayed sensor values and the highlight pulse applied when they change.

use std::time::Duration;

use serde::Serialize;
use tracing::trace;

use crate::scheduler::{TimerAction, TimerQueue};

/// Sentinel shown for an absent or failed reading.
pub const NOT_AVAILABLE: &str = "N/A";
/// Text shown before the first reading arrives.
pub const PLACEHOLDER: &str = "--";
pub const HIGHLIGHT_DECAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    Temperature,
    Humidity,
}

impl SensorField {
    /// Unit rendered next to the value. It is never part of the value text.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedValue {
    text: String,
    highlighted: bool,
}

impl Default for DisplayedValue {
    fn default() -> Self {
        Self::new(PLACEHOLDER)
    }
}

impl DisplayedValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Writes the text directly, without a pulse.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn commit(&mut self, value: String) {
        self.text = value;
        self.highlighted = false;
    }
}

pub struct ValueAnimator;

impl ValueAnimator {
    /// Pulses `value` and schedules the commit of `new_value` after
    /// [`HIGHLIGHT_DECAY`]. Returns `false` without touching anything when the
    /// displayed text already equals `new_value`.
    pub fn animate(
        value: &mut DisplayedValue,
        field: SensorField,
        new_value: &str,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> bool {
        if value.text == new_value {
            return false;
        }

        value.highlighted = true;
        timers.schedule(
            now + HIGHLIGHT_DECAY,
            TimerAction::CommitValue {
                field,
                value: new_value.to_string(),
            },
        );
        trace!(?field, new_value, "value pulse scheduled");
        true
    }
}
