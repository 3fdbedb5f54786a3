//! Sensor refresh cycle: `Idle -> Processing -> {Ready, Error}`.

use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::{error::PanelError, protocol::SensorReading};
use tracing::{debug, info, warn};

use crate::{
    animator::{SensorField, ValueAnimator, NOT_AVAILABLE},
    feedback::{RefreshIcon, FEEDBACK_REVERT, REFRESH_SPIN},
    scheduler::{TimerAction, TimerQueue},
    state::PanelState,
    status::{StatusKind, FETCHED_MESSAGE, FETCHING_MESSAGE},
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(10_000);
pub const INVALID_DATE: &str = "Invalid Date";
const LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// How overlapping fetch cycles resolve against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOrdering {
    /// Every response is applied as it resolves; the last one wins.
    #[default]
    LastWriteWins,
    /// A response is dropped when a newer cycle started after it.
    LatestCycleOnly,
}

impl FromStr for PollOrdering {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "last_write_wins" => Ok(Self::LastWriteWins),
            "latest_cycle_only" => Ok(Self::LatestCycleOnly),
            other => Err(format!("unknown poll ordering '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTrigger {
    Startup,
    Timer,
    Manual,
}

impl fmt::Display for PollTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Startup => "startup",
            Self::Timer => "timer",
            Self::Manual => "manual",
        })
    }
}

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    pub generation: u64,
    pub trigger: PollTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated,
    Failed,
    Discarded,
}

#[derive(Debug, Default)]
pub struct SensorPoller {
    ordering: PollOrdering,
    generation: u64,
}

impl SensorPoller {
    pub fn new(ordering: PollOrdering) -> Self {
        Self {
            ordering,
            generation: 0,
        }
    }

    pub fn ordering(&self) -> PollOrdering {
        self.ordering
    }

    /// Enters Processing and hands out the ticket for the request about to be
    /// issued. A manual trigger also spins the refresh control.
    pub fn begin(
        &mut self,
        state: &mut PanelState,
        trigger: PollTrigger,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> PollTicket {
        self.generation += 1;
        if trigger == PollTrigger::Manual {
            state.refresh.rotating = true;
            timers.schedule(now + REFRESH_SPIN, TimerAction::StopRefreshSpin);
        }
        state.status.set_status(StatusKind::Processing, FETCHING_MESSAGE);
        debug!(generation = self.generation, %trigger, "poll: fetching sensor data");
        PollTicket {
            generation: self.generation,
            trigger,
        }
    }

    pub fn complete(
        &mut self,
        state: &mut PanelState,
        ticket: PollTicket,
        result: Result<SensorReading, PanelError>,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> PollOutcome {
        if self.ordering == PollOrdering::LatestCycleOnly && ticket.generation < self.generation {
            info!(
                generation = ticket.generation,
                latest = self.generation,
                trigger = %ticket.trigger,
                "poll: discarding stale response"
            );
            return PollOutcome::Discarded;
        }

        let outcome = match result {
            Ok(reading) => {
                apply_reading(state, &reading, now, timers);
                state.status.set_status(StatusKind::Ready, FETCHED_MESSAGE);
                state.refresh.icon = RefreshIcon::Check;
                info!(
                    generation = ticket.generation,
                    temperature = ?reading.temperature,
                    humidity = ?reading.humidity,
                    "poll: sensor data updated"
                );
                PollOutcome::Updated
            }
            Err(err) => {
                state.status.set_status(
                    StatusKind::Error,
                    format!("Error fetching sensor data: {err}"),
                );
                state.temperature.set_text(NOT_AVAILABLE);
                state.humidity.set_text(NOT_AVAILABLE);
                state.timestamp = NOT_AVAILABLE.to_string();
                state.refresh.icon = RefreshIcon::Cross;
                warn!(
                    generation = ticket.generation,
                    kind = err.kind(),
                    error = %err,
                    "poll: sensor fetch failed"
                );
                PollOutcome::Failed
            }
        };
        timers.schedule(now + FEEDBACK_REVERT, TimerAction::RevertRefreshIcon);
        outcome
    }
}

fn apply_reading(
    state: &mut PanelState,
    reading: &SensorReading,
    now: Duration,
    timers: &mut TimerQueue,
) {
    for (field, value) in [
        (SensorField::Temperature, reading.temperature),
        (SensorField::Humidity, reading.humidity),
    ] {
        let text = value.map_or_else(|| NOT_AVAILABLE.to_string(), format_reading);
        ValueAnimator::animate(state.field_mut(field), field, &text, now, timers);
    }

    state.timestamp = match reading.timestamp() {
        Some(raw) => format_timestamp(raw),
        None => NOT_AVAILABLE.to_string(),
    };
}

/// Renders a reading the way it arrived on the wire: integral values without
/// a fractional part, everything else in shortest form.
pub fn format_reading(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Formats a sensor timestamp in the local time zone.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(raw, tz) {
        Some(instant) => instant.format(LOCALE_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(tz));
    }
    // Date-time without an offset is local time.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return tz.from_local_datetime(&naive).earliest();
    }
    // Date-only is midnight UTC.
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(tz))
}
