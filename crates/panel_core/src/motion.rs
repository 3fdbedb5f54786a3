//! Simulated blade sweeps started by a confirmed command.

use std::time::Duration;

use serde::Serialize;
use shared::domain::{Blade, WiperSpeed};
use tracing::debug;

use crate::scheduler::{TimerAction, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionClass {
    Active,
    Fast,
}

impl MotionClass {
    pub fn for_speed(speed: WiperSpeed) -> Self {
        match speed {
            WiperSpeed::Fast => Self::Fast,
            WiperSpeed::Normal => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "wiper-active",
            Self::Fast => "wiper-fast",
        }
    }
}

/// Total run time of `cycles` sweeps. Cycle counts that are missing or not
/// positive end the run on the next timer pass.
pub fn motion_duration(speed: WiperSpeed, cycles: Option<i64>) -> Duration {
    let per_cycle = speed.cycle_duration().as_millis() as u64;
    match cycles {
        Some(cycles) if cycles > 0 => Duration::from_millis(per_cycle.saturating_mul(cycles as u64)),
        _ => Duration::ZERO,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BladeMotion {
    class: Option<MotionClass>,
    ends_at: Option<Duration>,
    runs: u64,
}

impl BladeMotion {
    pub fn is_active(&self) -> bool {
        self.class.is_some()
    }

    pub fn class(&self) -> Option<MotionClass> {
        self.class
    }

    pub fn ends_at(&self) -> Option<Duration> {
        self.ends_at
    }

    /// Number of simulations started on this blade so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Restarts the sweep from the beginning and schedules its end.
    pub(crate) fn start(
        &mut self,
        blade: Blade,
        speed: WiperSpeed,
        cycles: Option<i64>,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> Duration {
        // A new run replays from the beginning even when the class is unchanged.
        self.runs += 1;

        let duration = motion_duration(speed, cycles);
        let class = MotionClass::for_speed(speed);
        self.class = Some(class);
        self.ends_at = Some(now + duration);
        timers.schedule(
            now + duration,
            TimerAction::EndMotion {
                blade,
                run: self.runs,
            },
        );
        debug!(
            blade = blade.as_str(),
            class = class.as_str(),
            duration_ms = duration.as_millis() as u64,
            "motion: started"
        );
        duration
    }

    /// Ends the sweep if `run` is still the current one. An end timer left
    /// over from a restarted sweep does nothing.
    pub(crate) fn finish(&mut self, blade: Blade, run: u64) -> bool {
        if run != self.runs || self.class.is_none() {
            return false;
        }
        self.class = None;
        self.ends_at = None;
        debug!(blade = blade.as_str(), "motion: finished");
        true
    }
}
