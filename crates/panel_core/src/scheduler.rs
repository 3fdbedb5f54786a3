//! One-shot timers on a logical clock.
//!
//! Times are offsets from the start of the panel session. The event loop maps
//! them onto tokio instants; tests advance them by hand.

use std::{collections::BTreeMap, time::Duration};

use shared::domain::Blade;

use crate::animator::SensorField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    CommitValue { field: SensorField, value: String },
    EndMotion { blade: Blade, run: u64 },
    RevertRefreshIcon,
    StopRefreshSpin,
    RevertActivateControl,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Duration, u64), TimerAction>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, due: Duration, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due, seq), action);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Removes every action due at or before `now`, in firing order. Actions
    /// sharing a due time fire in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Vec<TimerAction> {
        let pending = self.entries.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.entries, pending);
        due.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
