//! Panel controller: owns the state and timers and routes every mutation.
//!
//! All methods take the current logical time so the controller can be driven
//! deterministically. The async event loop in [`crate::runtime`] is the only
//! production caller.

use std::time::Duration;

use shared::{
    error::PanelError,
    protocol::{CommandAck, SensorReading, WiperCommand},
};

use crate::{
    dispatcher::{CommandDispatcher, PanelSelection},
    feedback::{ActivateFeedback, RefreshIcon},
    poller::{PollOrdering, PollOutcome, PollTicket, PollTrigger, SensorPoller},
    scheduler::{TimerAction, TimerQueue},
    state::PanelState,
    status::StatusKind,
};

#[derive(Debug, Default)]
pub struct PanelController {
    state: PanelState,
    timers: TimerQueue,
    poller: SensorPoller,
    dispatcher: CommandDispatcher,
}

impl PanelController {
    pub fn new(ordering: PollOrdering) -> Self {
        Self {
            poller: SensorPoller::new(ordering),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn ordering(&self) -> PollOrdering {
        self.poller.ordering()
    }

    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn begin_poll(&mut self, trigger: PollTrigger, now: Duration) -> PollTicket {
        self.poller
            .begin(&mut self.state, trigger, now, &mut self.timers)
    }

    pub fn complete_poll(
        &mut self,
        ticket: PollTicket,
        result: Result<SensorReading, PanelError>,
        now: Duration,
    ) -> PollOutcome {
        self.poller
            .complete(&mut self.state, ticket, result, now, &mut self.timers)
    }

    pub fn begin_command(&mut self, selection: &PanelSelection) -> WiperCommand {
        self.dispatcher.begin(&mut self.state, selection)
    }

    pub fn complete_command(
        &mut self,
        command: &WiperCommand,
        result: Result<CommandAck, PanelError>,
        now: Duration,
    ) -> StatusKind {
        self.dispatcher
            .complete(&mut self.state, command, result, now, &mut self.timers)
    }

    /// Fires every timer due at or before `now`. Returns how many fired.
    pub fn advance(&mut self, now: Duration) -> usize {
        let due = self.timers.pop_due(now);
        let fired = due.len();
        for action in due {
            self.fire(action);
        }
        fired
    }

    fn fire(&mut self, action: TimerAction) {
        match action {
            TimerAction::CommitValue { field, value } => self.state.field_mut(field).commit(value),
            TimerAction::EndMotion { blade, run } => {
                self.state.blade_mut(blade).finish(blade, run);
            }
            TimerAction::RevertRefreshIcon => self.state.refresh.icon = RefreshIcon::Sync,
            TimerAction::StopRefreshSpin => self.state.refresh.rotating = false,
            TimerAction::RevertActivateControl => {
                self.state.activate.feedback = ActivateFeedback::Idle;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
