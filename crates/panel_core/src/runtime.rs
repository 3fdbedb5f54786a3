//! Single event loop that owns the controller.
//!
//! Requests run as spawned tasks and report back over a channel; every state
//! change happens on the loop in the order completions and timers arrive.

use std::{sync::Arc, time::Duration};

use shared::{
    error::PanelError,
    protocol::{CommandAck, SensorReading, WiperCommand},
};
use tokio::{
    sync::{mpsc, watch},
    time::{interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    controller::PanelController,
    dispatcher::PanelSelection,
    poller::{PollOrdering, PollTicket, PollTrigger},
    state::PanelState,
    transport::PanelTransport,
};

/// User actions accepted by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelInput {
    Refresh,
    Activate(PanelSelection),
}

enum Completion {
    Poll {
        ticket: PollTicket,
        result: Result<SensorReading, PanelError>,
    },
    Command {
        command: WiperCommand,
        result: Result<CommandAck, PanelError>,
    },
}

pub struct PanelRuntime<T> {
    transport: Arc<T>,
    controller: PanelController,
    poll_interval: Duration,
}

impl<T> PanelRuntime<T>
where
    T: PanelTransport + 'static,
{
    pub fn new(transport: Arc<T>, ordering: PollOrdering, poll_interval: Duration) -> Self {
        Self {
            transport,
            controller: PanelController::new(ordering),
            poll_interval,
        }
    }

    /// Runs until `inputs` closes. Fetches once immediately, then every poll
    /// interval; publishes the panel state after every change.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<PanelInput>,
        snapshots: watch::Sender<PanelState>,
    ) {
        let started = Instant::now();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut ticker = interval_at(started + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            ordering = ?self.controller.ordering(),
            "panel: event loop started"
        );
        self.start_poll(PollTrigger::Startup, Duration::ZERO, &done_tx);
        self.publish(&snapshots);

        loop {
            let next_timer = self.controller.next_timer_due().map(|due| started + due);
            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    let now = started.elapsed();
                    match input {
                        PanelInput::Refresh => self.start_poll(PollTrigger::Manual, now, &done_tx),
                        PanelInput::Activate(selection) => self.start_command(&selection, &done_tx),
                    }
                }
                Some(done) = done_rx.recv() => {
                    let now = started.elapsed();
                    match done {
                        Completion::Poll { ticket, result } => {
                            self.controller.complete_poll(ticket, result, now);
                        }
                        Completion::Command { command, result } => {
                            self.controller.complete_command(&command, result, now);
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.start_poll(PollTrigger::Timer, started.elapsed(), &done_tx);
                }
                _ = sleep_until_due(next_timer) => {}
            }

            let fired = self.controller.advance(started.elapsed());
            if fired > 0 {
                debug!(fired, "panel: timers fired");
            }
            self.publish(&snapshots);
        }

        info!("panel: input closed; event loop stopped");
    }

    fn start_poll(
        &mut self,
        trigger: PollTrigger,
        now: Duration,
        done_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        let ticket = self.controller.begin_poll(trigger, now);
        let transport = Arc::clone(&self.transport);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = transport.fetch_sensor().await;
            let _ = done_tx.send(Completion::Poll { ticket, result });
        });
    }

    fn start_command(
        &mut self,
        selection: &PanelSelection,
        done_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        let command = self.controller.begin_command(selection);
        let transport = Arc::clone(&self.transport);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = transport.send_command(&command).await;
            let _ = done_tx.send(Completion::Command { command, result });
        });
    }

    fn publish(&self, snapshots: &watch::Sender<PanelState>) {
        let state = self.controller.state();
        snapshots.send_if_modified(|current| {
            if *current == *state {
                return false;
            }
            *current = state.clone();
            true
        });
    }
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
