use super::*;
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::json;
use shared::domain::{WiperSpeed, WiperTarget};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::sleep,
};

use crate::{
    animator::NOT_AVAILABLE,
    feedback::ActivateFeedback,
    poller::format_timestamp,
    status::StatusKind,
};

const POLL_INTERVAL: Duration = Duration::from_secs(10);

type ScriptedFetch = (Duration, Result<SensorReading, PanelError>);

#[derive(Default)]
struct ScriptedTransport {
    fetch_script: Mutex<VecDeque<ScriptedFetch>>,
    fetches: AtomicUsize,
    commands: Mutex<Vec<WiperCommand>>,
    command_delay: Duration,
}

impl ScriptedTransport {
    fn with_fetches(script: Vec<ScriptedFetch>) -> Self {
        Self {
            fetch_script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    fn with_command_delay(mut self, delay: Duration) -> Self {
        self.command_delay = delay;
        self
    }
}

#[async_trait]
impl PanelTransport for ScriptedTransport {
    async fn fetch_sensor(&self) -> Result<SensorReading, PanelError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.fetch_script.lock().await.pop_front();
        match next {
            Some((delay, result)) => {
                sleep(delay).await;
                result
            }
            None => Ok(SensorReading::default()),
        }
    }

    async fn send_command(&self, command: &WiperCommand) -> Result<CommandAck, PanelError> {
        self.commands.lock().await.push(command.clone());
        sleep(self.command_delay).await;
        Ok(json!({ "ok": true }))
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn temperature(value: f64) -> SensorReading {
    SensorReading {
        temperature: Some(value),
        ..SensorReading::default()
    }
}

fn launch(
    transport: Arc<ScriptedTransport>,
    ordering: PollOrdering,
) -> (
    mpsc::Sender<PanelInput>,
    watch::Receiver<PanelState>,
    JoinHandle<()>,
) {
    let (input_tx, input_rx) = mpsc::channel(8);
    let (snapshot_tx, snapshot_rx) = watch::channel(PanelState::default());
    let runtime = PanelRuntime::new(transport, ordering, POLL_INTERVAL);
    let handle = tokio::spawn(runtime.run(input_rx, snapshot_tx));
    (input_tx, snapshot_rx, handle)
}

#[tokio::test(start_paused = true)]
async fn startup_fetch_populates_panel() {
    let transport = Arc::new(ScriptedTransport::with_fetches(vec![(
        ms(100),
        Ok(SensorReading {
            temperature: Some(21.5),
            humidity: Some(40.0),
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
        }),
    )]));
    let (_inputs, snapshots, _handle) = launch(transport, PollOrdering::LastWriteWins);

    sleep(ms(1000)).await;
    let state = snapshots.borrow().clone();
    assert_eq!(state.status.kind(), StatusKind::Ready);
    assert_eq!(state.status.message(), "Sensor data updated successfully");
    assert_eq!(state.temperature.text(), "21.5");
    assert_eq!(state.humidity.text(), "40");
    assert_eq!(state.timestamp, format_timestamp("2024-01-01T00:00:00Z"));
}

#[tokio::test(start_paused = true)]
async fn polls_on_every_interval() {
    let transport = Arc::new(ScriptedTransport::default());
    let (_inputs, _snapshots, _handle) =
        launch(Arc::clone(&transport), PollOrdering::LastWriteWins);

    sleep(ms(25_000)).await;
    assert_eq!(transport.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_recovers_from_failed_fetch() {
    let transport = Arc::new(ScriptedTransport::with_fetches(vec![
        (ms(10), Err(PanelError::network("connection refused"))),
        (ms(10), Ok(temperature(19.0))),
    ]));
    let (inputs, snapshots, _handle) = launch(transport, PollOrdering::LastWriteWins);

    sleep(ms(100)).await;
    {
        let state = snapshots.borrow();
        assert_eq!(state.status.kind(), StatusKind::Error);
        assert!(state.status.message().contains("connection refused"));
        assert_eq!(state.temperature.text(), NOT_AVAILABLE);
        assert_eq!(state.humidity.text(), NOT_AVAILABLE);
        assert_eq!(state.timestamp, NOT_AVAILABLE);
    }

    inputs.send(PanelInput::Refresh).await.expect("send refresh");
    sleep(ms(500)).await;
    let state = snapshots.borrow().clone();
    assert_eq!(state.status.kind(), StatusKind::Ready);
    assert_eq!(state.temperature.text(), "19");
}

#[tokio::test(start_paused = true)]
async fn overlapping_manual_refresh_last_response_wins() {
    let transport = Arc::new(ScriptedTransport::with_fetches(vec![
        (ms(3000), Ok(temperature(10.0))),
        (ms(500), Ok(temperature(20.0))),
    ]));
    let (inputs, snapshots, _handle) = launch(transport, PollOrdering::LastWriteWins);

    sleep(ms(500)).await;
    inputs.send(PanelInput::Refresh).await.expect("send refresh");

    sleep(ms(1000)).await;
    assert_eq!(snapshots.borrow().temperature.text(), "20");

    sleep(ms(3000)).await;
    assert_eq!(snapshots.borrow().temperature.text(), "10");
}

#[tokio::test(start_paused = true)]
async fn latest_cycle_only_keeps_newer_response() {
    let transport = Arc::new(ScriptedTransport::with_fetches(vec![
        (ms(3000), Ok(temperature(10.0))),
        (ms(500), Ok(temperature(20.0))),
    ]));
    let (inputs, snapshots, _handle) = launch(transport, PollOrdering::LatestCycleOnly);

    sleep(ms(500)).await;
    inputs.send(PanelInput::Refresh).await.expect("send refresh");

    sleep(ms(4000)).await;
    assert_eq!(snapshots.borrow().temperature.text(), "20");
}

#[tokio::test(start_paused = true)]
async fn activation_runs_both_blades_then_settles() {
    let transport = Arc::new(ScriptedTransport::default().with_command_delay(ms(50)));
    let (inputs, snapshots, _handle) =
        launch(Arc::clone(&transport), PollOrdering::LastWriteWins);

    inputs
        .send(PanelInput::Activate(PanelSelection::new(
            WiperTarget::Both,
            WiperSpeed::Fast,
            "2",
        )))
        .await
        .expect("send activate");

    sleep(ms(100)).await;
    {
        let state = snapshots.borrow();
        assert_eq!(state.status.kind(), StatusKind::Success);
        assert!(state.front_blade.is_active());
        assert!(state.rear_blade.is_active());
        assert_eq!(state.activate.feedback, ActivateFeedback::Sent);
    }
    assert_eq!(transport.commands.lock().await.len(), 1);

    sleep(ms(1200)).await;
    {
        let state = snapshots.borrow();
        assert!(!state.front_blade.is_active());
        assert!(!state.rear_blade.is_active());
        assert_eq!(state.activate.feedback, ActivateFeedback::Sent);
    }

    sleep(ms(1000)).await;
    assert_eq!(snapshots.borrow().activate.feedback, ActivateFeedback::Idle);
}

#[tokio::test(start_paused = true)]
async fn closing_inputs_stops_the_loop() {
    let transport = Arc::new(ScriptedTransport::default());
    let (inputs, _snapshots, handle) = launch(transport, PollOrdering::LastWriteWins);

    drop(inputs);
    handle.await.expect("event loop exits cleanly");
}
