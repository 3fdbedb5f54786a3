use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use panel_core::{HttpTransport, PanelRuntime, PanelState, PollOrdering};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};
use console::{parse_line, render_state, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
#[command(about = "Headless wiper control panel")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    sensor_url: Option<String>,
    #[arg(long)]
    command_url: Option<String>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// Drop sensor responses superseded by a newer fetch.
    #[arg(long)]
    latest_poll_only: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.sensor_url {
            settings.sensor_url = v.clone();
        }
        if let Some(v) = &self.command_url {
            settings.command_url = v.clone();
        }
        if let Some(v) = self.poll_interval_ms {
            settings.poll_interval_ms = v;
        }
        if self.latest_poll_only {
            settings.poll_ordering = PollOrdering::LatestCycleOnly;
        }
    }
}

async fn print_snapshots(mut snapshots: watch::Receiver<PanelState>) {
    while snapshots.changed().await.is_ok() {
        let line = render_state(&snapshots.borrow_and_update());
        println!("{line}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    args.apply(&mut settings);
    let endpoints = settings.endpoints()?;
    info!(
        sensor_url = %endpoints.sensor_url,
        command_url = %endpoints.command_url,
        poll_ordering = ?settings.poll_ordering,
        "wiper panel starting"
    );

    let transport = HttpTransport::new(
        endpoints.sensor_url,
        endpoints.command_url,
        endpoints.request_timeout,
    )
    .context("failed to build http client")?;
    let runtime = PanelRuntime::new(
        Arc::new(transport),
        settings.poll_ordering,
        endpoints.poll_interval,
    );

    let (input_tx, input_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(PanelState::default());
    let event_loop = tokio::spawn(runtime.run(input_rx, snapshot_tx));
    let printer = tokio::spawn(print_snapshots(snapshot_rx.clone()));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Input(input))) => {
                if input_tx.send(input).await.is_err() {
                    warn!("panel event loop is gone; exiting");
                    break;
                }
            }
            Ok(Some(ConsoleCommand::Status)) => {
                println!("{}", render_state(&snapshot_rx.borrow()));
            }
            Ok(Some(ConsoleCommand::Quit)) => break,
            Err(message) => println!("{message}"),
        }
    }

    drop(input_tx);
    event_loop.await.context("panel event loop panicked")?;
    printer.abort();
    info!("wiper panel stopped");
    Ok(())
}
