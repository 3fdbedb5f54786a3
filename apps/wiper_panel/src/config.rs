use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use panel_core::PollOrdering;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "wiper_panel.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sensor_url: String,
    pub command_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub poll_ordering: PollOrdering,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensor_url: "http://localhost:3001/api/sensor".into(),
            command_url: "http://localhost:3001/api/commands".into(),
            poll_interval_ms: 10_000,
            request_timeout_ms: 5_000,
            poll_ordering: PollOrdering::LastWriteWins,
        }
    }
}

/// Validated endpoints and timings.
#[derive(Debug, Clone)]
pub struct PanelEndpoints {
    pub sensor_url: Url,
    pub command_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn endpoints(&self) -> anyhow::Result<PanelEndpoints> {
        let sensor_url = parse_http_url("sensor_url", &self.sensor_url)?;
        let command_url = parse_http_url("command_url", &self.command_url)?;
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than zero");
        }
        Ok(PanelEndpoints {
            sensor_url,
            command_url,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        })
    }
}

fn parse_http_url(key: &str, raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("{key} '{raw}' is not a valid url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{key} '{raw}' must use http or https");
    }
    Ok(url)
}

/// Defaults, then the TOML file at `path` if it exists, then the process
/// environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    match fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read settings file '{}'", path.display())),
    }
}

pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("SENSOR_URL") {
        settings.sensor_url = v;
    }
    if let Some(v) = lookup("APP__SENSOR_URL") {
        settings.sensor_url = v;
    }

    if let Some(v) = lookup("COMMAND_URL") {
        settings.command_url = v;
    }
    if let Some(v) = lookup("APP__COMMAND_URL") {
        settings.command_url = v;
    }

    if let Some(v) = lookup("APP__POLL_INTERVAL_MS") {
        settings.poll_interval_ms = v
            .parse()
            .with_context(|| format!("APP__POLL_INTERVAL_MS '{v}' is not a number"))?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        settings.request_timeout_ms = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_MS '{v}' is not a number"))?;
    }

    if let Some(v) = lookup("APP__POLL_ORDERING") {
        settings.poll_ordering = v.parse().map_err(anyhow::Error::msg)?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
