//! Request/response contract with the sensor and actuator endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::PanelError,
    protocol::{CommandAck, SensorReading, WiperCommand},
};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait PanelTransport: Send + Sync {
    /// `GET` the sensor endpoint. Any non-2xx status fails without reading the
    /// body.
    async fn fetch_sensor(&self) -> Result<SensorReading, PanelError>;

    /// `POST` a command. The status code is not checked; only a failed request
    /// or an undecodable body is an error.
    async fn send_command(&self, command: &WiperCommand) -> Result<CommandAck, PanelError>;
}

pub struct HttpTransport {
    http: Client,
    sensor_url: Url,
    command_url: Url,
}

impl HttpTransport {
    pub fn new(sensor_url: Url, command_url: Url, timeout: Duration) -> Result<Self, PanelError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(network_error)?;
        Ok(Self {
            http,
            sensor_url,
            command_url,
        })
    }

    pub fn sensor_url(&self) -> &Url {
        &self.sensor_url
    }

    pub fn command_url(&self) -> &Url {
        &self.command_url
    }
}

fn network_error(err: reqwest::Error) -> PanelError {
    PanelError::network(err.to_string())
}

#[async_trait]
impl PanelTransport for HttpTransport {
    async fn fetch_sensor(&self) -> Result<SensorReading, PanelError> {
        let response = self
            .http
            .get(self.sensor_url.clone())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network_error)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_command(&self, command: &WiperCommand) -> Result<CommandAck, PanelError> {
        let response = self
            .http
            .post(self.command_url.clone())
            .json(command)
            .send()
            .await
            .map_err(network_error)?;

        // TODO: surface non-2xx actuator responses as failures once the actuator
        // reports rejected commands with a status code.
        debug!(status = response.status().as_u16(), "command: actuator responded");
        let body = response.bytes().await.map_err(network_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
