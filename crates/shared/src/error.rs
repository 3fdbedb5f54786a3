use thiserror::Error;

/// Failures of a single request cycle against the sensor or actuator endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// The request could not complete.
    #[error("{0}")]
    Network(String),
    #[error("HTTP error! Status: {status}")]
    BadStatus { status: u16 },
    /// The body was not JSON of the expected shape.
    #[error("{0}")]
    Decode(String),
}

impl PanelError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::BadStatus { .. } => "bad_status",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_message_names_the_code() {
        let err = PanelError::BadStatus { status: 503 };
        assert_eq!(err.to_string(), "HTTP error! Status: 503");
        assert_eq!(err.kind(), "bad_status");
    }

    #[test]
    fn json_errors_become_decode_failures() {
        let err: PanelError = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("truncated json")
            .into();
        assert!(matches!(err, PanelError::Decode(_)));
    }
}
