use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{WiperSpeed, WiperTarget};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct ActuatorState {
    status: StatusCode,
    body: &'static str,
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn serve(app: Router) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn sensor_server(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/api/sensor",
        get(move || async move { (status, body.to_string()) }),
    );
    serve(app).await.expect("sensor server")
}

async fn actuator_server(
    status: StatusCode,
    body: &'static str,
) -> (String, oneshot::Receiver<Value>) {
    let (tx, rx) = oneshot::channel();
    let state = ActuatorState {
        status,
        body,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/api/commands",
            post(
                |State(state): State<ActuatorState>, Json(payload): Json<Value>| async move {
                    if let Some(tx) = state.tx.lock().await.take() {
                        let _ = tx.send(payload);
                    }
                    (state.status, state.body.to_string())
                },
            ),
        )
        .with_state(state);
    (serve(app).await.expect("actuator server"), rx)
}

fn transport(base: &str) -> HttpTransport {
    HttpTransport::new(
        Url::parse(&format!("{base}/api/sensor")).expect("sensor url"),
        Url::parse(&format!("{base}/api/commands")).expect("command url"),
        TIMEOUT,
    )
    .expect("transport")
}

fn back_fast_three() -> WiperCommand {
    WiperCommand {
        wiper_type: WiperTarget::Back,
        speed: WiperSpeed::Fast,
        cycles: Some(3),
    }
}

#[tokio::test]
async fn fetch_sensor_decodes_reading() {
    let base = sensor_server(
        StatusCode::OK,
        r#"{"temperature":21.5,"humidity":40,"timestamp":"2024-01-01T00:00:00Z"}"#,
    )
    .await;

    let reading = transport(&base).fetch_sensor().await.expect("reading");
    assert_eq!(reading.temperature, Some(21.5));
    assert_eq!(reading.humidity, Some(40.0));
    assert_eq!(reading.timestamp(), Some("2024-01-01T00:00:00Z"));
}

#[tokio::test]
async fn fetch_sensor_rejects_non_success_status() {
    let base = sensor_server(StatusCode::SERVICE_UNAVAILABLE, r#"{"temperature":1}"#).await;

    let err = transport(&base).fetch_sensor().await.expect_err("bad status");
    assert_eq!(err, PanelError::BadStatus { status: 503 });
}

#[tokio::test]
async fn fetch_sensor_reports_malformed_body_as_decode_failure() {
    let base = sensor_server(StatusCode::OK, "<html>not json</html>").await;

    let err = transport(&base).fetch_sensor().await.expect_err("decode");
    assert!(matches!(err, PanelError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn fetch_sensor_reports_unreachable_endpoint_as_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport(&format!("http://{addr}"))
        .fetch_sensor()
        .await
        .expect_err("unreachable");
    assert!(matches!(err, PanelError::Network(_)), "{err:?}");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn send_command_posts_wire_body() {
    let (base, rx) = actuator_server(StatusCode::OK, r#"{"accepted":true}"#).await;

    let ack = transport(&base)
        .send_command(&back_fast_three())
        .await
        .expect("ack");
    assert_eq!(ack, json!({ "accepted": true }));
    assert_eq!(
        rx.await.expect("captured body"),
        json!({ "wiperType": "back", "speed": "fast", "cycles": 3 })
    );
}

#[tokio::test]
async fn send_command_does_not_check_status() {
    let (base, _rx) = actuator_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"jam"}"#).await;

    let ack = transport(&base)
        .send_command(&back_fast_three())
        .await
        .expect("status is not consulted");
    assert_eq!(ack["error"], "jam");
}

#[tokio::test]
async fn send_command_fails_on_undecodable_body() {
    let (base, _rx) = actuator_server(StatusCode::OK, "queued").await;

    let err = transport(&base)
        .send_command(&back_fast_three())
        .await
        .expect_err("decode");
    assert!(matches!(err, PanelError::Decode(_)), "{err:?}");
}
