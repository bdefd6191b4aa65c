//! Drives `OwnerApiClient` against an in-process fake of the owner API.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use carwake_adapter_owner_api::{OwnerApiClient, OwnerApiConfig};
use carwake_app::ports::VehicleApi;
use carwake_domain::error::{AuthenticationError, CarwakeError};
use carwake_domain::id::VehicleId;
use carwake_domain::session::{Credentials, Session};
use carwake_domain::vehicle::VehicleState;

const TOKEN: &str = "fake-access-token";
const VEHICLE_ID: u64 = 4242;

#[derive(Default)]
struct FakeApi {
    requests: Mutex<Vec<String>>,
    token_bodies: Mutex<Vec<Value>>,
    command_bodies: Mutex<Vec<Value>>,
    asleep: bool,
    no_vehicles: bool,
    reject_commands: bool,
    battery_level: i64,
}

type Shared = Arc<FakeApi>;

impl FakeApi {
    fn record(&self, entry: impl Into<String>) {
        self.requests.lock().unwrap().push(entry.into());
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn token(State(api): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    api.record("POST /oauth/token");
    api.token_bodies.lock().unwrap().push(body.clone());
    if body["password"] == "hunter2" {
        (
            StatusCode::OK,
            Json(json!({"access_token": TOKEN, "token_type": "bearer", "expires_in": 3_888_000})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_grant"})),
        )
    }
}

async fn revoke(State(api): State<Shared>, headers: HeaderMap) -> StatusCode {
    api.record("POST /oauth/revoke");
    if authorized(&headers) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn vehicles(State(api): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    api.record("GET /api/1/vehicles");
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    if api.no_vehicles {
        return (StatusCode::OK, Json(json!({"response": [], "count": 0})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "response": [{"id": VEHICLE_ID, "display_name": "Starman", "state": "asleep"}],
            "count": 1
        })),
    )
}

async fn wake_up(
    State(api): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    api.record(format!("POST /api/1/vehicles/{id}/wake_up"));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let state = if api.asleep { "asleep" } else { "online" };
    (
        StatusCode::OK,
        Json(json!({"response": {"id": id, "state": state}})),
    )
}

async fn vehicle_data(
    State(api): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    api.record(format!("GET /api/1/vehicles/{id}/vehicle_data"));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    if api.asleep {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({"error": "vehicle unavailable"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"response": {
            "vehicle_state": {"is_user_present": false},
            "charge_state": {"battery_level": api.battery_level}
        }})),
    )
}

async fn command(
    State(api): State<Shared>,
    Path((id, name)): Path<(u64, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    api.record(format!("POST /api/1/vehicles/{id}/command/{name}"));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    api.command_bodies.lock().unwrap().push(body);
    let response = if api.reject_commands {
        json!({"response": {"result": false, "reason": "could_not_wake_buses"}})
    } else {
        json!({"response": {"result": true, "reason": ""}})
    };
    (StatusCode::OK, Json(response))
}

async fn spawn(api: FakeApi) -> (OwnerApiClient, Shared) {
    let api = Arc::new(api);
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/oauth/revoke", post(revoke))
        .route("/api/1/vehicles", get(vehicles))
        .route("/api/1/vehicles/{id}/wake_up", post(wake_up))
        .route("/api/1/vehicles/{id}/vehicle_data", get(vehicle_data))
        .route("/api/1/vehicles/{id}/command/{name}", post(command))
        .with_state(Arc::clone(&api));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = OwnerApiClient::new(OwnerApiConfig {
        base_url: format!("http://{addr}/"),
        timeout_secs: 5,
        ..OwnerApiConfig::default()
    })
    .unwrap();
    (client, api)
}

fn online() -> FakeApi {
    FakeApi {
        battery_level: 76,
        ..FakeApi::default()
    }
}

fn credentials() -> Credentials {
    Credentials::new("starman@example.com", "hunter2")
}

async fn session(client: &OwnerApiClient) -> Session {
    let token = client.login(&credentials()).await.unwrap();
    let vehicle_id = client.fetch_vehicle(&token).await.unwrap();
    Session::new(token, vehicle_id)
}

#[tokio::test]
async fn should_exchange_password_for_token() {
    let (client, api) = spawn(online()).await;

    let token = client.login(&credentials()).await.unwrap();

    assert_eq!(token.expose(), TOKEN);
    let bodies = api.token_bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["grant_type"], "password");
    assert_eq!(bodies[0]["email"], "starman@example.com");
    assert_eq!(bodies[0]["client_id"], OwnerApiConfig::default().client_id);
}

#[tokio::test]
async fn should_report_rejected_credentials() {
    let (client, _api) = spawn(online()).await;

    let err = client
        .login(&Credentials::new("starman@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CarwakeError::Authentication(AuthenticationError::Rejected { .. })
    ));
}

#[tokio::test]
async fn should_not_request_token_without_password() {
    let (client, api) = spawn(online()).await;

    let err = client
        .login(&Credentials::new("starman@example.com", ""))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CarwakeError::Authentication(AuthenticationError::MissingCredentials)
    ));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn should_report_unreachable_server_as_transport_failure() {
    let client = OwnerApiClient::new(OwnerApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
        ..OwnerApiConfig::default()
    })
    .unwrap();

    let err = client.login(&credentials()).await.unwrap_err();

    assert!(matches!(
        err,
        CarwakeError::Authentication(AuthenticationError::Transport(_))
    ));
}

#[tokio::test]
async fn should_pick_first_vehicle_of_account() {
    let (client, _api) = spawn(online()).await;

    let session = session(&client).await;

    assert_eq!(session.vehicle_id, VehicleId::new(VEHICLE_ID));
}

#[tokio::test]
async fn should_fail_when_account_has_no_vehicle() {
    let (client, _api) = spawn(FakeApi {
        no_vehicles: true,
        ..online()
    })
    .await;
    let token = client.login(&credentials()).await.unwrap();

    let err = client.fetch_vehicle(&token).await.unwrap_err();

    match err {
        CarwakeError::Remote(remote) => assert_eq!(remote.operation, "fetch_vehicle"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn should_report_wake_state() {
    let (client, _api) = spawn(FakeApi {
        asleep: true,
        ..online()
    })
    .await;
    let session = session(&client).await;

    let state = client.wake(&session).await.unwrap();

    assert_eq!(state, VehicleState::Asleep);
}

#[tokio::test]
async fn should_read_vehicle_snapshot() {
    let (client, _api) = spawn(online()).await;
    let session = session(&client).await;

    let snapshot = client.fetch_vehicle_state(&session).await.unwrap();

    assert!(!snapshot.is_user_present);
    assert_eq!(snapshot.battery_level.percent(), 76);
}

#[tokio::test]
async fn should_map_sleeping_vehicle_to_remote_error() {
    let (client, _api) = spawn(FakeApi {
        asleep: true,
        ..online()
    })
    .await;
    let session = session(&client).await;

    let err = client.fetch_vehicle_state(&session).await.unwrap_err();

    assert!(err.chain().contains("408"), "{}", err.chain());
}

#[tokio::test]
async fn should_send_commands_to_vehicle_endpoints() {
    let (client, api) = spawn(online()).await;
    let session = session(&client).await;

    client.start_climate(&session).await.unwrap();
    client.stop_climate(&session).await.unwrap();
    client.set_sentry_mode(&session, true).await.unwrap();
    client.flash_lights(&session).await.unwrap();

    let requests = api.requests();
    assert_eq!(
        &requests[2..],
        &[
            format!("POST /api/1/vehicles/{VEHICLE_ID}/command/auto_conditioning_start"),
            format!("POST /api/1/vehicles/{VEHICLE_ID}/command/auto_conditioning_stop"),
            format!("POST /api/1/vehicles/{VEHICLE_ID}/command/set_sentry_mode"),
            format!("POST /api/1/vehicles/{VEHICLE_ID}/command/flash_lights"),
        ]
    );
    let bodies = api.command_bodies.lock().unwrap().clone();
    assert_eq!(bodies[2], json!({"on": true}));
    assert_eq!(bodies[0], json!({}));
}

#[tokio::test]
async fn should_fail_when_vehicle_rejects_command() {
    let (client, _api) = spawn(FakeApi {
        reject_commands: true,
        ..online()
    })
    .await;
    let session = session(&client).await;

    let err = client.start_climate(&session).await.unwrap_err();

    assert!(
        err.chain().contains("could_not_wake_buses"),
        "{}",
        err.chain()
    );
}

#[tokio::test]
async fn should_revoke_token_on_logout() {
    let (client, api) = spawn(online()).await;
    let session = session(&client).await;

    client.logout(&session.token).await.unwrap();

    assert_eq!(api.requests().last().unwrap(), "POST /oauth/revoke");
}
