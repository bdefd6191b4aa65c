//! # carwake-adapter-owner-api
//!
//! HTTP adapter for the vehicle manufacturer's owner API.
//!
//! ## Responsibilities
//! - Exchange username/password for a bearer token (`/oauth/token`)
//! - Resolve the account's vehicle (`/api/1/vehicles`)
//! - Wake, read telemetry and send commands (`/api/1/vehicles/{id}/…`)
//! - Revoke the token on logout (`/oauth/revoke`)
//!
//! Each port call maps to exactly one HTTP request; retries belong to the
//! application layer.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `carwake-app` and `carwake-domain`.

mod config;
mod error;
mod wire;

use std::time::Duration;

use carwake_app::ports::VehicleApi;
use carwake_domain::command::CommandAck;
use carwake_domain::error::{AuthenticationError, CarwakeError};
use carwake_domain::id::VehicleId;
use carwake_domain::session::{AuthToken, Credentials, Session};
use carwake_domain::vehicle::{VehicleSnapshot, VehicleState};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use config::OwnerApiConfig;
pub use error::OwnerApiError;

use wire::{
    Envelope, RevokeRequest, SentryModeRequest, TokenRequest, TokenResponse, VehicleData,
    VehicleSummary, WakeUpResponse,
};

/// Owner API client implementing [`VehicleApi`].
#[derive(Debug, Clone)]
pub struct OwnerApiClient {
    http: reqwest::Client,
    config: OwnerApiConfig,
}

impl OwnerApiClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerApiError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: OwnerApiConfig) -> Result<Self, OwnerApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("carwake/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<AuthToken, OwnerApiError> {
        let body = TokenRequest {
            grant_type: "password",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            email: &credentials.username,
            password: credentials.password(),
        };
        let response = self
            .http
            .post(self.config.url("/oauth/token"))
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;
        Ok(AuthToken::new(token.access_token))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        token: &AuthToken,
        path: &str,
    ) -> Result<T, OwnerApiError> {
        let response = self
            .http
            .get(self.config.url(path))
            .bearer_auth(token.expose())
            .send()
            .await?;
        let envelope: Envelope<T> = read_json(response).await?;
        Ok(envelope.response)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        token: &AuthToken,
        path: &str,
        body: &B,
    ) -> Result<T, OwnerApiError> {
        let response = self
            .http
            .post(self.config.url(path))
            .bearer_auth(token.expose())
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<T> = read_json(response).await?;
        Ok(envelope.response)
    }

    async fn command<B: Serialize + Sync>(
        &self,
        session: &Session,
        name: &str,
        body: &B,
    ) -> Result<CommandAck, OwnerApiError> {
        let path = format!("/api/1/vehicles/{}/command/{name}", session.vehicle_id);
        let ack: CommandAck = self.post(&session.token, &path, body).await?;
        tracing::trace!(command = name, ?ack, "command response");
        if ack.result {
            Ok(ack)
        } else {
            Err(OwnerApiError::CommandRejected { reason: ack.reason })
        }
    }
}

/// Turn a response into `T`, mapping error statuses.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, OwnerApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST {
        Err(OwnerApiError::Unauthorized {
            status: status.as_u16(),
            body,
        })
    } else {
        Err(OwnerApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn empty_body() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl VehicleApi for OwnerApiClient {
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, CarwakeError> {
        if !credentials.is_complete() {
            return Err(AuthenticationError::MissingCredentials.into());
        }
        self.request_token(credentials)
            .await
            .map_err(OwnerApiError::into_login_error)
    }

    async fn fetch_vehicle(&self, token: &AuthToken) -> Result<VehicleId, CarwakeError> {
        let vehicles: Vec<VehicleSummary> = self
            .get(token, "/api/1/vehicles")
            .await
            .map_err(|err| err.into_domain("fetch_vehicle"))?;
        let vehicle = vehicles
            .into_iter()
            .next()
            .ok_or_else(|| OwnerApiError::NoVehicles.into_domain("fetch_vehicle"))?;
        tracing::trace!(
            id = vehicle.id,
            name = vehicle.display_name.as_deref().unwrap_or_default(),
            state = vehicle.state.as_deref().unwrap_or_default(),
            "vehicle found"
        );
        Ok(VehicleId::new(vehicle.id))
    }

    async fn wake(&self, session: &Session) -> Result<VehicleState, CarwakeError> {
        let path = format!("/api/1/vehicles/{}/wake_up", session.vehicle_id);
        let response: WakeUpResponse = self
            .post(&session.token, &path, &empty_body())
            .await
            .map_err(|err| err.into_domain("wake"))?;
        Ok(response.state)
    }

    async fn fetch_vehicle_state(&self, session: &Session) -> Result<VehicleSnapshot, CarwakeError> {
        let path = format!("/api/1/vehicles/{}/vehicle_data", session.vehicle_id);
        let data: VehicleData = self
            .get(&session.token, &path)
            .await
            .map_err(|err| err.into_domain("fetch_vehicle_state"))?;
        VehicleSnapshot::try_from(data)
    }

    async fn start_climate(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(session, "auto_conditioning_start", &empty_body())
            .await
            .map_err(|err| err.into_domain("start_climate"))
    }

    async fn stop_climate(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(session, "auto_conditioning_stop", &empty_body())
            .await
            .map_err(|err| err.into_domain("stop_climate"))
    }

    async fn set_sentry_mode(
        &self,
        session: &Session,
        enabled: bool,
    ) -> Result<CommandAck, CarwakeError> {
        self.command(session, "set_sentry_mode", &SentryModeRequest { on: enabled })
            .await
            .map_err(|err| err.into_domain("set_sentry_mode"))
    }

    async fn flash_lights(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(session, "flash_lights", &empty_body())
            .await
            .map_err(|err| err.into_domain("flash_lights"))
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), CarwakeError> {
        let response = self
            .http
            .post(self.config.url("/oauth/revoke"))
            .bearer_auth(token.expose())
            .json(&RevokeRequest {
                token: token.expose(),
            })
            .send()
            .await
            .map_err(|err| OwnerApiError::from(err).into_domain("logout"))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(OwnerApiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into_domain("logout"))
        }
    }
}
