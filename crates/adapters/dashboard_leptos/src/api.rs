//! HTTP API client wrapping `gloo-net` for calls to the telemetry server.

use std::future::Future;

use gloo_net::http::{Request, Response};
use greenhub_app::config::EndpointsConfig;
use greenhub_app::ports::{DeviceCommands, TelemetrySource};
use greenhub_domain::command::{ActuatorCommand, RenameCommand};
use greenhub_domain::error::TransportError;
use greenhub_domain::snapshot::Snapshot;
use web_sys::UrlSearchParams;

/// Error returned by API client methods.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl ApiError {
    fn into_transport(self, operation: &'static str) -> TransportError {
        TransportError::new(operation, self.message)
    }
}

/// Check the HTTP response status and extract an error if non-2xx.
fn check_response(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    Err(ApiError {
        message: format!("HTTP {}", resp.status()),
    })
}

/// Build an `application/x-www-form-urlencoded` body.
fn form_body(fields: &[(&str, &str)]) -> Result<UrlSearchParams, ApiError> {
    let params = UrlSearchParams::new().map_err(|err| ApiError {
        message: format!("{err:?}"),
    })?;
    for (key, value) in fields {
        params.append(key, value);
    }
    Ok(params)
}

/// Client for the telemetry server's endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    data_url: String,
    rename_url: String,
    actuator_url: String,
}

impl HttpClient {
    /// Create a client for the configured endpoints.
    #[must_use]
    pub fn new(endpoints: &EndpointsConfig) -> Self {
        Self {
            data_url: endpoints.data.clone(),
            rename_url: endpoints.rename.clone(),
            actuator_url: endpoints.actuator.clone(),
        }
    }

    /// Fetch the device map (`GET /data`).
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, ApiError> {
        let resp = check_response(Request::get(&self.data_url).send().await?)?;
        let snapshot: Snapshot = resp.json().await?;
        Ok(snapshot)
    }

    /// Post a form to `url`, discarding the response body.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<(), ApiError> {
        let body = form_body(fields)?;
        check_response(Request::post(url).body(body)?.send().await?)?;
        Ok(())
    }

    /// Assign a display name (`POST /rename`).
    pub async fn rename(&self, command: &RenameCommand) -> Result<(), ApiError> {
        self.post_form(&self.rename_url, &command.form_fields()).await
    }

    /// Change an actuator's mode (`POST /actuator`).
    pub async fn set_actuator(&self, command: &ActuatorCommand) -> Result<(), ApiError> {
        self.post_form(&self.actuator_url, &command.form_fields()).await
    }
}

impl TelemetrySource for HttpClient {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, TransportError>> {
        async move {
            HttpClient::fetch_snapshot(self)
                .await
                .map_err(|err| err.into_transport("fetch snapshot"))
        }
    }
}

impl DeviceCommands for HttpClient {
    fn rename(&self, command: RenameCommand) -> impl Future<Output = Result<(), TransportError>> {
        async move {
            HttpClient::rename(self, &command)
                .await
                .map_err(|err| err.into_transport("rename"))
        }
    }

    fn set_actuator(
        &self,
        command: ActuatorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> {
        async move {
            HttpClient::set_actuator(self, &command)
                .await
                .map_err(|err| err.into_transport("set actuator"))
        }
    }
}
