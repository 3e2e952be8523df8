use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

pub const PROJECT_HEADER: &str = "X-Appwrite-Project";
pub const KEY_HEADER: &str = "X-Appwrite-Key";
pub const SESSION_HEADER: &str = "X-Appwrite-Session";
const RESPONSE_FORMAT_HEADER: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.5.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API root including the version segment, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    /// Server key. Used for document access and for creating sessions, so
    /// the session secret is returned to the service.
    pub api_key: Option<String>,
}

/// Shared HTTP plumbing for every backend call.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    config: AppwriteConfig,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> Result<Self, StorageError> {
        if config.endpoint.is_empty() || config.project_id.is_empty() {
            return Err(StorageError::Config(
                "endpoint and project id are required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    /// Start a request against `path`, relative to the endpoint.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        self.http
            .request(method, url)
            .header(PROJECT_HEADER, &self.config.project_id)
            .header(RESPONSE_FORMAT_HEADER, RESPONSE_FORMAT)
    }

    /// Same as [`request`](Self::request), authenticated with the server key.
    pub fn key_request(&self, method: Method, path: &str) -> Result<RequestBuilder, StorageError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| StorageError::Config("no API key configured".to_string()))?;
        Ok(self.request(method, path).header(KEY_HEADER, key))
    }

    /// Send a request, turning error responses into [`StorageError`].
    pub async fn send(&self, req: RequestBuilder) -> Result<Response, StorageError> {
        let resp = req
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        let err = error_from_response(status, &body);
        tracing::debug!(status = status.as_u16(), error = %err, "backend returned an error");
        Err(err)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, StorageError> {
        let resp = self.send(req).await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| StorageError::UnexpectedResponse(e.to_string()))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

fn error_from_response(status: StatusCode, body: &[u8]) -> StorageError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let (kind, message) = match parsed {
        Some(b) => (b.kind, b.message),
        None => (String::new(), String::from_utf8_lossy(body).into_owned()),
    };

    match status {
        StatusCode::UNAUTHORIZED => StorageError::Unauthorized(message),
        StatusCode::NOT_FOUND => StorageError::NotFound(message),
        _ => StorageError::Backend {
            status: status.as_u16(),
            kind,
            message,
        },
    }
}
