use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::config::RuntimeConfig;

pub const EXTENSIONS_PATH: &str = "/api/extensions";
pub const STREAMS_PATH: &str = "/api/streams";
pub const CONFIG_PATH: &str = "/api/config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub key: String,
    #[serde(default)]
    pub quarkus_core_version: String,
    #[serde(default)]
    pub recommended: bool,
}

/// Extension catalog resolved for the configured stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub quarkus_platform_version: String,
    #[serde(default)]
    pub git_commit_id: String,
    #[serde(default, rename = "gitHubClientId")]
    pub github_client_id: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Extensions,
    Streams,
    Config,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Extensions => "Quarkus extension list",
            Self::Streams => "Quarkus stream list",
            Self::Config => "Quarkus config",
        };
        f.write_str(label)
    }
}

pub fn extensions_url(config: &RuntimeConfig) -> String {
    let base = config.backend_base();
    match config.stream_key.as_deref() {
        Some(stream_key) => format!("{base}{EXTENSIONS_PATH}/stream/{stream_key}"),
        None => format!("{base}{EXTENSIONS_PATH}"),
    }
}

pub fn fetch_platform(config: &RuntimeConfig) -> Result<Platform, ApiError> {
    let client = reqwest::blocking::Client::new();
    let (status, body) = get_text(&client, &extensions_url(config), Resource::Extensions)?;
    let catalog = parse_extensions_response(status, &body)?;

    tracing::debug!(extensions = catalog.len(), "fetched extension catalog");
    Ok(Platform { catalog })
}

/// Platform streams offered by the backend; their keys are valid
/// `CODE_QUARKUS_STREAM` values.
pub fn fetch_streams(config: &RuntimeConfig) -> Result<Vec<Stream>, ApiError> {
    let client = reqwest::blocking::Client::new();
    let url = format!("{}{STREAMS_PATH}", config.backend_base());
    let (status, body) = get_text(&client, &url, Resource::Streams)?;
    parse_streams_response(status, &body)
}

pub fn fetch_config(config: &RuntimeConfig) -> Result<RemoteConfig, ApiError> {
    let client = reqwest::blocking::Client::new();
    let url = format!("{}{CONFIG_PATH}", config.backend_base());
    let (status, body) = get_text(&client, &url, Resource::Config)?;
    parse_config_response(status, &body)
}

fn get_text(
    client: &reqwest::blocking::Client,
    url: &str,
    resource: Resource,
) -> Result<(u16, String), ApiError> {
    let response = client
        .get(url)
        .send()
        .map_err(|source| ApiError::Transport { resource, source })?;

    let status_code = response.status().as_u16();
    let body = response
        .text()
        .map_err(|source| ApiError::Transport { resource, source })?;

    Ok((status_code, body))
}

pub fn parse_extensions_response(status_code: u16, body: &str) -> Result<Catalog, ApiError> {
    ensure_success(Resource::Extensions, status_code, body)?;
    Ok(Catalog::from_json(body)?)
}

pub fn parse_streams_response(status_code: u16, body: &str) -> Result<Vec<Stream>, ApiError> {
    ensure_success(Resource::Streams, status_code, body)?;
    serde_json::from_str(body).map_err(|source| ApiError::InvalidResponse {
        resource: Resource::Streams,
        source,
    })
}

pub fn parse_config_response(status_code: u16, body: &str) -> Result<RemoteConfig, ApiError> {
    ensure_success(Resource::Config, status_code, body)?;
    serde_json::from_str(body).map_err(|source| ApiError::InvalidResponse {
        resource: Resource::Config,
        source,
    })
}

fn ensure_success(resource: Resource, status_code: u16, body: &str) -> Result<(), ApiError> {
    if (200..=299).contains(&status_code) {
        return Ok(());
    }

    let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {status_code}"));
    Err(ApiError::Http {
        resource,
        status: status_code,
        message,
    })
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    [
        value.get("message").and_then(serde_json::Value::as_str),
        value.get("details").and_then(serde_json::Value::as_str),
        value.get("error").and_then(serde_json::Value::as_str),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|value| !value.is_empty())
    .map(ToOwned::to_owned)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to fetch the {resource} from the api")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to load the {resource} ({status}): {message}")]
    Http {
        resource: Resource,
        status: u16,
        message: String,
    },
    #[error("invalid {resource} response")]
    InvalidResponse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid extension catalog: {0}")]
    Catalog(#[from] CatalogError),
}
