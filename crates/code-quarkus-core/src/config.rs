use std::collections::HashMap;

use thiserror::Error;
use url::Url;

pub const BACKEND_URL_ENV: &str = "CODE_QUARKUS_BACKEND_URL";
pub const PAGE_URL_ENV: &str = "CODE_QUARKUS_PAGE_URL";
pub const ENVIRONMENT_ENV: &str = "CODE_QUARKUS_ENVIRONMENT";
pub const GITHUB_CLIENT_ID_ENV: &str = "CODE_QUARKUS_GITHUB_CLIENT_ID";
pub const STREAM_ENV: &str = "CODE_QUARKUS_STREAM";

pub const DEFAULT_PAGE_URL: &str = "https://code.quarkus.io/";
pub const DEFAULT_ENVIRONMENT: &str = "prod";
pub const DEV_ENVIRONMENT: &str = "dev";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Backend root. Only absolute (`http…`) values are used; anything else
    /// means "same origin as the page".
    pub backend_url: String,
    /// Location of the page the share links point at.
    pub page_url: String,
    pub environment: String,
    pub github_client_id: Option<String>,
    pub stream_key: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            github_client_id: None,
            stream_key: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let backend_url = parse_backend_url(lookup(&env_map, BACKEND_URL_ENV))?;
        let page_url = parse_page_url(lookup(&env_map, PAGE_URL_ENV))?;
        let environment = lookup(&env_map, ENVIRONMENT_ENV)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Ok(Self {
            backend_url,
            page_url,
            environment,
            github_client_id: lookup(&env_map, GITHUB_CLIENT_ID_ENV).map(ToOwned::to_owned),
            stream_key: lookup(&env_map, STREAM_ENV).map(ToOwned::to_owned),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.environment == DEV_ENVIRONMENT
    }

    /// Root used for API calls and downloads, without a trailing `/`.
    pub fn backend_base(&self) -> &str {
        let base = if self.backend_url.starts_with("http") {
            self.backend_url.as_str()
        } else {
            self.page_location()
        };
        base.trim_end_matches('/')
    }

    /// Page location with any query string and fragment removed.
    pub fn page_location(&self) -> &str {
        let end = self
            .page_url
            .find(['?', '#'])
            .unwrap_or(self.page_url.len());
        &self.page_url[..end]
    }
}

fn lookup<'a>(env_map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env_map
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_backend_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(value) = raw else {
        return Ok(String::new());
    };

    if value.starts_with("http") && !is_http_url(value) {
        return Err(ConfigError::InvalidBackendUrl(value.to_string()));
    }

    Ok(value.to_string())
}

fn parse_page_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_PAGE_URL.to_string());
    };

    if !is_http_url(value) {
        return Err(ConfigError::InvalidPageUrl(value.to_string()));
    }

    Ok(value.to_string())
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid CODE_QUARKUS_BACKEND_URL: {0}")]
    InvalidBackendUrl(String),
    #[error("invalid CODE_QUARKUS_PAGE_URL: {0} (expected an http(s) URL)")]
    InvalidPageUrl(String),
}
