//! GitHub collaborators: OAuth authorize links, callback verification and
//! remote project creation through the backend.

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

use crate::api::extract_error_message;
use crate::config::RuntimeConfig;
use crate::project::{GitHubAuthorization, ProjectDescriptor};

pub const AUTHORIZE_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_SCOPE: &str = "public_repo,workflow";
pub const PROJECT_PATH: &str = "/api/github/project";

const CODE_HEADER: &str = "GitHub-Code";
const STATE_HEADER: &str = "GitHub-State";
const STATE_TOKEN_LEN: usize = 16;
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Creates a repository-backed project remotely.
pub trait GitHubProjectCreator {
    fn create_project(
        &self,
        project: &ProjectDescriptor,
    ) -> Result<GitHubProjectResult, GitHubApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubProjectResult {
    pub url: String,
}

/// Body sent to the backend when pushing a project to GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest<'a> {
    pub group_id: &'a str,
    pub artifact_id: &'a str,
    pub version: &'a str,
    pub build_tool: &'static str,
    pub no_code: bool,
    pub extensions: Vec<&'a str>,
}

impl<'a> ProjectRequest<'a> {
    pub fn from_project(project: &'a ProjectDescriptor) -> Self {
        let metadata = &project.metadata;
        Self {
            group_id: &metadata.group_id,
            artifact_id: &metadata.artifact_id,
            version: &metadata.version,
            build_tool: metadata.build_tool.as_str(),
            no_code: metadata.no_code,
            extensions: project
                .extensions
                .iter()
                .map(|entry| entry.id.as_str())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendGitHubClient {
    endpoint: String,
}

impl BackendGitHubClient {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            endpoint: format!("{}{PROJECT_PATH}", config.backend_base()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GitHubProjectCreator for BackendGitHubClient {
    fn create_project(
        &self,
        project: &ProjectDescriptor,
    ) -> Result<GitHubProjectResult, GitHubApiError> {
        let auth = project
            .github
            .as_ref()
            .ok_or(GitHubApiError::MissingAuthorization)?;

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .header(CODE_HEADER, auth.code.as_str())
            .header(STATE_HEADER, auth.state.as_str())
            .json(&ProjectRequest::from_project(project))
            .send()
            .map_err(|source| GitHubApiError::Transport { source })?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .map_err(|source| GitHubApiError::Transport { source })?;

        parse_project_response(status_code, &body)
    }
}

pub fn parse_project_response(
    status_code: u16,
    body: &str,
) -> Result<GitHubProjectResult, GitHubApiError> {
    if !(200..=299).contains(&status_code) {
        let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {status_code}"));
        return Err(GitHubApiError::Http {
            status: status_code,
            message,
        });
    }

    serde_json::from_str(body).map_err(GitHubApiError::InvalidResponse)
}

/// Rejects a callback whose `state` differs from the token sent with the
/// authorize redirect.
pub fn verify_callback_state(
    expected_state: &str,
    auth: &GitHubAuthorization,
) -> Result<(), GitHubApiError> {
    if expected_state.is_empty() || auth.state != expected_state {
        tracing::warn!("GitHub callback state does not match the authorize request");
        return Err(GitHubApiError::StateMismatch);
    }

    Ok(())
}

pub fn authorize_url(redirect_uri: &str, client_id: &str, state: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("client_id", client_id)
        .append_pair("scope", GITHUB_SCOPE)
        .append_pair("state", state)
        .finish();

    format!("{AUTHORIZE_ENDPOINT}?{query}")
}

pub fn new_state_token() -> String {
    let mut rng = rand::rng();
    state_token_with_rng(&mut rng)
}

pub fn state_token_with_rng<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..STATE_TOKEN_LEN)
        .map(|_| char::from(BASE36_DIGITS[rng.random_range(0..BASE36_DIGITS.len())]))
        .collect()
}

#[derive(Debug, Error)]
pub enum GitHubApiError {
    #[error("github project request failed")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("github project error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("invalid github project response")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("project carries no GitHub authorization")]
    MissingAuthorization,
    #[error("GitHub callback state mismatch")]
    StateMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::picker_entries;
    use crate::project::BuildTool;

    fn authorization(state: &str) -> GitHubAuthorization {
        GitHubAuthorization {
            code: "c0de".to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn project_request_lists_extension_ids_in_selection_order() {
        let entries = picker_entries();
        let mut project = ProjectDescriptor::default();
        project.metadata.build_tool = BuildTool::Gradle;
        project.toggle_extension(&entries[2]);
        project.toggle_extension(&entries[0]);

        let value = serde_json::to_value(ProjectRequest::from_project(&project))
            .expect("serialize request");

        assert_eq!(value["groupId"], "org.acme");
        assert_eq!(value["buildTool"], "GRADLE");
        assert_eq!(value["noCode"], false);
        assert_eq!(
            value["extensions"],
            serde_json::json!(["some-id", "io.quarkus:quarkus-arc"])
        );
    }

    #[test]
    fn backend_client_posts_to_project_endpoint() {
        let client = BackendGitHubClient::new(&RuntimeConfig::default());
        assert_eq!(
            client.endpoint(),
            "https://code.quarkus.io/api/github/project"
        );
    }

    #[test]
    fn backend_client_requires_authorization_before_any_request() {
        let client = BackendGitHubClient::new(&RuntimeConfig::default());
        let err = client
            .create_project(&ProjectDescriptor::default())
            .expect_err("missing authorization should fail");

        assert!(matches!(err, GitHubApiError::MissingAuthorization));
    }

    #[test]
    fn parse_project_response_extracts_url() {
        let result = parse_project_response(200, r#"{"url": "https://github.com/acme/demo"}"#)
            .expect("response should parse");
        assert_eq!(result.url, "https://github.com/acme/demo");
    }

    #[test]
    fn parse_project_response_surfaces_http_error() {
        let err = parse_project_response(401, r#"{"message": "Bad credentials"}"#)
            .expect_err("non-2xx should fail");

        match err {
            GitHubApiError::Http { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn verify_callback_state_fails_closed() {
        assert!(verify_callback_state("abc", &authorization("abc")).is_ok());
        assert!(matches!(
            verify_callback_state("abc", &authorization("abd")),
            Err(GitHubApiError::StateMismatch)
        ));
        assert!(matches!(
            verify_callback_state("", &authorization("")),
            Err(GitHubApiError::StateMismatch)
        ));
    }

    #[test]
    fn authorize_url_encodes_redirect_and_fixed_scope() {
        let url = authorize_url(
            "https://code.quarkus.io/?cn=web&github=true",
            "client-1",
            "s7ate",
        );

        assert_eq!(
            url,
            "https://github.com/login/oauth/authorize?redirect_uri=https%3A%2F%2Fcode.quarkus.io%2F%3Fcn%3Dweb%26github%3Dtrue&client_id=client-1&scope=public_repo%2Cworkflow&state=s7ate"
        );
    }

    #[test]
    fn state_tokens_are_base36_and_vary() {
        let first = new_state_token();
        let second = new_state_token();

        assert_eq!(first.len(), STATE_TOKEN_LEN);
        assert!(
            first
                .chars()
                .all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase())
        );
        assert_ne!(first, second);
    }
}
