//! Turns a project into download/share links or hands it to GitHub.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::codec::{EncodeOptions, encode_project};
use crate::config::RuntimeConfig;
use crate::github::{GitHubApiError, GitHubProjectCreator, authorize_url, state_token_with_rng};
use crate::navigator::Navigator;
use crate::project::{GitHubFlow, ProjectDescriptor};

pub const DOWNLOAD_PATH: &str = "/d";
pub const DOWNLOAD_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Target {
    Download,
    Share,
    Github,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub target: Target,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// Authorize redirect produced by [`Dispatcher::create_on_github`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRedirect {
    pub url: String,
    pub state: String,
}

impl AuthorizeRedirect {
    pub fn flow(&self) -> GitHubFlow {
        GitHubFlow::AwaitingCallback {
            state: self.state.clone(),
        }
    }
}

pub struct Dispatcher<'a> {
    config: &'a RuntimeConfig,
    defaults: ProjectDescriptor,
    navigator: &'a dyn Navigator,
    github: &'a dyn GitHubProjectCreator,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        config: &'a RuntimeConfig,
        navigator: &'a dyn Navigator,
        github: &'a dyn GitHubProjectCreator,
    ) -> Self {
        Self {
            config,
            defaults: ProjectDescriptor::default(),
            navigator,
            github,
        }
    }

    pub fn download_url(&self, project: &ProjectDescriptor) -> String {
        format!(
            "{}{DOWNLOAD_PATH}?{}",
            self.config.backend_base(),
            self.encode(project, false)
        )
    }

    pub fn share_url(&self, project: &ProjectDescriptor, github: bool) -> String {
        format!(
            "{}?{}",
            self.config.page_location(),
            self.encode(project, github)
        )
    }

    pub fn generate(
        &self,
        project: &ProjectDescriptor,
        target: Target,
    ) -> Result<GenerateResult, GitHubApiError> {
        match target {
            Target::Download => {
                let url = self.download_url(project);
                if self.config.is_dev() {
                    tracing::debug!("dev environment, not opening download");
                } else {
                    self.navigator.open_deferred(&url, DOWNLOAD_DELAY);
                }
                Ok(GenerateResult {
                    target,
                    url,
                    share_url: Some(self.share_url(project, false)),
                })
            }
            Target::Share => {
                let url = self.share_url(project, false);
                Ok(GenerateResult {
                    target,
                    share_url: Some(url.clone()),
                    url,
                })
            }
            Target::Github => {
                let result = self.github.create_project(project)?;
                tracing::info!(url = %result.url, "project pushed to GitHub");
                Ok(GenerateResult {
                    target,
                    url: result.url,
                    share_url: None,
                })
            }
        }
    }

    /// Starts the OAuth round trip with a full-page redirect to GitHub.
    pub fn create_on_github(
        &self,
        project: &ProjectDescriptor,
        client_id: &str,
    ) -> AuthorizeRedirect {
        let mut rng = rand::rng();
        self.create_on_github_with_rng(project, client_id, &mut rng)
    }

    pub fn create_on_github_with_rng<R: Rng + ?Sized>(
        &self,
        project: &ProjectDescriptor,
        client_id: &str,
        rng: &mut R,
    ) -> AuthorizeRedirect {
        let state = state_token_with_rng(rng);
        let url = authorize_url(&self.share_url(project, true), client_id, &state);
        self.navigator.redirect(&url);
        AuthorizeRedirect { url, state }
    }

    fn encode(&self, project: &ProjectDescriptor, github: bool) -> String {
        encode_project(
            project,
            &self.defaults,
            EncodeOptions::default().with_github(github),
        )
    }
}
