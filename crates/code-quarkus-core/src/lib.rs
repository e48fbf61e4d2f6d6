//! Shared code.quarkus domain modules.
//!
//! - `catalog`: extension entries and short-id resolution.
//! - `rank`: free-text filtering and ranking of catalog entries.
//! - `project` / `query` / `codec`: project descriptor and its shareable query string.
//! - `dispatch`: download/share links and the GitHub handoff.
//! - `api` / `cache` / `github`: backend collaborators and the owned fetch cache.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod github;
pub mod navigator;
pub mod project;
pub mod query;
pub mod rank;
pub mod validate;

pub use api::{
    ApiError, Platform, RemoteConfig, Stream, fetch_config, fetch_platform, fetch_streams,
};
pub use cache::ApiCache;
pub use catalog::{Catalog, CatalogError, ExtensionEntry};
pub use codec::{
    CLIENT_NAME, EncodeOptions, address_bar_path, decode_project, decode_project_with,
    encode_project, initial_filter, resolve_initial_project,
};
pub use config::{ConfigError, RuntimeConfig};
pub use dispatch::{AuthorizeRedirect, Dispatcher, GenerateResult, Target};
pub use github::{
    BackendGitHubClient, GitHubApiError, GitHubProjectCreator, GitHubProjectResult,
    verify_callback_state,
};
pub use navigator::{Navigator, NoopNavigator, SystemNavigator};
pub use project::{
    BuildTool, GitHubAuthorization, GitHubFlow, ProjectDescriptor, ProjectMetadata,
};
pub use query::ProjectQuery;
pub use rank::{MatchCache, compare, matches, search};
pub use validate::{ValidationError, validate_metadata};
