use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use code_quarkus_cli::feedback;
use code_quarkus_core::{
    ApiCache, ApiError, BackendGitHubClient, BuildTool, Catalog, ConfigError, Dispatcher,
    EncodeOptions, GitHubApiError, GitHubProjectCreator, Navigator, NoopNavigator, Platform,
    ProjectDescriptor, ProjectMetadata, RemoteConfig, RuntimeConfig, Stream, SystemNavigator, Target,
    ValidationError, address_bar_path, decode_project, encode_project, fetch_config,
    fetch_platform, fetch_streams, initial_filter, resolve_initial_project, search, validate_metadata,
    verify_callback_state,
};

const LOG_ENV: &str = "CODE_QUARKUS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(author, version, about = "code.quarkus project link CLI")]
struct Cli {
    /// Read the extension catalog from a JSON file instead of the backend.
    #[arg(long, global = true)]
    catalog_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank catalog extensions and print Alfred feedback JSON.
    Search {
        /// Free-text filter; empty lists every extension.
        #[arg(long, default_value = "")]
        query: String,
        /// Project query holding the current selection.
        #[arg(long)]
        selection: Option<String>,
    },
    /// Print the shareable query string for a project.
    Encode {
        #[arg(long)]
        group_id: Option<String>,
        #[arg(long)]
        artifact_id: Option<String>,
        #[arg(long)]
        version: Option<String>,
        /// MAVEN, GRADLE or GRADLE_KOTLIN_DSL.
        #[arg(long, value_parser = parse_build_tool)]
        build_tool: Option<BuildTool>,
        #[arg(long)]
        no_code: bool,
        /// Extension id or short id; repeat to select several.
        #[arg(long = "extension")]
        extensions: Vec<String>,
        /// Omit fields that equal the defaults.
        #[arg(long)]
        hide_defaults: bool,
        /// Mark the link as a GitHub authorize redirect.
        #[arg(long)]
        github: bool,
    },
    /// Decode a project query and print the project as JSON.
    Decode {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Produce the download or share link, or push the project to GitHub.
    Generate {
        #[arg(long, value_enum)]
        target: TargetArg,
        #[arg(long, default_value = "")]
        query: String,
        /// Open the download link in the browser.
        #[arg(long)]
        open: bool,
        /// State token issued by `authorize`; required for `--target github`.
        #[arg(long)]
        expected_state: Option<String>,
    },
    /// Build the GitHub authorize redirect for a project.
    Authorize {
        #[arg(long, default_value = "")]
        query: String,
        /// Open the authorize page in the browser.
        #[arg(long)]
        open: bool,
        /// OAuth client id; falls back to the environment, then the backend config.
        #[arg(long)]
        client_id: Option<String>,
    },
    /// List platform streams and print Alfred feedback JSON.
    Streams,
    /// Print the address-bar path for a filter and project.
    AddressBar {
        /// Extension filter; defaults to the query's `extension-search`.
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    Download,
    Share,
    Github,
}

impl From<TargetArg> for Target {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Download => Target::Download,
            TargetArg::Share => Target::Share,
            TargetArg::Github => Target::Github,
        }
    }
}

fn parse_build_tool(input: &str) -> Result<BuildTool, String> {
    BuildTool::parse(input).ok_or_else(|| {
        let expected: Vec<&str> = BuildTool::all().iter().map(|tool| tool.as_str()).collect();
        format!("unknown build tool '{input}' (expected {})", expected.join(", "))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, PartialEq, Eq)]
struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    fn user(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            message: message.into(),
        }
    }

    fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
        }
    }

    fn from_config(error: ConfigError) -> Self {
        AppError::user(error.to_string())
    }

    fn from_validation(error: ValidationError) -> Self {
        AppError::user(error.to_string())
    }

    fn from_api(error: ApiError) -> Self {
        AppError::runtime(error.to_string())
    }

    fn from_github(error: GitHubApiError) -> Self {
        match error {
            GitHubApiError::StateMismatch | GitHubApiError::MissingAuthorization => {
                AppError::user(error.to_string())
            }
            GitHubApiError::Http { status, message } => {
                AppError::runtime(format!("github project error ({status}): {message}"))
            }
            GitHubApiError::Transport { .. } => {
                AppError::runtime("github project request failed".to_string())
            }
            GitHubApiError::InvalidResponse(_) => {
                AppError::runtime("invalid github project response".to_string())
            }
        }
    }

    fn serialize(error: serde_json::Error) -> Self {
        AppError::runtime(format!("failed to serialize output: {error}"))
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}

/// Side-effecting collaborators handed to [`run_with`].
struct Host<'a> {
    navigator: &'a dyn Navigator,
    github: &'a dyn GitHubProjectCreator,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
        }
        Err(error) => {
            eprintln!("error: {}", error.message);
            std::process::exit(error.exit_code());
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<String, AppError> {
    let config = RuntimeConfig::from_env().map_err(AppError::from_config)?;
    let navigator = SystemNavigator::default();
    let github = BackendGitHubClient::new(&config);
    let host = Host {
        navigator: &navigator,
        github: &github,
    };

    run_with(cli, &config, fetch_platform, fetch_streams, fetch_config, &host)
}

fn run_with<LoadPlatform, LoadStreams, LoadRemoteConfig>(
    cli: Cli,
    config: &RuntimeConfig,
    load_platform: LoadPlatform,
    load_streams: LoadStreams,
    load_remote_config: LoadRemoteConfig,
    host: &Host<'_>,
) -> Result<String, AppError>
where
    LoadPlatform: Fn(&RuntimeConfig) -> Result<Platform, ApiError>,
    LoadStreams: Fn(&RuntimeConfig) -> Result<Vec<Stream>, ApiError>,
    LoadRemoteConfig: Fn(&RuntimeConfig) -> Result<RemoteConfig, ApiError>,
{
    let mut cache = match cli.catalog_file.as_deref() {
        Some(path) => ApiCache::with_platform(read_catalog_file(path)?),
        None => ApiCache::new(),
    };
    let defaults = ProjectDescriptor::default();

    match cli.command {
        Commands::Search { query, selection } => {
            let catalog = match load_catalog(&mut cache, config, &load_platform) {
                Ok(catalog) => catalog,
                Err(error) if error.kind == ErrorKind::Runtime => {
                    return feedback::error_feedback(&error.message)
                        .to_json()
                        .map_err(AppError::serialize);
                }
                Err(error) => return Err(error),
            };

            let project = resolve_initial_project(selection.as_deref().unwrap_or_default(), catalog);
            let results = search(catalog, &query);
            tracing::debug!(query = %query, results = results.len(), "ranked extensions");

            feedback::extensions_to_feedback(&results, &project)
                .to_json()
                .map_err(AppError::serialize)
        }
        Commands::Encode {
            group_id,
            artifact_id,
            version,
            build_tool,
            no_code,
            extensions,
            hide_defaults,
            github,
        } => {
            let mut metadata = ProjectMetadata::default();
            if let Some(group_id) = group_id {
                metadata.group_id = group_id;
            }
            if let Some(artifact_id) = artifact_id {
                metadata.artifact_id = artifact_id;
            }
            if let Some(version) = version {
                metadata.version = version;
            }
            if let Some(build_tool) = build_tool {
                metadata.build_tool = build_tool;
            }
            metadata.no_code = no_code;

            let mut project = ProjectDescriptor::new(metadata);
            if !extensions.is_empty() {
                let catalog = load_catalog(&mut cache, config, &load_platform)?;
                for key in &extensions {
                    let entry = catalog
                        .lookup(key)
                        .ok_or_else(|| AppError::user(format!("unknown extension: {key}")))?;
                    if !project.is_selected(&entry.id) {
                        project.toggle_extension(entry);
                    }
                }
            }

            let options = EncodeOptions::default()
                .with_github(github)
                .with_show_defaults(!hide_defaults);
            Ok(encode_project(&project, &defaults, options))
        }
        Commands::Decode { query } => {
            let catalog = load_catalog(&mut cache, config, &load_platform)?;
            let project = resolve_initial_project(&query, catalog);
            serde_json::to_string(&project).map_err(AppError::serialize)
        }
        Commands::Generate {
            target,
            query,
            open,
            expected_state,
        } => {
            let catalog = load_catalog(&mut cache, config, &load_platform)?;
            let project = resolve_initial_project(&query, catalog);
            validate_metadata(&project.metadata).map_err(AppError::from_validation)?;

            let target = Target::from(target);
            if target == Target::Github {
                let auth = project.github.as_ref().ok_or_else(|| {
                    AppError::user("query carries no GitHub authorization (github, code, state)")
                })?;
                let expected_state = expected_state.as_deref().ok_or_else(|| {
                    AppError::user("--expected-state is required for the github target")
                })?;
                verify_callback_state(expected_state, auth).map_err(AppError::from_github)?;
            }

            let dispatcher = Dispatcher::new(config, navigator_for(open, host), host.github);
            let result = dispatcher
                .generate(&project, target)
                .map_err(AppError::from_github)?;
            serde_json::to_string(&result).map_err(AppError::serialize)
        }
        Commands::Authorize {
            query,
            open,
            client_id,
        } => {
            let catalog = load_catalog(&mut cache, config, &load_platform)?;
            let project = resolve_initial_project(&query, catalog);
            validate_metadata(&project.metadata).map_err(AppError::from_validation)?;

            let client_id = match client_id.or_else(|| config.github_client_id.clone()) {
                Some(client_id) => client_id,
                None => cache
                    .config(|| load_remote_config(config))
                    .map_err(AppError::from_api)?
                    .github_client_id
                    .clone()
                    .ok_or_else(|| AppError::user("GitHub client id is not configured"))?,
            };

            let dispatcher = Dispatcher::new(config, navigator_for(open, host), host.github);
            let redirect = dispatcher.create_on_github(&project, &client_id);
            serde_json::to_string(&redirect).map_err(AppError::serialize)
        }
        Commands::Streams => {
            let streams = load_streams(config).map_err(AppError::from_api)?;
            tracing::debug!(streams = streams.len(), "fetched platform streams");

            feedback::streams_to_feedback(&streams, config.stream_key.as_deref())
                .to_json()
                .map_err(AppError::serialize)
        }
        Commands::AddressBar { filter, query } => {
            let filter = filter
                .or_else(|| query.as_deref().map(initial_filter))
                .unwrap_or_default();
            let project = match query.as_deref() {
                Some(query) => {
                    let catalog = load_catalog(&mut cache, config, &load_platform)?;
                    decode_project(query, catalog)
                }
                None => None,
            };

            Ok(address_bar_path(&filter, project.as_ref(), &defaults))
        }
    }
}

fn navigator_for<'a>(open: bool, host: &Host<'a>) -> &'a dyn Navigator {
    if open { host.navigator } else { &NoopNavigator }
}

fn load_catalog<'c, LoadPlatform>(
    cache: &'c mut ApiCache,
    config: &RuntimeConfig,
    load_platform: &LoadPlatform,
) -> Result<&'c Catalog, AppError>
where
    LoadPlatform: Fn(&RuntimeConfig) -> Result<Platform, ApiError>,
{
    let platform = cache
        .platform(|| load_platform(config))
        .map_err(AppError::from_api)?;
    Ok(&platform.catalog)
}

fn read_catalog_file(path: &Path) -> Result<Platform, AppError> {
    let body = std::fs::read_to_string(path).map_err(|err| {
        AppError::user(format!(
            "failed to read catalog file {}: {err}",
            path.display()
        ))
    })?;
    let catalog = Catalog::from_json(&body).map_err(|err| {
        AppError::user(format!("invalid catalog file {}: {err}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), extensions = catalog.len(), "loaded catalog file");
    Ok(Platform {
        catalog,
    })
}
