//! Project descriptor <-> shareable query string.
//!
//! Encoding elides fields equal to the defaults unless asked to show them;
//! decoding never fails and degrades to defaults for anything it cannot read.

use std::collections::HashSet;

use crate::catalog::{Catalog, ExtensionEntry};
use crate::project::{BuildTool, GitHubAuthorization, ProjectDescriptor, ProjectMetadata};
use crate::query::{ProjectQuery, SHORT_ID_SEPARATOR, non_empty};

/// Value of the `cn` parameter identifying links produced by this client.
pub const CLIENT_NAME: &str = "nils-code-quarkus-cli";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Append `github=true` (OAuth redirect links only).
    pub github: bool,
    /// Emit fields even when they equal the defaults.
    pub show_defaults: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            github: false,
            show_defaults: true,
        }
    }
}

impl EncodeOptions {
    pub fn with_github(mut self, github: bool) -> Self {
        self.github = github;
        self
    }

    pub fn with_show_defaults(mut self, show_defaults: bool) -> Self {
        self.show_defaults = show_defaults;
        self
    }
}

pub fn encode_project(
    project: &ProjectDescriptor,
    defaults: &ProjectDescriptor,
    options: EncodeOptions,
) -> String {
    to_project_query(project, defaults, options).to_query_string()
}

pub fn to_project_query(
    project: &ProjectDescriptor,
    defaults: &ProjectDescriptor,
    options: EncodeOptions,
) -> ProjectQuery {
    let include = |differs: bool| options.show_defaults || differs;
    let metadata = &project.metadata;
    let baseline = &defaults.metadata;

    let text_field = |value: &str, default: &str| {
        non_empty(Some(value))
            .filter(|_| include(value != default))
            .map(str::to_string)
    };

    let extensions = (!project.extensions.is_empty()
        && include(project.extensions.len() != defaults.extensions.len()))
    .then(|| project.short_ids().join(SHORT_ID_SEPARATOR));

    ProjectQuery {
        group_id: text_field(&metadata.group_id, &baseline.group_id),
        artifact_id: text_field(&metadata.artifact_id, &baseline.artifact_id),
        version: text_field(&metadata.version, &baseline.version),
        build_tool: include(metadata.build_tool != baseline.build_tool)
            .then(|| metadata.build_tool.as_str().to_string()),
        no_code: include(metadata.no_code != baseline.no_code)
            .then(|| metadata.no_code.to_string()),
        extensions,
        client_name: Some(CLIENT_NAME.to_string()),
        github: options.github.then(|| "true".to_string()),
        ..ProjectQuery::default()
    }
}

/// Decodes `query` against `catalog`; `None` means the query carried no state.
pub fn decode_project(query: &str, catalog: &Catalog) -> Option<ProjectDescriptor> {
    decode_project_with(query, catalog, || {})
}

/// Like [`decode_project`], invoking `clean_history` once after a successful
/// decode so the caller can drop the query from the address bar.
pub fn decode_project_with<F>(
    query: &str,
    catalog: &Catalog,
    clean_history: F,
) -> Option<ProjectDescriptor>
where
    F: FnOnce(),
{
    let raw = query.trim();
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }

    let params = ProjectQuery::parse(raw);
    let defaults = ProjectMetadata::default();

    let metadata = ProjectMetadata {
        group_id: text_or_default(params.group_id.as_deref(), &defaults.group_id),
        artifact_id: text_or_default(params.artifact_id.as_deref(), &defaults.artifact_id),
        version: text_or_default(params.version.as_deref(), &defaults.version),
        build_tool: params
            .build_tool
            .as_deref()
            .and_then(BuildTool::parse)
            .unwrap_or(defaults.build_tool),
        no_code: parse_flag(params.no_code.as_deref()).unwrap_or(defaults.no_code),
    };

    let project = ProjectDescriptor {
        metadata,
        extensions: resolve_extensions(&params, catalog),
        github: github_authorization(&params),
    };

    tracing::debug!(query = raw, "removing project query from address bar");
    if project.github.is_some() {
        tracing::info!("received GitHub authorization");
    }
    clean_history();

    Some(project)
}

/// Decoded project from `query`, or a fresh default one.
pub fn resolve_initial_project(query: &str, catalog: &Catalog) -> ProjectDescriptor {
    decode_project(query, catalog).unwrap_or_default()
}

/// The `extension-search` value carried by `query`, empty when absent.
pub fn initial_filter(query: &str) -> String {
    ProjectQuery::parse(query)
        .extension_search
        .unwrap_or_default()
}

/// Address-bar path reflecting the current filter and project.
///
/// The project part hides defaulted fields and never carries the GitHub flag.
pub fn address_bar_path(
    filter: &str,
    project: Option<&ProjectDescriptor>,
    defaults: &ProjectDescriptor,
) -> String {
    let mut params = match project {
        Some(project) => to_project_query(
            project,
            defaults,
            EncodeOptions::default().with_show_defaults(false),
        ),
        None => ProjectQuery::default(),
    };
    params.extension_search = non_empty(Some(filter)).map(str::to_string);

    let query = params.to_query_string();
    if query.is_empty() {
        return "/".to_string();
    }

    format!("/?{query}")
}

/// Catalog entries named by `s`, in catalog order, each id at most once.
fn resolve_extensions(params: &ProjectQuery, catalog: &Catalog) -> Vec<ExtensionEntry> {
    let tokens: HashSet<&str> = params.short_ids().into_iter().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    catalog
        .iter()
        .filter(|entry| tokens.contains(entry.short_id.as_str()))
        .filter(|entry| seen.insert(entry.id.clone()))
        .cloned()
        .collect()
}

fn github_authorization(params: &ProjectQuery) -> Option<GitHubAuthorization> {
    if !params.github_requested() {
        return None;
    }

    let code = non_empty(params.code.as_deref())?;
    let state = non_empty(params.state.as_deref())?;
    Some(GitHubAuthorization {
        code: code.to_string(),
        state: state.to_string(),
    })
}

fn text_or_default(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::fixtures::{entry, picker_catalog, picker_entries};

    fn custom_project() -> ProjectDescriptor {
        let entries = picker_entries();
        ProjectDescriptor {
            metadata: ProjectMetadata {
                group_id: "com.example".to_string(),
                artifact_id: "orders-service".to_string(),
                version: "2.1.0".to_string(),
                build_tool: BuildTool::GradleKotlinDsl,
                no_code: true,
            },
            extensions: vec![entries[0].clone(), entries[2].clone()],
            github: None,
        }
    }

    #[test]
    fn encode_hides_defaults_when_asked() {
        let query = encode_project(
            &ProjectDescriptor::default(),
            &ProjectDescriptor::default(),
            EncodeOptions::default().with_show_defaults(false),
        );

        assert_eq!(query, format!("cn={CLIENT_NAME}"));
    }

    #[test]
    fn encode_shows_every_field_by_default() {
        let query = encode_project(
            &ProjectDescriptor::default(),
            &ProjectDescriptor::default(),
            EncodeOptions::default(),
        );

        assert_eq!(
            query,
            format!("g=org.acme&a=code-with-quarkus&v=1.0.0-SNAPSHOT&b=MAVEN&ne=false&cn={CLIENT_NAME}")
        );
    }

    #[test]
    fn encode_emits_only_changed_fields_in_fixed_order() {
        let mut project = ProjectDescriptor::default();
        project.metadata.no_code = true;
        project.metadata.artifact_id = "orders".to_string();
        project.toggle_extension(&picker_entries()[1]);

        let query = encode_project(
            &project,
            &ProjectDescriptor::default(),
            EncodeOptions::default().with_show_defaults(false),
        );

        assert_eq!(query, format!("a=orders&ne=true&s=9Ru&cn={CLIENT_NAME}"));
    }

    #[test]
    fn encode_keeps_selection_order_and_appends_github_flag() {
        let entries = picker_entries();
        let mut project = ProjectDescriptor::default();
        project.toggle_extension(&entries[2]);
        project.toggle_extension(&entries[0]);

        let query = encode_project(
            &project,
            &ProjectDescriptor::default(),
            EncodeOptions::default()
                .with_show_defaults(false)
                .with_github(true),
        );

        assert_eq!(query, format!("s=xTq.ZmM&cn={CLIENT_NAME}&github=true"));
    }

    #[test]
    fn encode_compares_against_supplied_defaults() {
        let mut defaults = ProjectDescriptor::default();
        defaults.metadata.group_id = "io.acme".to_string();

        let query = encode_project(
            &ProjectDescriptor::default(),
            &defaults,
            EncodeOptions::default().with_show_defaults(false),
        );

        assert_eq!(query, format!("g=org.acme&cn={CLIENT_NAME}"));
    }

    #[test]
    fn encode_never_emits_empty_text_fields() {
        let mut project = ProjectDescriptor::default();
        project.metadata.version = String::new();

        let query = encode_project(&project, &ProjectDescriptor::default(), EncodeOptions::default());
        assert!(!query.contains("v="), "empty version should be omitted: {query}");
    }

    #[test]
    fn decode_of_empty_query_is_none() {
        let catalog = picker_catalog();
        assert_eq!(decode_project("", &catalog), None);
        assert_eq!(decode_project("?", &catalog), None);
    }

    #[test]
    fn decode_of_encoded_default_is_populated_default() {
        let catalog = picker_catalog();
        let query = encode_project(
            &ProjectDescriptor::default(),
            &ProjectDescriptor::default(),
            EncodeOptions::default(),
        );

        assert_eq!(
            decode_project(&query, &catalog),
            Some(ProjectDescriptor::default())
        );
    }

    #[test]
    fn round_trip_with_visible_defaults_restores_project() {
        let catalog = picker_catalog();
        let project = custom_project();
        let query = encode_project(&project, &ProjectDescriptor::default(), EncodeOptions::default());

        assert_eq!(decode_project(&query, &catalog), Some(project));
    }

    #[test]
    fn round_trip_with_github_flag_restores_project_without_authorization() {
        let catalog = picker_catalog();
        let mut project = custom_project();
        project.metadata.version = "1.0 & +beta".to_string();
        project.extensions = picker_entries();
        let query = encode_project(
            &project,
            &ProjectDescriptor::default(),
            EncodeOptions::default().with_github(true),
        );

        assert!(query.contains("s=ZmM.9Ru.xTq"), "{query}");
        assert!(query.contains("github=true"), "{query}");
        assert_eq!(decode_project(&query, &catalog), Some(project));
    }

    #[test]
    fn round_trip_with_hidden_defaults_restores_project() {
        let catalog = picker_catalog();
        let mut project = ProjectDescriptor::default();
        project.metadata.build_tool = BuildTool::Gradle;
        let query = encode_project(
            &project,
            &ProjectDescriptor::default(),
            EncodeOptions::default().with_show_defaults(false),
        );

        assert_eq!(decode_project(&query, &catalog), Some(project));
    }

    #[test]
    fn decode_rebuilds_extension_order_from_catalog() {
        let catalog = picker_catalog();
        let decoded = decode_project("s=xTq.ZmM", &catalog).expect("project");

        assert_eq!(decoded.short_ids(), vec!["ZmM", "xTq"]);
    }

    #[test]
    fn decode_drops_duplicate_tokens() {
        let catalog = picker_catalog();
        let decoded = decode_project("s=ZmM.ZmM", &catalog).expect("project");

        assert_eq!(decoded.short_ids(), vec!["ZmM"]);
    }

    #[test]
    fn decode_keeps_first_catalog_entry_for_repeated_id() {
        let arc = entry("io.quarkus:quarkus-arc", "ZmM", "ArC", 0);
        let catalog = Catalog::new(vec![arc.clone(), arc.clone()]).expect("catalog");

        let decoded = decode_project("s=ZmM", &catalog).expect("project");
        assert_eq!(decoded.extensions, vec![arc]);
    }

    #[test]
    fn decode_drops_unknown_tokens() {
        let catalog = picker_catalog();

        let decoded = decode_project("s=doesNotExist", &catalog).expect("project");
        assert!(decoded.extensions.is_empty());

        let decoded = decode_project("s=doesNotExist.9Ru", &catalog).expect("project");
        assert_eq!(decoded.short_ids(), vec!["9Ru"]);
    }

    #[test]
    fn decode_falls_back_to_defaults_for_missing_or_invalid_fields() {
        let catalog = picker_catalog();
        let decoded = decode_project("g=&b=ANT&ne=maybe&a=demo", &catalog).expect("project");

        assert_eq!(
            decoded.metadata,
            ProjectMetadata {
                artifact_id: "demo".to_string(),
                ..ProjectMetadata::default()
            }
        );
    }

    #[test]
    fn decode_reads_github_callback_only_with_flag_code_and_state() {
        let catalog = picker_catalog();

        let decoded =
            decode_project("github=true&code=c0de&state=5tate", &catalog).expect("project");
        assert_eq!(
            decoded.github,
            Some(GitHubAuthorization {
                code: "c0de".to_string(),
                state: "5tate".to_string(),
            })
        );

        let without_flag = decode_project("code=c0de&state=5tate", &catalog).expect("project");
        assert_eq!(without_flag.github, None);

        let without_state = decode_project("github=true&code=c0de", &catalog).expect("project");
        assert_eq!(without_state.github, None);
    }

    #[test]
    fn decode_invokes_clean_history_once_per_successful_decode() {
        let catalog = picker_catalog();
        let calls = Cell::new(0);

        decode_project_with("a=demo", &catalog, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 1);

        decode_project_with("", &catalog, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 1, "empty query is not a decode");
    }

    #[test]
    fn resolve_initial_project_substitutes_default() {
        let catalog = picker_catalog();
        assert_eq!(
            resolve_initial_project("", &catalog),
            ProjectDescriptor::default()
        );
    }

    #[test]
    fn initial_filter_reads_extension_search() {
        assert_eq!(initial_filter("?extension-search=rest%20client"), "rest client");
        assert_eq!(initial_filter("g=org.acme"), "");
    }

    #[test]
    fn address_bar_path_combines_project_and_filter() {
        let defaults = ProjectDescriptor::default();
        let mut project = ProjectDescriptor::default();
        project.toggle_extension(&picker_entries()[0]);

        assert_eq!(address_bar_path("", None, &defaults), "/");
        assert_eq!(
            address_bar_path("cdi", None, &defaults),
            "/?extension-search=cdi"
        );
        assert_eq!(
            address_bar_path("", Some(&project), &defaults),
            format!("/?s=ZmM&cn={CLIENT_NAME}")
        );
        assert_eq!(
            address_bar_path("cdi", Some(&project), &defaults),
            format!("/?s=ZmM&cn={CLIENT_NAME}&extension-search=cdi")
        );
    }
}
