use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ExtensionEntry;

pub const DEFAULT_GROUP_ID: &str = "org.acme";
pub const DEFAULT_ARTIFACT_ID: &str = "code-with-quarkus";
pub const DEFAULT_VERSION: &str = "1.0.0-SNAPSHOT";

const ALL_BUILD_TOOLS: [BuildTool; 3] = [
    BuildTool::Maven,
    BuildTool::Gradle,
    BuildTool::GradleKotlinDsl,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildTool {
    #[default]
    Maven,
    Gradle,
    GradleKotlinDsl,
}

impl BuildTool {
    pub fn all() -> &'static [BuildTool] {
        &ALL_BUILD_TOOLS
    }

    /// Parses the wire value (`MAVEN`, `GRADLE`, `GRADLE_KOTLIN_DSL`), ignoring case.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|tool| tool.as_str() == normalized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maven => "MAVEN",
            Self::Gradle => "GRADLE",
            Self::GradleKotlinDsl => "GRADLE_KOTLIN_DSL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Maven => "Maven",
            Self::Gradle => "Gradle (Preview)",
            Self::GradleKotlinDsl => "Gradle with Kotlin DSL (Preview)",
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub build_tool: BuildTool,
    /// Generate the project without example code (`ne` on the wire).
    #[serde(alias = "noExamples")]
    pub no_code: bool,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            group_id: DEFAULT_GROUP_ID.to_string(),
            artifact_id: DEFAULT_ARTIFACT_ID.to_string(),
            version: DEFAULT_VERSION.to_string(),
            build_tool: BuildTool::Maven,
            no_code: false,
        }
    }
}

/// OAuth callback payload carried back from the GitHub authorize redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubAuthorization {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    pub metadata: ProjectMetadata,
    /// Selected extensions in click order, without duplicate ids.
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubAuthorization>,
}

impl ProjectDescriptor {
    pub fn new(metadata: ProjectMetadata) -> Self {
        Self {
            metadata,
            extensions: Vec::new(),
            github: None,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.extensions.iter().any(|entry| entry.id == id)
    }

    /// Appends `entry` to the selection, or removes it when already selected.
    /// Returns whether the entry is selected afterwards.
    pub fn toggle_extension(&mut self, entry: &ExtensionEntry) -> bool {
        if self.is_selected(&entry.id) {
            self.extensions.retain(|selected| selected.id != entry.id);
            return false;
        }

        self.extensions.push(entry.clone());
        true
    }

    pub fn short_ids(&self) -> Vec<&str> {
        self.extensions
            .iter()
            .map(|entry| entry.short_id.as_str())
            .collect()
    }
}

/// Where a descriptor stands in the GitHub authorize round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubFlow {
    NoGitHubIntent,
    AwaitingCallback { state: String },
    CallbackReceived { code: String, state: String },
}

impl GitHubFlow {
    pub fn of(project: &ProjectDescriptor) -> Self {
        match &project.github {
            Some(auth) => Self::CallbackReceived {
                code: auth.code.clone(),
                state: auth.state.clone(),
            },
            None => Self::NoGitHubIntent,
        }
    }
}
