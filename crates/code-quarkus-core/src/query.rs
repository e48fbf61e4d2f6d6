//! Typed view of the address-bar query parameters.

use url::form_urlencoded;

pub const GROUP_ID_PARAM: &str = "g";
pub const ARTIFACT_ID_PARAM: &str = "a";
pub const VERSION_PARAM: &str = "v";
pub const BUILD_TOOL_PARAM: &str = "b";
pub const NO_CODE_PARAM: &str = "ne";
pub const EXTENSIONS_PARAM: &str = "s";
pub const CLIENT_NAME_PARAM: &str = "cn";
pub const GITHUB_PARAM: &str = "github";
pub const CODE_PARAM: &str = "code";
pub const STATE_PARAM: &str = "state";
pub const EXTENSION_SEARCH_PARAM: &str = "extension-search";

pub const SHORT_ID_SEPARATOR: &str = ".";

/// One optional slot per known parameter; unknown keys are dropped on parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub build_tool: Option<String>,
    pub no_code: Option<String>,
    pub extensions: Option<String>,
    pub client_name: Option<String>,
    pub github: Option<String>,
    pub code: Option<String>,
    pub state: Option<String>,
    pub extension_search: Option<String>,
}

impl ProjectQuery {
    /// Parses a raw query string, with or without the leading `?`.
    /// The first occurrence of a repeated key wins.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = Self::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let Some(slot) = query.slot_mut(&key) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }

    /// Serializes the populated slots in the fixed order
    /// `g, a, v, b, ne, s, cn, github, code, state, extension-search`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            (GROUP_ID_PARAM, &self.group_id),
            (ARTIFACT_ID_PARAM, &self.artifact_id),
            (VERSION_PARAM, &self.version),
            (BUILD_TOOL_PARAM, &self.build_tool),
            (NO_CODE_PARAM, &self.no_code),
            (EXTENSIONS_PARAM, &self.extensions),
            (CLIENT_NAME_PARAM, &self.client_name),
            (GITHUB_PARAM, &self.github),
            (CODE_PARAM, &self.code),
            (STATE_PARAM, &self.state),
            (EXTENSION_SEARCH_PARAM, &self.extension_search),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
        .collect()
    }

    pub fn short_ids(&self) -> Vec<&str> {
        self.extensions
            .as_deref()
            .map(|raw| {
                raw.split(SHORT_ID_SEPARATOR)
                    .filter(|token| !token.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn github_requested(&self) -> bool {
        self.github.as_deref() == Some("true")
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            GROUP_ID_PARAM => &mut self.group_id,
            ARTIFACT_ID_PARAM => &mut self.artifact_id,
            VERSION_PARAM => &mut self.version,
            BUILD_TOOL_PARAM => &mut self.build_tool,
            NO_CODE_PARAM => &mut self.no_code,
            EXTENSIONS_PARAM => &mut self.extensions,
            CLIENT_NAME_PARAM => &mut self.client_name,
            GITHUB_PARAM => &mut self.github,
            CODE_PARAM => &mut self.code,
            STATE_PARAM => &mut self.state,
            EXTENSION_SEARCH_PARAM => &mut self.extension_search,
            _ => return None,
        };
        Some(slot)
    }
}

/// Returns `value` when it holds something other than whitespace.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
