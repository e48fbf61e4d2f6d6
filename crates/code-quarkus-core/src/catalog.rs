use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable extension as delivered by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionEntry {
    pub id: String,
    pub short_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom: Option<String>,
}

/// Snapshot of the extensions currently offered for selection.
///
/// Every `short_id` resolves to exactly one `id`. The same entry may appear
/// more than once, but only as an identical copy; decoding keeps the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ExtensionEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ExtensionEntry>) -> Result<Self, CatalogError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        let mut by_id: HashMap<&str, &ExtensionEntry> = HashMap::new();
        for entry in &entries {
            if entry.short_id.trim().is_empty() {
                return Err(CatalogError::MissingShortId(entry.id.clone()));
            }

            match by_id.get(entry.id.as_str()) {
                Some(first) if *first != entry => {
                    return Err(CatalogError::ConflictingEntry(entry.id.clone()));
                }
                Some(_) => continue,
                None => {
                    by_id.insert(entry.id.as_str(), entry);
                }
            }

            match owners.get(entry.short_id.as_str()) {
                Some(owner) if *owner != entry.id => {
                    return Err(CatalogError::AmbiguousShortId {
                        short_id: entry.short_id.clone(),
                        first: (*owner).to_string(),
                        second: entry.id.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    owners.insert(entry.short_id.as_str(), entry.id.as_str());
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn from_json(body: &str) -> Result<Self, CatalogError> {
        let entries: Vec<ExtensionEntry> =
            serde_json::from_str(body).map_err(CatalogError::InvalidJson)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[ExtensionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtensionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&ExtensionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn by_short_id(&self, short_id: &str) -> Option<&ExtensionEntry> {
        self.entries.iter().find(|entry| entry.short_id == short_id)
    }

    /// Looks an entry up by full id first, then by short id.
    pub fn lookup(&self, key: &str) -> Option<&ExtensionEntry> {
        let key = key.trim();
        self.by_id(key).or_else(|| self.by_short_id(key))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ExtensionEntry;
    type IntoIter = std::slice::Iter<'a, ExtensionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("extension {0} has no short id")]
    MissingShortId(String),
    #[error("short id {short_id} is shared by {first} and {second}")]
    AmbiguousShortId {
        short_id: String,
        first: String,
        second: String,
    },
    #[error("extension {0} is listed twice with different details")]
    ConflictingEntry(String),
    #[error("invalid catalog json")]
    InvalidJson(#[source] serde_json::Error),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn entry(id: &str, short_id: &str, name: &str, order: i64) -> ExtensionEntry {
        ExtensionEntry {
            id: id.to_string(),
            short_id: short_id.to_string(),
            name: name.to_string(),
            short_name: None,
            description: String::new(),
            keywords: Vec::new(),
            tags: Vec::new(),
            category: String::new(),
            default: false,
            order,
            version: None,
            guide: None,
            bom: None,
        }
    }

    /// The three-entry picker fixture: ArC, Camel Netty and "A CDI in name test".
    pub fn picker_entries() -> Vec<ExtensionEntry> {
        let mut arc = entry("io.quarkus:quarkus-arc", "ZmM", "ArC", 0);
        arc.short_name = Some("CDI".to_string());
        arc.description = "Build time CDI dependency injection".to_string();
        arc.keywords = ["arc", "cdi", "dependency-injection", "di", "label"]
            .map(String::from)
            .to_vec();
        arc.category = "Core".to_string();

        let mut netty = entry(
            "io.quarkus:quarkus-camel-netty4-http",
            "9Ru",
            "Camel Netty4 test HTTP",
            2,
        );
        netty.description = "Camel support for Netty".to_string();
        netty.keywords = ["camel-netty4-http", "camel"].map(String::from).to_vec();
        netty.tags = vec!["preview".to_string()];
        netty.category = "Integration".to_string();

        let mut lambda = entry("some-id", "xTq", "A CDI in name test", 1);
        lambda.short_name = Some("a shortname".to_string());
        lambda.description = "Some description".to_string();
        lambda.keywords = [
            "lambda",
            "amazon-lambda",
            "aws-lambda",
            "amazon",
            "aws",
            "label",
        ]
        .map(String::from)
        .to_vec();
        lambda.tags = vec!["experimental".to_string()];
        lambda.category = "Cloud".to_string();

        vec![arc, netty, lambda]
    }

    pub fn picker_catalog() -> Catalog {
        Catalog::new(picker_entries()).expect("fixture catalog is valid")
    }
}
