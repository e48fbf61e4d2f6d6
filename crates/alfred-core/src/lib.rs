//! Script-filter feedback payload: `{"items": [...]}` with optional fields
//! omitted from the JSON when unset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub items: Vec<Item>,
}

impl Feedback {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            arg: None,
            valid: None,
            autocomplete: None,
            variables: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = Some(valid);
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    /// Workflow variable exported when the item is actioned.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn feedback_serializes_items_array() {
        let payload = Feedback::new(vec![Item::new("REST").with_subtitle("Web endpoints")]);
        let json: Value =
            serde_json::from_str(&payload.to_json().expect("serialize")).expect("parse");

        assert_eq!(json["items"][0]["title"], "REST");
        assert_eq!(json["items"][0]["subtitle"], "Web endpoints");
    }

    #[test]
    fn unset_optional_fields_are_omitted() {
        let json = serde_json::to_string(&Item::new("REST")).expect("serialize item");

        assert_eq!(json, r#"{"title":"REST"}"#);
    }

    #[test]
    fn variables_accumulate_in_key_order() {
        let item = Item::new("ArC")
            .with_arg("s=ZmM")
            .with_valid(true)
            .with_autocomplete("CDI")
            .with_variable("stream", "io.quarkus.platform:3.8")
            .with_variable("extension_id", "io.quarkus:quarkus-arc");

        let json = serde_json::to_string(&item).expect("serialize item");
        assert_eq!(
            json,
            r#"{"title":"ArC","arg":"s=ZmM","valid":true,"autocomplete":"CDI","variables":{"extension_id":"io.quarkus:quarkus-arc","stream":"io.quarkus.platform:3.8"}}"#
        );
    }
}
