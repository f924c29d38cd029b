use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a dataset, file or user.
pub type Identifier = String;

/// JSON-LD context every user-submitted metadata document starts with.
pub const METADATA_CONTEXT_URL: &str = "https://clowder.ncsa.illinois.edu/contexts/metadata.jsonld";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub id: Identifier,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "authorId")]
    pub author_id: Identifier,
}

/// A file inside one dataset. Its id is only meaningful with the dataset's id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub id: Identifier,
    pub filename: String,
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, rename = "date-created", skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

/// Body of `POST datasets/createempty`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewDataset {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<Identifier>,
    #[serde(rename = "spaceid", skip_serializing_if = "Option::is_none")]
    pub space: Option<Identifier>,
}

impl NewDataset {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Response carrying only the id of something the service just created.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: Identifier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Identifier,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Who contributed a metadata document: a user or an extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    #[serde(rename = "@type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor_id: Option<String>,
}

impl Agent {
    pub fn user(user_url: String) -> Self {
        Self {
            kind: "cat:user".to_string(),
            user_id: Some(user_url),
            name: None,
            extractor_id: None,
        }
    }

    /// Trailing path segment of `user_id`, i.e. the user's identifier.
    pub fn user_identifier(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
    }
}

/// A JSON-LD metadata document attached to a dataset or file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataDocument {
    #[serde(rename = "@context", default)]
    pub context: Vec<serde_json::Value>,
    pub agent: Agent,
    /// Extractors may write non-string values, so listings keep raw JSON.
    pub content: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl MetadataDocument {
    /// Build a user-submitted document. Each key is mapped to a term under
    /// `{base_url}/metadata#`.
    pub fn from_pairs(base_url: &str, agent: Agent, pairs: &BTreeMap<String, String>) -> Self {
        let terms: serde_json::Map<String, serde_json::Value> = pairs
            .keys()
            .map(|k| {
                (
                    k.clone(),
                    serde_json::Value::String(format!("{}/metadata#{}", base_url, k)),
                )
            })
            .collect();
        let content = pairs
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        Self {
            context: vec![
                serde_json::Value::String(METADATA_CONTEXT_URL.to_string()),
                serde_json::Value::Object(terms),
            ],
            agent,
            content,
            created_at: None,
        }
    }
}
