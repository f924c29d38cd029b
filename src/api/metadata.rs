//! JSON-LD metadata on datasets and files.
//!
//! Deleting without an extractor filter removes every metadata document on
//! the entity, whoever contributed it. That cannot be undone.

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::types::{Agent, MetadataDocument};
use super::{decode, ClowderClient};
use crate::error::{ClowderError, Result};
use crate::resolve::Target;
use crate::transport::Transport;

/// Split a `key=value` token at the first `=`.
pub fn parse_metadata_pair(token: &str) -> Result<(String, String)> {
    match token.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ClowderError::InvalidMetadata(token.to_string())),
    }
}

/// Parse tokens into a content map. Later tokens win on repeated keys.
pub fn parse_metadata_pairs<S: AsRef<str>>(tokens: &[S]) -> Result<BTreeMap<String, String>> {
    tokens
        .iter()
        .map(|t| parse_metadata_pair(t.as_ref()))
        .collect()
}

fn extractor_query(extractor: Option<&str>) -> Vec<(&str, &str)> {
    extractor.map(|e| ("extractor", e)).into_iter().collect()
}

impl<T: Transport> ClowderClient<T> {
    pub async fn list_metadata(
        &self,
        target: Target<'_>,
        extractor: Option<&str>,
    ) -> Result<Vec<MetadataDocument>> {
        let resolved = self.resolve(target).await?;
        let value = self
            .transport
            .get(&resolved.metadata_path(), &extractor_query(extractor))
            .await?;
        decode("metadata listing", value)
    }

    /// Attach a user metadata document. The agent is the owning dataset's
    /// author.
    pub async fn add_metadata(
        &self,
        target: Target<'_>,
        content: &BTreeMap<String, String>,
    ) -> Result<()> {
        let resolved = self.resolve(target).await?;
        let agent = Agent::user(self.config.user_url(&resolved.dataset().author_id));
        let document = MetadataDocument::from_pairs(&self.config.url, agent, content);
        let body = serde_json::to_value(&document).map_err(|source| ClowderError::Decode {
            what: "metadata document",
            source,
        })?;

        self.transport
            .post_json(&resolved.metadata_path(), &body)
            .await?;
        info!(
            kind = %target.kind(),
            id = resolved.id(),
            keys = content.len(),
            "metadata added"
        );
        Ok(())
    }

    /// Remove metadata, optionally only what `extractor` contributed.
    pub async fn delete_metadata(&self, target: Target<'_>, extractor: Option<&str>) -> Result<()> {
        let resolved = self.resolve(target).await?;
        if extractor.is_none() {
            warn!(
                kind = %target.kind(),
                id = resolved.id(),
                "no extractor filter, removing ALL metadata"
            );
        }
        self.transport
            .delete(&resolved.metadata_path(), &extractor_query(extractor))
            .await?;
        info!(kind = %target.kind(), id = resolved.id(), extractor, "metadata deleted");
        Ok(())
    }
}
