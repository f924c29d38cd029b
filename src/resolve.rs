//! Name to identifier resolution.
//!
//! Names on the service are not unique. A name resolves only when exactly
//! one entity in its scope carries it; zero and several matches are both
//! errors, and no caller is allowed to pick one of several matches.

use crate::api::types::{Dataset, FileEntry};
use crate::error::{ClowderError, EntityKind, Result};

/// An entity with a human-readable name and a server-assigned id.
pub trait Named {
    fn name(&self) -> &str;
    fn id(&self) -> &str;
}

impl Named for Dataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Named for FileEntry {
    fn name(&self) -> &str {
        &self.filename
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Find the single entry whose name equals `name` byte for byte.
pub fn resolve_unique<'a, T: Named>(kind: EntityKind, listing: &'a [T], name: &str) -> Result<&'a T> {
    let mut matches = listing.iter().filter(|entry| entry.name() == name);
    let Some(first) = matches.next() else {
        return Err(ClowderError::NotFound {
            kind,
            name: name.to_string(),
        });
    };
    let extra = matches.count();
    if extra > 0 {
        return Err(ClowderError::AmbiguousName {
            kind,
            name: name.to_string(),
            count: extra + 1,
        });
    }
    Ok(first)
}

/// What a name-based operation acts on: a dataset, or a file inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Dataset(&'a str),
    File { dataset: &'a str, file: &'a str },
}

impl Target<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Target::Dataset(_) => EntityKind::Dataset,
            Target::File { .. } => EntityKind::File,
        }
    }
}

/// A [`Target`] after resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Dataset(Dataset),
    File { dataset: Dataset, file: FileEntry },
}

impl Resolved {
    /// Dataset that owns the target (the target itself for datasets).
    pub fn dataset(&self) -> &Dataset {
        match self {
            Resolved::Dataset(dataset) => dataset,
            Resolved::File { dataset, .. } => dataset,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resolved::Dataset(dataset) => &dataset.id,
            Resolved::File { file, .. } => &file.id,
        }
    }

    /// Endpoint that deletes the target.
    pub fn delete_path(&self) -> String {
        match self {
            Resolved::Dataset(dataset) => format!("datasets/{}", dataset.id),
            Resolved::File { dataset, file } => format!("datasets/{}/{}", dataset.id, file.id),
        }
    }

    /// Endpoint of the target's JSON-LD metadata.
    pub fn metadata_path(&self) -> String {
        match self {
            Resolved::Dataset(dataset) => format!("datasets/{}/metadata.jsonld", dataset.id),
            Resolved::File { file, .. } => format!("files/{}/metadata.jsonld", file.id),
        }
    }
}
