use std::path::Path;

use tracing::{debug, info};

use super::types::{Created, FileEntry, Identifier};
use super::{decode, ClowderClient};
use crate::error::{ClowderError, Result};
use crate::transport::Transport;
use crate::upload;

/// Result of [`ClowderClient::add_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddFileOutcome {
    Uploaded { id: Identifier },
    /// Duplicate check found a file with the same name; nothing was sent.
    Skipped { existing_id: Identifier },
}

impl<T: Transport> ClowderClient<T> {
    pub async fn list_files_by_id(&self, dataset_id: &str) -> Result<Vec<FileEntry>> {
        let value = self
            .transport
            .get(&format!("datasets/{}/listFiles", dataset_id), &[])
            .await?;
        decode("file listing", value)
    }

    /// Files of the dataset called `dataset_name`.
    pub async fn list_files(&self, dataset_name: &str) -> Result<Vec<FileEntry>> {
        let dataset = self.resolve_dataset(dataset_name).await?;
        self.list_files_by_id(&dataset.id).await
    }

    /// Upload a local file into a dataset.
    ///
    /// Files under one of the configured server-local prefixes are sent as a
    /// path reference and read by the service itself; anything else is sent
    /// by content. With `check_duplicate`, the upload is skipped when the
    /// dataset already holds a file with the same base name.
    pub async fn add_file(
        &self,
        dataset_name: &str,
        path: &Path,
        check_duplicate: bool,
    ) -> Result<AddFileOutcome> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(ClowderError::LocalPath {
                    path: path.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClowderError::LocalPath {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(ClowderError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
        let path = upload::absolute(path)?;
        let file_name = upload::file_name(&path)?;

        let dataset = self.resolve_dataset(dataset_name).await?;

        if check_duplicate {
            let files = self.list_files_by_id(&dataset.id).await?;
            if let Some(existing) = files.iter().find(|f| f.filename == file_name) {
                info!(
                    dataset = %dataset.id,
                    file = %existing.id,
                    name = %file_name,
                    "file already present, skipping upload"
                );
                return Ok(AddFileOutcome::Skipped {
                    existing_id: existing.id.clone(),
                });
            }
        }

        let source = upload::select_upload_source(&path, &self.config.local_paths);
        debug!(source = ?source, "upload source selected");
        let payload = source.into_payload().await?;

        let value = self
            .transport
            .post_multipart(&format!("uploadToDataset/{}", dataset.id), payload)
            .await?;
        let receipt: Created = decode("upload receipt", value)?;
        info!(dataset = %dataset.id, file = %receipt.id, name = %file_name, "file uploaded");
        Ok(AddFileOutcome::Uploaded { id: receipt.id })
    }

    pub async fn delete_file(&self, dataset_id: &str, file_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("datasets/{}/{}", dataset_id, file_id), &[])
            .await?;
        info!(dataset = dataset_id, file = file_id, "file deleted");
        Ok(())
    }
}
