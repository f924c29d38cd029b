use tracing::info;

use super::types::{Created, Dataset, Identifier, NewDataset};
use super::{decode, ClowderClient};
use crate::error::{ClowderError, Result};
use crate::transport::Transport;

impl<T: Transport> ClowderClient<T> {
    /// Every dataset visible to the caller.
    pub async fn list_datasets(&self) -> Result<Vec<Dataset>> {
        let value = self.transport.get("datasets", &[]).await?;
        decode("dataset listing", value)
    }

    /// Create an empty dataset and return its id. A new dataset is created
    /// even when the name is already taken.
    pub async fn create_dataset(&self, dataset: &NewDataset) -> Result<Identifier> {
        let body = serde_json::to_value(dataset).map_err(|source| ClowderError::Decode {
            what: "new dataset",
            source,
        })?;
        let value = self.transport.post_json("datasets/createempty", &body).await?;
        let created: Created = decode("created dataset", value)?;
        info!(id = %created.id, name = %dataset.name, "dataset created");
        Ok(created.id)
    }

    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("datasets/{}", dataset_id), &[])
            .await?;
        info!(id = dataset_id, "dataset deleted");
        Ok(())
    }
}
