pub mod datasets;
pub mod files;
pub mod metadata;
pub mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::{ClowderError, EntityKind, Result};
use crate::resolve::{resolve_unique, Resolved, Target};
use crate::transport::{HttpTransport, Transport};

use types::{Dataset, Identifier, User};

/// Clowder client. Holds one transport (one connection pool) and the
/// configuration it was built with. Every name is resolved against a fresh
/// listing; nothing is cached between calls.
pub struct ClowderClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
}

impl ClowderClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> ClowderClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Id of the single dataset called `name`.
    pub async fn resolve_dataset_id(&self, name: &str) -> Result<Identifier> {
        Ok(self.resolve_dataset(name).await?.id)
    }

    /// Id of the single file called `name` inside an already resolved dataset.
    pub async fn resolve_file_id(&self, dataset_id: &str, name: &str) -> Result<Identifier> {
        let files = self.list_files_by_id(dataset_id).await?;
        resolve_unique(EntityKind::File, &files, name).map(|f| f.id.clone())
    }

    pub(crate) async fn resolve_dataset(&self, name: &str) -> Result<Dataset> {
        let datasets = self.list_datasets().await?;
        resolve_unique(EntityKind::Dataset, &datasets, name).cloned()
    }

    pub async fn resolve(&self, target: Target<'_>) -> Result<Resolved> {
        match target {
            Target::Dataset(name) => Ok(Resolved::Dataset(self.resolve_dataset(name).await?)),
            Target::File { dataset, file } => {
                let dataset = self.resolve_dataset(dataset).await?;
                let files = self.list_files_by_id(&dataset.id).await?;
                let file = resolve_unique(EntityKind::File, &files, file)?.clone();
                Ok(Resolved::File { dataset, file })
            }
        }
    }

    /// Delete a dataset or file by name. Nothing is deleted unless the name
    /// resolves to exactly one entity.
    pub async fn delete_by_name(&self, target: Target<'_>) -> Result<()> {
        let resolved = self.resolve(target).await?;
        self.transport.delete(&resolved.delete_path(), &[]).await?;
        info!(kind = %target.kind(), id = resolved.id(), "deleted");
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let value = self.transport.get(&format!("users/{}", user_id), &[]).await?;
        decode("user", value)
    }

    /// Full name of a user, or `None` when the service no longer knows the
    /// id. Every other failure propagates.
    pub async fn user_display_name(&self, user_id: &str) -> Result<Option<String>> {
        match self.get_user(user_id).await {
            Ok(user) => Ok(Some(user.full_name)),
            Err(e) if e.status() == Some(404) => {
                warn!(user_id, "user not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn decode<D: DeserializeOwned>(what: &'static str, value: Value) -> Result<D> {
    serde_json::from_value(value).map_err(|source| ClowderError::Decode { what, source })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    use super::ClowderClient;
    use crate::config::{Auth, ClientConfig};
    use crate::transport::mock::MockTransport;

    pub const BASE_URL: &str = "https://clowder.example";

    pub fn config() -> ClientConfig {
        ClientConfig::new(BASE_URL, Auth::Anonymous).unwrap()
    }

    pub fn client(transport: MockTransport) -> ClowderClient<MockTransport> {
        ClowderClient::with_transport(transport, config())
    }

    pub fn dataset(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name, "description": "", "authorId": "u1"})
    }

    pub fn file(id: &str, filename: &str) -> Value {
        json!({"id": id, "filename": filename, "contentType": "text/plain"})
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::transport::mock::{Method, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_dataset_id_unique() {
        let mock = MockTransport::new().respond(
            Method::Get,
            "datasets",
            json!([dataset("d1", "alpha"), dataset("d2", "beta")]),
        );
        let client = client(mock);
        assert_eq!(client.resolve_dataset_id("alpha").await.unwrap(), "d1");
    }

    #[tokio::test]
    async fn test_resolve_dataset_id_ambiguous() {
        let mock = MockTransport::new().respond(
            Method::Get,
            "datasets",
            json!([dataset("d1", "alpha"), dataset("d2", "alpha")]),
        );
        let err = client(mock).resolve_dataset_id("alpha").await.unwrap_err();
        assert!(matches!(
            err,
            ClowderError::AmbiguousName { ref name, count: 2, kind: EntityKind::Dataset } if name == "alpha"
        ));
    }

    #[tokio::test]
    async fn test_resolve_dataset_id_missing() {
        let mock = MockTransport::new().respond(Method::Get, "datasets", json!([]));
        let err = client(mock).resolve_dataset_id("missing").await.unwrap_err();
        assert!(matches!(
            err,
            ClowderError::NotFound { ref name, kind: EntityKind::Dataset } if name == "missing"
        ));
    }

    #[tokio::test]
    async fn test_resolution_refetches_listing() {
        let mock = MockTransport::new().respond(Method::Get, "datasets", json!([dataset("d1", "alpha")]));
        let client = client(mock);
        client.resolve_dataset_id("alpha").await.unwrap();
        client.resolve_dataset_id("alpha").await.unwrap();
        assert_eq!(client.transport.calls_with(Method::Get).len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_file_id_scoped_to_dataset() {
        let mock = MockTransport::new().respond(
            Method::Get,
            "datasets/d1/listFiles",
            json!([file("f1", "a.txt"), file("f2", "b.txt")]),
        );
        let client = client(mock);
        assert_eq!(client.resolve_file_id("d1", "b.txt").await.unwrap(), "f2");
        // the dataset listing is never consulted
        let calls = client.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "datasets/d1/listFiles");
    }

    #[tokio::test]
    async fn test_resolve_file_id_ambiguous() {
        let mock = MockTransport::new().respond(
            Method::Get,
            "datasets/d1/listFiles",
            json!([file("f1", "a.txt"), file("f2", "a.txt")]),
        );
        let err = client(mock).resolve_file_id("d1", "a.txt").await.unwrap_err();
        assert!(matches!(
            err,
            ClowderError::AmbiguousName { count: 2, kind: EntityKind::File, .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_dataset_by_name_unique() {
        let mock = MockTransport::new()
            .respond(Method::Get, "datasets", json!([dataset("d1", "alpha"), dataset("d2", "beta")]))
            .respond(Method::Delete, "datasets/d2", json!({"status": "success"}));
        let client = client(mock);
        client.delete_by_name(Target::Dataset("beta")).await.unwrap();

        let deletes = client.transport.calls_with(Method::Delete);
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].path, "datasets/d2");
    }

    #[tokio::test]
    async fn test_delete_by_name_never_deletes_ambiguous() {
        let mock = MockTransport::new()
            .respond(Method::Get, "datasets", json!([dataset("d1", "alpha"), dataset("d2", "alpha")]))
            .respond(Method::Delete, "datasets/d1", json!({}))
            .respond(Method::Delete, "datasets/d2", json!({}));
        let client = client(mock);
        let err = client.delete_by_name(Target::Dataset("alpha")).await.unwrap_err();
        assert!(matches!(err, ClowderError::AmbiguousName { count: 2, .. }));
        assert!(client.transport.calls_with(Method::Delete).is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_name_never_deletes_missing() {
        let mock = MockTransport::new().respond(Method::Get, "datasets", json!([dataset("d1", "alpha")]));
        let client = client(mock);
        let err = client.delete_by_name(Target::Dataset("gamma")).await.unwrap_err();
        assert!(matches!(err, ClowderError::NotFound { .. }));
        assert!(client.transport.calls_with(Method::Delete).is_empty());
    }

    #[tokio::test]
    async fn test_delete_file_by_name() {
        let mock = MockTransport::new()
            .respond(Method::Get, "datasets", json!([dataset("d1", "alpha")]))
            .respond(
                Method::Get,
                "datasets/d1/listFiles",
                json!([file("f1", "a.txt"), file("f2", "b.txt")]),
            )
            .respond(Method::Delete, "datasets/d1/f1", Value::Null);
        let client = client(mock);
        client
            .delete_by_name(Target::File {
                dataset: "alpha",
                file: "a.txt",
            })
            .await
            .unwrap();

        let deletes = client.transport.calls_with(Method::Delete);
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].path, "datasets/d1/f1");
    }

    #[tokio::test]
    async fn test_delete_file_by_name_ambiguous_file() {
        let mock = MockTransport::new()
            .respond(Method::Get, "datasets", json!([dataset("d1", "alpha")]))
            .respond(
                Method::Get,
                "datasets/d1/listFiles",
                json!([file("f1", "a.txt"), file("f2", "a.txt")]),
            );
        let client = client(mock);
        let err = client
            .delete_by_name(Target::File {
                dataset: "alpha",
                file: "a.txt",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClowderError::AmbiguousName { kind: EntityKind::File, .. }));
        assert!(client.transport.calls_with(Method::Delete).is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_not_resolution_error() {
        let mock = MockTransport::new().fail(Method::Get, "datasets", 401);
        let err = client(mock).resolve_dataset_id("alpha").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!err.is_resolution());
    }

    #[tokio::test]
    async fn test_listing_missing_fields_is_decode_error() {
        let mock = MockTransport::new().respond(Method::Get, "datasets", json!([{"id": "d1"}]));
        let err = client(mock).resolve_dataset_id("alpha").await.unwrap_err();
        assert!(matches!(err, ClowderError::Decode { what: "dataset listing", .. }));
    }

    #[tokio::test]
    async fn test_get_user() {
        let mock = MockTransport::new().respond(
            Method::Get,
            "users/u1",
            json!({"id": "u1", "fullName": "Ada Lovelace", "email": "ada@example.org"}),
        );
        let user = client(mock).get_user("u1").await.unwrap();
        assert_eq!(user.full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_user_display_name_unknown_user() {
        let mock = MockTransport::new().fail(Method::Get, "users/gone", 404);
        assert_eq!(client(mock).user_display_name("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_user_display_name_propagates_unauthorized() {
        let mock = MockTransport::new().fail(Method::Get, "users/u1", 401);
        let err = client(mock).user_display_name("u1").await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
