use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate};
use crate::filter::Filter;

/// Document CRUD primitives over the `schemes` collection.
///
/// Every call is a single storage operation; implementations do not retry.
#[async_trait]
pub trait SchemeStore: Send + Sync {
    /// All documents matching `filter`, in insertion order.
    async fn find_all(&self, filter: &Filter) -> Result<Vec<Scheme>, DatabaseError>;

    async fn find_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError>;

    /// Insert the batch atomically and return the stored documents with their ids.
    async fn insert_many(&self, documents: Vec<SchemeDocument>) -> Result<Vec<Scheme>, DatabaseError>;

    async fn delete_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError>;

    /// Delete the first document (insertion order) matching `filter`.
    async fn delete_one(&self, filter: &Filter) -> Result<Option<Scheme>, DatabaseError>;

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteSummary, DatabaseError>;

    /// Apply `update` to the document and return it as stored afterwards.
    async fn update_by_id(&self, id: SchemeId, update: &SchemeUpdate) -> Result<Option<Scheme>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
