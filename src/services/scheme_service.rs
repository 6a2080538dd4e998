use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;

use crate::database::models::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate};
use crate::database::{DatabaseError, SchemeStore};
use crate::filter::Filter;
use crate::services::stamps::StampSource;
use crate::types::{BulkDeleteRequest, DeleteByNamesRequest, NewSchemeRequest, UpdateSchemeRequest};

pub const SCHEME_NOT_FOUND: &str = "Scheme not found";
pub const SCHEME_NOT_FOUND_ON_DELETE: &str = "Scheme not found.";
pub const INVALID_IDENTIFIERS: &str = "Invalid or empty identifiers array.";

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Request-level operations on the schemes collection.
///
/// Stateless apart from the injected store and stamp source; clones share both.
#[derive(Clone)]
pub struct SchemeService {
    store: Arc<dyn SchemeStore>,
    stamps: Arc<dyn StampSource>,
}

impl SchemeService {
    pub fn new(store: Arc<dyn SchemeStore>, stamps: Arc<dyn StampSource>) -> Self {
        Self { store, stamps }
    }

    pub fn store(&self) -> &Arc<dyn SchemeStore> {
        &self.store
    }

    pub async fn list_all(&self) -> Result<Vec<Scheme>, SchemeError> {
        Ok(self.store.find_all(&Filter::new()).await?)
    }

    /// Case-insensitive substring match on `schemename`.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Scheme>, SchemeError> {
        let filter = Filter::new().icontains("schemename", fragment).map_err(DatabaseError::from)?;
        Ok(self.store.find_all(&filter).await?)
    }

    pub async fn get_by_id(&self, raw_id: &str) -> Result<Scheme, SchemeError> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| SchemeError::NotFound(SCHEME_NOT_FOUND.to_string()))
    }

    /// Stamp and insert a batch. Only the four client fields are taken from
    /// each request; `timeOfSchemeAdded`, `date` and `srno` are generated here.
    /// An empty batch inserts nothing and succeeds.
    pub async fn create_many(&self, requests: Vec<NewSchemeRequest>) -> Result<Vec<Scheme>, SchemeError> {
        if requests.is_empty() {
            return Ok(vec![]);
        }

        let documents: Vec<SchemeDocument> = requests
            .into_iter()
            .map(|NewSchemeRequest { schemename, ministry, desc, place }| SchemeDocument {
                schemename,
                ministry,
                desc,
                place,
                time_of_scheme_added: self.stamps.current_time(),
                date: self.stamps.current_date(),
                srno: self.stamps.next_srno(),
            })
            .collect();

        let created = self.store.insert_many(documents).await?;
        tracing::info!(count = created.len(), "schemes added");
        Ok(created)
    }

    pub async fn delete_by_id(&self, raw_id: &str) -> Result<Scheme, SchemeError> {
        let id = parse_id(raw_id)?;
        let deleted = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| SchemeError::NotFound(SCHEME_NOT_FOUND_ON_DELETE.to_string()))?;
        tracing::info!(%id, "scheme deleted");
        Ok(deleted)
    }

    /// Delete the first scheme whose name is exactly `name`.
    pub async fn delete_by_name(&self, name: &str) -> Result<Scheme, SchemeError> {
        let filter = Filter::new().eq("schemename", name).map_err(DatabaseError::from)?;
        let deleted = self
            .store
            .delete_one(&filter)
            .await?
            .ok_or_else(|| SchemeError::NotFound(SCHEME_NOT_FOUND_ON_DELETE.to_string()))?;
        tracing::info!(id = %deleted.id, "scheme deleted by name");
        Ok(deleted)
    }

    /// Delete every scheme whose name is in the request. Zero matches is not an error.
    pub async fn delete_by_names(&self, request: DeleteByNamesRequest) -> Result<DeleteSummary, SchemeError> {
        let names = request
            .scheme_names
            .ok_or_else(|| SchemeError::Validation("schemeNames is required.".to_string()))?
            .into_vec();

        let filter = Filter::new().any_of("schemename", names).map_err(DatabaseError::from)?;
        let summary = self.store.delete_many(&filter).await?;
        tracing::info!(deleted = summary.deleted_count, "schemes deleted by name");
        Ok(summary)
    }

    pub async fn bulk_delete(&self, request: BulkDeleteRequest) -> Result<DeleteSummary, SchemeError> {
        let identifiers = request
            .identifier_list()
            .ok_or_else(|| SchemeError::Validation(INVALID_IDENTIFIERS.to_string()))?;
        let ids = identifiers
            .iter()
            .map(|raw| parse_id(raw).map(|id| id.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        let filter = Filter::new().any_of("id", ids).map_err(DatabaseError::from)?;
        let summary = self.store.delete_many(&filter).await?;
        tracing::info!(deleted = summary.deleted_count, "bulk delete");
        Ok(summary)
    }

    /// Apply each update concurrently. Ids that match nothing come back as
    /// `None`; any storage fault fails the whole batch, although updates that
    /// already landed stay applied.
    pub async fn update_many(&self, requests: Vec<UpdateSchemeRequest>) -> Result<Vec<Option<Scheme>>, SchemeError> {
        let updates = requests
            .into_iter()
            .map(|request| {
                let raw_id = request
                    .id
                    .as_deref()
                    .ok_or_else(|| SchemeError::Validation("Each scheme must include an id.".to_string()))?;
                let id = parse_id(raw_id)?;
                let update = SchemeUpdate {
                    schemename: request.schemename,
                    ministry: request.ministry,
                    desc: request.desc,
                    place: request.place,
                };
                Ok((id, update))
            })
            .collect::<Result<Vec<_>, SchemeError>>()?;

        let store = &self.store;
        let updated = try_join_all(
            updates
                .iter()
                .map(|(id, update)| async move { store.update_by_id(*id, update).await }),
        )
        .await?;

        tracing::info!(count = updated.len(), "schemes updated");
        Ok(updated)
    }
}

fn parse_id(raw: &str) -> Result<SchemeId, SchemeError> {
    raw.parse()
        .map_err(|_| SchemeError::Validation(format!("Invalid scheme id: {}", raw)))
}
