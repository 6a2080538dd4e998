use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate, Srno};
use crate::database::{DatabaseError, MemorySchemeStore, SchemeStore};
use crate::filter::Filter;
use crate::services::{SchemeService, StampSource};

/// Deterministic stamps: fixed time and date, serial numbers from 1.
#[derive(Default)]
pub struct FixedStamps {
    counter: AtomicU64,
}

impl FixedStamps {
    pub const TIME: &'static str = "10:30:00";
    pub const DATE: &'static str = "15-08-2024";
}

impl StampSource for FixedStamps {
    fn current_time(&self) -> String {
        Self::TIME.to_string()
    }

    fn current_date(&self) -> String {
        Self::DATE.to_string()
    }

    fn next_srno(&self) -> Srno {
        Srno::Number(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Store whose every call fails, for exercising fault mapping.
pub struct FailingStore;

fn fault() -> DatabaseError {
    DatabaseError::QueryError("connection reset".to_string())
}

#[async_trait]
impl SchemeStore for FailingStore {
    async fn find_all(&self, _filter: &Filter) -> Result<Vec<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn find_by_id(&self, _id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn insert_many(&self, _documents: Vec<SchemeDocument>) -> Result<Vec<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn delete_by_id(&self, _id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn delete_one(&self, _filter: &Filter) -> Result<Option<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn delete_many(&self, _filter: &Filter) -> Result<DeleteSummary, DatabaseError> {
        Err(fault())
    }

    async fn update_by_id(&self, _id: SchemeId, _update: &SchemeUpdate) -> Result<Option<Scheme>, DatabaseError> {
        Err(fault())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(fault())
    }
}

/// In-memory store whose updates fail for one chosen id only.
pub struct FailOnUpdateStore {
    inner: MemorySchemeStore,
    failing: SchemeId,
}

impl FailOnUpdateStore {
    pub fn new(inner: MemorySchemeStore, failing: SchemeId) -> Self {
        Self { inner, failing }
    }
}

#[async_trait]
impl SchemeStore for FailOnUpdateStore {
    async fn find_all(&self, filter: &Filter) -> Result<Vec<Scheme>, DatabaseError> {
        self.inner.find_all(filter).await
    }

    async fn find_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        self.inner.find_by_id(id).await
    }

    async fn insert_many(&self, documents: Vec<SchemeDocument>) -> Result<Vec<Scheme>, DatabaseError> {
        self.inner.insert_many(documents).await
    }

    async fn delete_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        self.inner.delete_by_id(id).await
    }

    async fn delete_one(&self, filter: &Filter) -> Result<Option<Scheme>, DatabaseError> {
        self.inner.delete_one(filter).await
    }

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteSummary, DatabaseError> {
        self.inner.delete_many(filter).await
    }

    async fn update_by_id(&self, id: SchemeId, update: &SchemeUpdate) -> Result<Option<Scheme>, DatabaseError> {
        if id == self.failing {
            return Err(fault());
        }
        self.inner.update_by_id(id, update).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.inner.ping().await
    }
}

pub fn service_with(store: Arc<dyn SchemeStore>) -> SchemeService {
    SchemeService::new(store, Arc::new(FixedStamps::default()))
}
