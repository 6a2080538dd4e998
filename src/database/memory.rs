use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate};
use crate::database::store::SchemeStore;
use crate::filter::Filter;

/// Process-local document store. Documents are kept in insertion order.
#[derive(Clone, Default)]
pub struct MemorySchemeStore {
    inner: Arc<RwLock<Vec<Scheme>>>,
}

impl MemorySchemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn matches(filter: &Filter, scheme: &Scheme) -> Result<bool, DatabaseError> {
        if filter.is_empty() {
            return Ok(true);
        }
        let document = serde_json::to_value(scheme)?;
        Ok(filter.matches(&document))
    }
}

#[async_trait]
impl SchemeStore for MemorySchemeStore {
    async fn find_all(&self, filter: &Filter) -> Result<Vec<Scheme>, DatabaseError> {
        let schemes = self.inner.read().await;
        let mut found = Vec::new();
        for scheme in schemes.iter() {
            if Self::matches(filter, scheme)? {
                found.push(scheme.clone());
            }
        }
        Ok(found)
    }

    async fn find_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        let schemes = self.inner.read().await;
        Ok(schemes.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_many(&self, documents: Vec<SchemeDocument>) -> Result<Vec<Scheme>, DatabaseError> {
        let created: Vec<Scheme> = documents
            .into_iter()
            .map(|document| Scheme::new(SchemeId::new(), document))
            .collect();
        let mut schemes = self.inner.write().await;
        schemes.extend(created.iter().cloned());
        Ok(created)
    }

    async fn delete_by_id(&self, id: SchemeId) -> Result<Option<Scheme>, DatabaseError> {
        let mut schemes = self.inner.write().await;
        Ok(schemes.iter().position(|s| s.id == id).map(|index| schemes.remove(index)))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<Option<Scheme>, DatabaseError> {
        let mut schemes = self.inner.write().await;
        let mut position = None;
        for (index, scheme) in schemes.iter().enumerate() {
            if Self::matches(filter, scheme)? {
                position = Some(index);
                break;
            }
        }
        Ok(position.map(|index| schemes.remove(index)))
    }

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteSummary, DatabaseError> {
        let mut schemes = self.inner.write().await;
        let hits = schemes
            .iter()
            .map(|scheme| Self::matches(filter, scheme))
            .collect::<Result<Vec<bool>, _>>()?;
        let deleted = hits.iter().filter(|hit| **hit).count() as u64;
        let mut hits = hits.into_iter();
        schemes.retain(|_| !hits.next().unwrap_or(false));
        Ok(DeleteSummary::deleted(deleted))
    }

    async fn update_by_id(&self, id: SchemeId, update: &SchemeUpdate) -> Result<Option<Scheme>, DatabaseError> {
        let mut schemes = self.inner.write().await;
        Ok(schemes.iter_mut().find(|s| s.id == id).map(|scheme| {
            update.apply(&mut scheme.document);
            scheme.clone()
        }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Srno;

    fn document(name: &str) -> SchemeDocument {
        SchemeDocument {
            schemename: name.into(),
            ministry: "Rural Development".into(),
            desc: "desc".into(),
            place: "Bihar".into(),
            time_of_scheme_added: "12:00:00".into(),
            date: "01-01-2024".into(),
            srno: Srno::Number(1),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_preserves_order() -> Result<(), anyhow::Error> {
        let store = MemorySchemeStore::new();
        let created = store.insert_many(vec![document("A"), document("B")]).await?;
        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);

        let all = store.find_all(&Filter::new()).await?;
        let names: Vec<&str> = all.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.find_by_id(created[1].id).await?.unwrap().name(), "B");
        Ok(())
    }

    #[tokio::test]
    async fn delete_one_removes_first_match_only() -> Result<(), anyhow::Error> {
        let store = MemorySchemeStore::new();
        let created = store.insert_many(vec![document("Dup"), document("Dup")]).await?;
        let removed = store.delete_one(&Filter::new().eq("schemename", "Dup")?).await?;
        assert_eq!(removed.unwrap().id, created[0].id);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_many_reports_count() -> Result<(), anyhow::Error> {
        let store = MemorySchemeStore::new();
        store.insert_many(vec![document("A"), document("B"), document("C")]).await?;
        let summary = store.delete_many(&Filter::new().any_of("schemename", ["A", "C", "Z"])?).await?;
        assert_eq!(summary, DeleteSummary::deleted(2));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_by_missing_id_return_none() -> Result<(), anyhow::Error> {
        let store = MemorySchemeStore::new();
        let update = SchemeUpdate { place: Some("Goa".into()), ..Default::default() };
        assert!(store.update_by_id(SchemeId::new(), &update).await?.is_none());
        assert!(store.delete_by_id(SchemeId::new()).await?.is_none());
        Ok(())
    }
}
