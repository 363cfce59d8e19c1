use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;

use crate::model::{Model, ModelHeader, ModelPatch, NewModel};
use crate::store::traits::ModelStore;

/// In-memory store backed by a read-write lock. Backs the test suite and
/// fixture loading; mirrors the relational store's observable behavior.
#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, Model>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn visible(project_id: Option<i64>, projects: &[i64]) -> bool {
    project_id.map_or(true, |id| projects.contains(&id))
}

#[async_trait::async_trait]
impl ModelStore for MemoryStore {
    async fn list_visible(&self, projects: &[i64]) -> Result<Vec<ModelHeader>> {
        let records = self.records.read();
        Ok(records
            .values()
            .filter(|model| visible(model.project_id, projects))
            .map(Model::header)
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Model>> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn insert(&self, new_model: NewModel) -> Result<Model> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let model = Model {
            id,
            name: new_model.name,
            model_serialized: new_model.model_serialized,
            organism_id: new_model.organism_id,
            project_id: new_model.project_id,
            default_biomass_reaction: new_model.default_biomass_reaction,
            preferred_map_id: new_model.preferred_map_id,
            ec_model: new_model.ec_model,
            created: now,
            updated: now,
        };
        self.records.write().insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i64, patch: ModelPatch) -> Result<Option<Model>> {
        let mut records = self.records.write();
        let Some(model) = records.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(model);
        model.updated = Utc::now();
        Ok(Some(model.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.records.write().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_model(name: &str, project_id: Option<i64>) -> NewModel {
        NewModel {
            name: name.to_string(),
            model_serialized: json!({"Reactions": [{"GAPDH": "x->y"}]}),
            organism_id: 1,
            project_id,
            default_biomass_reaction: "GAPDH".to_string(),
            preferred_map_id: None,
            ec_model: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_timestamps() {
        let store = MemoryStore::new();
        let first = store.insert(new_model("one", None)).await.unwrap();
        let second = store.insert(new_model("two", Some(4))).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created, first.updated);
    }

    #[tokio::test]
    async fn listing_filters_by_project_visibility() {
        let store = MemoryStore::new();
        store.insert(new_model("public", None)).await.unwrap();
        store.insert(new_model("restricted", Some(4))).await.unwrap();

        let anonymous = store.list_visible(&[]).await.unwrap();
        assert_eq!(anonymous.len(), 1);
        assert_eq!(anonymous[0].name, "public");

        let member = store.list_visible(&[4]).await.unwrap();
        assert_eq!(member.len(), 2);
    }

    #[tokio::test]
    async fn update_refreshes_the_updated_timestamp() {
        let store = MemoryStore::new();
        let model = store.insert(new_model("one", None)).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));

        let patch = ModelPatch {
            name: Some("renamed".to_string()),
            ..ModelPatch::default()
        };
        let updated = store.update(model.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.created, model.created);
        assert!(updated.updated > model.updated);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_records() {
        let store = MemoryStore::new();
        assert!(store
            .update(99, ModelPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(99).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryStore::new();
        let model = store.insert(new_model("one", Some(4))).await.unwrap();
        assert!(store.delete(model.id).await.unwrap());
        assert!(store.get(model.id).await.unwrap().is_none());
    }
}
