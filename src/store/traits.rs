use anyhow::Result;

use crate::model::{Model, ModelHeader, ModelPatch, NewModel};

/// CRUD surface over the model table. `created` and `updated` are
/// store-managed and never client-settable; every operation is a single
/// auto-committed statement.
#[async_trait::async_trait]
pub trait ModelStore: Send + Sync {
    /// Header projections for public records and for records belonging
    /// to any of `projects`, in id order.
    async fn list_visible(&self, projects: &[i64]) -> Result<Vec<ModelHeader>>;

    /// Fetch a record by id regardless of visibility. Callers apply the
    /// visibility or tier policy themselves.
    async fn get(&self, id: i64) -> Result<Option<Model>>;

    /// Insert a new record and return it with its assigned id and
    /// timestamps.
    async fn insert(&self, new_model: NewModel) -> Result<Model>;

    /// Apply a partial update and refresh `updated`. Returns `None` when
    /// the record does not exist.
    async fn update(&self, id: i64, patch: ModelPatch) -> Result<Option<Model>>;

    /// Hard-delete a record. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}
