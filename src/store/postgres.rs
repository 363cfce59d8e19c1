use anyhow::{Context, Result};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::model::{Model, ModelHeader, ModelPatch, NewModel};
use crate::store::traits::ModelStore;

const MODEL_COLUMNS: &str = "id, name, model_serialized, organism_id, project_id, \
     default_biomass_reaction, preferred_map_id, ec_model, created, updated";

const CREATE_MODELS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS models (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    model_serialized JSONB NOT NULL,
    organism_id BIGINT NOT NULL,
    project_id BIGINT,
    default_biomass_reaction TEXT NOT NULL,
    preferred_map_id BIGINT,
    ec_model BOOLEAN NOT NULL DEFAULT FALSE,
    created TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Bootstrap the schema at startup
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_MODELS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create models table")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn model_from_row(row: &PgRow) -> Model {
    Model {
        id: row.get("id"),
        name: row.get("name"),
        model_serialized: row.get("model_serialized"),
        organism_id: row.get("organism_id"),
        project_id: row.get("project_id"),
        default_biomass_reaction: row.get("default_biomass_reaction"),
        preferred_map_id: row.get("preferred_map_id"),
        ec_model: row.get("ec_model"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

#[async_trait::async_trait]
impl ModelStore for PostgresStore {
    async fn list_visible(&self, projects: &[i64]) -> Result<Vec<ModelHeader>> {
        let rows = sqlx::query(
            "SELECT id, name, organism_id, project_id, ec_model FROM models \
             WHERE project_id IS NULL OR project_id = ANY($1) \
             ORDER BY id",
        )
        .bind(projects)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list models")?;

        let headers = rows
            .into_iter()
            .map(|row| ModelHeader {
                id: row.get("id"),
                name: row.get("name"),
                organism_id: row.get("organism_id"),
                project_id: row.get("project_id"),
                ec_model: row.get("ec_model"),
            })
            .collect();

        Ok(headers)
    }

    async fn get(&self, id: i64) -> Result<Option<Model>> {
        let row = sqlx::query(&format!("SELECT {MODEL_COLUMNS} FROM models WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch model")?;

        Ok(row.as_ref().map(model_from_row))
    }

    async fn insert(&self, new_model: NewModel) -> Result<Model> {
        let row = sqlx::query(&format!(
            "INSERT INTO models \
             (name, model_serialized, organism_id, project_id, default_biomass_reaction, \
              preferred_map_id, ec_model) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MODEL_COLUMNS}"
        ))
        .bind(&new_model.name)
        .bind(&new_model.model_serialized)
        .bind(new_model.organism_id)
        .bind(new_model.project_id)
        .bind(&new_model.default_biomass_reaction)
        .bind(new_model.preferred_map_id)
        .bind(new_model.ec_model)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert model")?;

        Ok(model_from_row(&row))
    }

    async fn update(&self, id: i64, patch: ModelPatch) -> Result<Option<Model>> {
        // Merge in memory and write the full row back; the mutable field
        // set is small and the write stays a single statement.
        let Some(mut model) = self.get(id).await? else {
            return Ok(None);
        };
        patch.apply(&mut model);

        let row = sqlx::query(&format!(
            "UPDATE models SET name = $1, model_serialized = $2, organism_id = $3, \
             project_id = $4, default_biomass_reaction = $5, preferred_map_id = $6, \
             ec_model = $7, updated = NOW() \
             WHERE id = $8 \
             RETURNING {MODEL_COLUMNS}"
        ))
        .bind(&model.name)
        .bind(&model.model_serialized)
        .bind(model.organism_id)
        .bind(model.project_id)
        .bind(&model.default_biomass_reaction)
        .bind(model.preferred_map_id)
        .bind(model.ec_model)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update model")?;

        Ok(row.as_ref().map(model_from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete model")?;

        Ok(result.rows_affected() > 0)
    }
}
