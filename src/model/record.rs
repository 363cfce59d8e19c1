use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored metabolic model. `model_serialized` is the model document
/// exactly as submitted; `created` and `updated` are store-managed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub model_serialized: Value,
    pub organism_id: i64,
    pub project_id: Option<i64>,
    pub default_biomass_reaction: String,
    pub preferred_map_id: Option<i64>,
    pub ec_model: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Reduced representation returned by the list endpoint. Omits the
/// serialized model document and the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHeader {
    pub id: i64,
    pub name: String,
    pub organism_id: i64,
    pub project_id: Option<i64>,
    pub ec_model: bool,
}

impl Model {
    pub fn header(&self) -> ModelHeader {
        ModelHeader {
            id: self.id,
            name: self.name.clone(),
            organism_id: self.organism_id,
            project_id: self.project_id,
            ec_model: self.ec_model,
        }
    }
}

/// Validated input for creating a model. The server assigns `id`,
/// `created` and `updated` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewModel {
    pub name: String,
    pub model_serialized: Value,
    pub organism_id: i64,
    pub project_id: Option<i64>,
    pub default_biomass_reaction: String,
    pub preferred_map_id: Option<i64>,
    pub ec_model: bool,
}

/// Validated partial update. Each field is `None` when absent from the
/// payload; the nullable columns use a second `Option` level so that
/// "set to null" and "leave unchanged" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPatch {
    pub name: Option<String>,
    pub model_serialized: Option<Value>,
    pub organism_id: Option<i64>,
    pub project_id: Option<Option<i64>>,
    pub default_biomass_reaction: Option<String>,
    pub preferred_map_id: Option<Option<i64>>,
    pub ec_model: Option<bool>,
}

impl ModelPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Field-by-field assignment onto an existing record. Does not touch
    /// `id`, `created` or `updated`; the store refreshes `updated`.
    pub fn apply(&self, model: &mut Model) {
        if let Some(name) = &self.name {
            model.name = name.clone();
        }
        if let Some(document) = &self.model_serialized {
            model.model_serialized = document.clone();
        }
        if let Some(organism_id) = self.organism_id {
            model.organism_id = organism_id;
        }
        if let Some(project_id) = self.project_id {
            model.project_id = project_id;
        }
        if let Some(reaction) = &self.default_biomass_reaction {
            model.default_biomass_reaction = reaction.clone();
        }
        if let Some(preferred_map_id) = self.preferred_map_id {
            model.preferred_map_id = preferred_map_id;
        }
        if let Some(ec_model) = self.ec_model {
            model.ec_model = ec_model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_model() -> Model {
        Model {
            id: 7,
            name: "iJO1366".to_string(),
            model_serialized: json!({"Reactions": [{"GAPDH": "x->y"}]}),
            organism_id: 4,
            project_id: Some(4),
            default_biomass_reaction: "GAPDH".to_string(),
            preferred_map_id: None,
            ec_model: false,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn header_drops_document_and_timestamps() {
        let model = sample_model();
        let header = model.header();
        assert_eq!(header.id, 7);
        assert_eq!(header.name, "iJO1366");
        let serialized = serde_json::to_value(&header).unwrap();
        assert!(serialized.get("model_serialized").is_none());
        assert!(serialized.get("created").is_none());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut model = sample_model();
        let patch = ModelPatch {
            name: Some("Changed".to_string()),
            project_id: Some(None),
            ..ModelPatch::default()
        };
        patch.apply(&mut model);
        assert_eq!(model.name, "Changed");
        assert_eq!(model.project_id, None);
        assert_eq!(model.organism_id, 4);
        assert_eq!(model.default_biomass_reaction, "GAPDH");
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(ModelPatch::default().is_empty());
        let patch = ModelPatch {
            ec_model: Some(true),
            ..ModelPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
