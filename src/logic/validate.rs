use serde_json::{Map, Value};
use thiserror::Error;

use crate::logic::metabolic;
use crate::model::{Model, ModelPatch, NewModel};

/// Aggregate of every field-level failure found in one request payload.
/// Reported in full before any store mutation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}

/// Fields a client may send when creating a model. `id` is accepted for
/// symmetry with the full representation but its value is ignored.
const CREATE_FIELDS: &[&str] = &[
    "id",
    "name",
    "model_serialized",
    "organism_id",
    "project_id",
    "default_biomass_reaction",
    "preferred_map_id",
    "ec_model",
];

/// Allow-list of mutable fields for partial update.
const MUTABLE_FIELDS: &[&str] = &[
    "name",
    "model_serialized",
    "organism_id",
    "project_id",
    "default_biomass_reaction",
    "preferred_map_id",
    "ec_model",
];

pub struct ModelValidator;

impl ModelValidator {
    /// Check a creation payload and produce the validated field set.
    pub fn validate_new(payload: &Value) -> Result<NewModel, ValidationError> {
        let Some(fields) = payload.as_object() else {
            return Err(ValidationError::single("request body must be a JSON object"));
        };

        let mut errors = Vec::new();
        Self::check_known_fields(fields, CREATE_FIELDS, &mut errors);
        if fields.contains_key("id") {
            // Server-assigned; only the type is checked.
            Self::nullable_integer(fields, "id", false, &mut errors);
        }

        let name = Self::required_text(fields, "name", &mut errors);
        let organism_id = Self::required_integer(fields, "organism_id", &mut errors);
        let project_id = Self::nullable_integer(fields, "project_id", true, &mut errors);
        let default_biomass_reaction =
            Self::required_text(fields, "default_biomass_reaction", &mut errors);
        let preferred_map_id = Self::nullable_integer(fields, "preferred_map_id", false, &mut errors);
        let ec_model = Self::optional_bool(fields, "ec_model", &mut errors);
        let model_serialized = match fields.get("model_serialized") {
            Some(Value::Null) | None => {
                errors.push("'model_serialized' is required".to_string());
                None
            }
            Some(document) => Some(document.clone()),
        };

        if errors.is_empty() {
            let document = model_serialized.as_ref().unwrap();
            let reaction = default_biomass_reaction.as_deref().unwrap();
            let model_name = name.as_deref().unwrap();
            Self::check_biomass(document, reaction, model_name, &mut errors);
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(NewModel {
            name: name.unwrap(),
            model_serialized: model_serialized.unwrap(),
            organism_id: organism_id.unwrap(),
            project_id: project_id.unwrap(),
            default_biomass_reaction: default_biomass_reaction.unwrap(),
            preferred_map_id: preferred_map_id.unwrap(),
            ec_model: ec_model.unwrap(),
        })
    }

    /// Check a partial-update payload against the current record and
    /// produce the validated patch.
    ///
    /// The biomass cross-field check runs against the merged view: an
    /// incoming document is validated with the incoming biomass reaction
    /// when supplied and the stored one otherwise, and a biomass-only
    /// change is validated against the stored document.
    pub fn validate_patch(payload: &Value, current: &Model) -> Result<ModelPatch, ValidationError> {
        let Some(fields) = payload.as_object() else {
            return Err(ValidationError::single("request body must be a JSON object"));
        };

        let mut errors = Vec::new();
        Self::check_known_fields(fields, MUTABLE_FIELDS, &mut errors);

        let mut patch = ModelPatch::default();
        if fields.contains_key("name") {
            patch.name = Self::required_text(fields, "name", &mut errors);
        }
        if fields.contains_key("organism_id") {
            patch.organism_id = Self::required_integer(fields, "organism_id", &mut errors);
        }
        if fields.contains_key("project_id") {
            patch.project_id = Self::nullable_integer(fields, "project_id", true, &mut errors);
        }
        if fields.contains_key("preferred_map_id") {
            patch.preferred_map_id = Self::nullable_integer(fields, "preferred_map_id", true, &mut errors);
        }
        if fields.contains_key("ec_model") {
            patch.ec_model = Self::optional_bool(fields, "ec_model", &mut errors);
        }
        if fields.contains_key("default_biomass_reaction") {
            patch.default_biomass_reaction =
                Self::required_text(fields, "default_biomass_reaction", &mut errors);
        }
        match fields.get("model_serialized") {
            None => {}
            Some(Value::Null) => errors.push("'model_serialized' must not be null".to_string()),
            Some(document) => patch.model_serialized = Some(document.clone()),
        }

        let touches_document = fields.contains_key("model_serialized")
            || fields.contains_key("default_biomass_reaction");
        if errors.is_empty() && touches_document {
            let document = patch
                .model_serialized
                .as_ref()
                .unwrap_or(&current.model_serialized);
            let reaction = patch
                .default_biomass_reaction
                .as_deref()
                .unwrap_or(&current.default_biomass_reaction);
            let model_name = patch.name.as_deref().unwrap_or(&current.name);
            Self::check_biomass(document, reaction, model_name, &mut errors);
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(patch)
    }

    fn check_known_fields(fields: &Map<String, Value>, allowed: &[&str], errors: &mut Vec<String>) {
        for key in fields.keys() {
            if !allowed.contains(&key.as_str()) {
                errors.push(format!("unknown field '{key}'"));
            }
        }
    }

    fn required_text(
        fields: &Map<String, Value>,
        key: &str,
        errors: &mut Vec<String>,
    ) -> Option<String> {
        match fields.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                errors.push(format!("'{key}' must be a string"));
                None
            }
            None => {
                errors.push(format!("'{key}' is required"));
                None
            }
        }
    }

    fn required_integer(
        fields: &Map<String, Value>,
        key: &str,
        errors: &mut Vec<String>,
    ) -> Option<i64> {
        match fields.get(key) {
            Some(value) => match value.as_i64() {
                Some(number) => Some(number),
                None => {
                    errors.push(format!("'{key}' must be an integer"));
                    None
                }
            },
            None => {
                errors.push(format!("'{key}' is required"));
                None
            }
        }
    }

    /// A nullable integer field. With `required` the key must be present
    /// in the payload even if its value is null.
    fn nullable_integer(
        fields: &Map<String, Value>,
        key: &str,
        required: bool,
        errors: &mut Vec<String>,
    ) -> Option<Option<i64>> {
        match fields.get(key) {
            None => {
                if required {
                    errors.push(format!("'{key}' is required"));
                    None
                } else {
                    Some(None)
                }
            }
            Some(Value::Null) => Some(None),
            Some(value) => match value.as_i64() {
                Some(number) => Some(Some(number)),
                None => {
                    errors.push(format!("'{key}' must be an integer"));
                    None
                }
            },
        }
    }

    fn optional_bool(
        fields: &Map<String, Value>,
        key: &str,
        errors: &mut Vec<String>,
    ) -> Option<bool> {
        match fields.get(key) {
            None => Some(false),
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                errors.push(format!("'{key}' must be a boolean"));
                None
            }
        }
    }

    fn check_biomass(document: &Value, reaction: &str, model_name: &str, errors: &mut Vec<String>) {
        match metabolic::reaction_identifiers(document) {
            Ok(reactions) => {
                if !reactions.contains(reaction) {
                    errors.push(format!(
                        "the default biomass reaction '{reaction}' does not exist in model '{model_name}'"
                    ));
                }
            }
            Err(parse) => errors.push(parse.to_string()),
        }
    }
}
