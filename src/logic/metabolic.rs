use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

/// Failure to interpret a submitted document as a metabolic model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelParseError {
    #[error("the model document is not a JSON object")]
    NotAnObject,
    #[error("the model document has no reaction list")]
    MissingReactions,
    #[error("malformed reaction entry at index {0}")]
    MalformedReaction(usize),
}

/// Extract the set of reaction identifiers from a serialized metabolic
/// model.
///
/// Two layouts are understood: the COBRA JSON schema, where each entry in
/// `reactions` is an object carrying an `id` field, and the mapping form
/// where each entry in `Reactions` maps reaction identifiers to their
/// equations.
pub fn reaction_identifiers(document: &Value) -> Result<BTreeSet<String>, ModelParseError> {
    let object = document.as_object().ok_or(ModelParseError::NotAnObject)?;
    let entries = match object.get("reactions").or_else(|| object.get("Reactions")) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ModelParseError::MissingReactions),
    };

    let mut identifiers = BTreeSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let fields = entry
            .as_object()
            .ok_or(ModelParseError::MalformedReaction(index))?;
        match fields.get("id") {
            Some(Value::String(id)) => {
                identifiers.insert(id.clone());
            }
            Some(_) => return Err(ModelParseError::MalformedReaction(index)),
            // Mapping form: every key of the entry is a reaction identifier.
            None => {
                if fields.is_empty() {
                    return Err(ModelParseError::MalformedReaction(index));
                }
                identifiers.extend(fields.keys().cloned());
            }
        }
    }

    Ok(identifiers)
}
