use anyhow::Result;
use serde_json::json;

use crate::model::NewModel;
use crate::store::traits::ModelStore;

/// Demonstration fixtures: one public model and one restricted to
/// project 4, matching the platform's usual contents.
pub fn fixture_models() -> Vec<NewModel> {
    vec![
        NewModel {
            name: "e_coli_core".to_string(),
            model_serialized: json!({
                "Reactions": [
                    {"GAPDH": "g3p + nad + pi <=> 13dpg + h + nadh"},
                    {"BIOMASS": "precursors --> biomass"},
                ]
            }),
            organism_id: 1,
            project_id: None,
            default_biomass_reaction: "BIOMASS".to_string(),
            preferred_map_id: None,
            ec_model: false,
        },
        NewModel {
            name: "Restricted Model".to_string(),
            model_serialized: json!({
                "Reactions": [
                    {"GAPDH": "x->y"},
                    {"BIOMASS": "precursors --> biomass"},
                ]
            }),
            organism_id: 4,
            project_id: Some(4),
            default_biomass_reaction: "BIOMASS".to_string(),
            preferred_map_id: None,
            ec_model: false,
        },
    ]
}

/// Insert the fixture models through the given store.
pub async fn load_seed_data<S: ModelStore>(store: &S) -> Result<()> {
    for fixture in fixture_models() {
        let model = store.insert(fixture).await?;
        log::info!("Seeded model {} ({})", model.id, model.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::metabolic::reaction_identifiers;

    #[test]
    fn fixtures_satisfy_the_biomass_invariant() {
        for fixture in fixture_models() {
            let reactions = reaction_identifiers(&fixture.model_serialized).unwrap();
            assert!(
                reactions.contains(&fixture.default_biomass_reaction),
                "fixture '{}' names a missing biomass reaction",
                fixture.name
            );
        }
    }
}
