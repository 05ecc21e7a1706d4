use std::fmt;
use std::str::FromStr;

use crate::api::wire::PokemonDetail;
use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use crate::moves::{level_up_moves, machine_moves};
use schema::{PokemonType, Region, SpeciesRecord, StatEntry};

// Source height/weight are integers in decimeters/hectograms
const UNIT_DIVISOR: f64 = 10.0;

/// Strip a form suffix ("giratina-altered" -> "giratina").
pub fn base_name(name: &str) -> &str {
    name.split('-').next().unwrap_or(name)
}

/// Turn a detail payload into a species record.
///
/// Returns `Ok(None)` for non-default forms, which the pokedex does not list.
pub fn transform(detail: PokemonDetail, config: &FetchConfig) -> FetchResult<Option<SpeciesRecord>> {
    if !detail.is_default {
        return Ok(None);
    }

    let malformed = |reason: String| FetchError::Transform {
        name: detail.name.clone(),
        reason,
    };

    let mut slots = detail.types.clone();
    slots.sort_by_key(|slot| slot.slot);
    let types = slots
        .iter()
        .map(|slot| {
            PokemonType::from_str(&slot.type_.name)
                .map_err(|_| malformed(format!("unknown type '{}'", slot.type_.name)))
        })
        .collect::<FetchResult<Vec<PokemonType>>>()?;
    let primary = *types
        .first()
        .ok_or_else(|| malformed("no types".to_string()))?;

    let artwork = detail
        .sprites
        .other
        .official_artwork
        .as_ref()
        .and_then(|art| art.front_default.clone())
        .or_else(|| detail.sprites.front_default.clone());

    let stats = detail
        .stats
        .iter()
        .map(|s| StatEntry {
            name: s.stat.name.clone(),
            value: s.base_stat,
        })
        .collect();

    Ok(Some(SpeciesRecord {
        id: detail.id,
        name: base_name(&detail.name).to_string(),
        sprite: detail.sprites.front_default.clone(),
        artwork,
        types,
        stats,
        moves: level_up_moves(&detail.moves, config.max_level_up_moves, primary),
        machine_moves: machine_moves(&detail.moves, config.max_machine_moves),
        height: f64::from(detail.height) / UNIT_DIVISOR,
        weight: f64::from(detail.weight) / UNIT_DIVISOR,
        region: Region::from_pokedex_number(detail.id),
        ability: detail
            .abilities
            .first()
            .map(|a| a.ability.name.clone())
            .unwrap_or_else(|| "None".to_string()),
    }))
}

/// Detailed multi-line view of a species: number, types, measurements,
/// base stats and the first few moves.
pub struct SpeciesSheet<'a>(pub &'a SpeciesRecord);

impl fmt::Display for SpeciesSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0;

        // --- 1. Name and Pokedex Number ---
        writeln!(f, "{} (#{:03}) - {}", data.name, data.id, data.region)?;
        writeln!(f, "--------------------")?;

        // --- 2. Types ---
        let type_names: Vec<String> = data.types.iter().map(|t| t.to_string()).collect();
        writeln!(f, "Type(s): {}", type_names.join(" / "))?;
        writeln!(f, "Height: {:.1} m   Weight: {:.1} kg", data.height, data.weight)?;
        writeln!(f, "Ability: {}", data.ability)?;
        writeln!(f, "--------------------")?;

        // --- 3. Base Stats ---
        writeln!(f, "Base Stats:")?;
        const LABEL_WIDTH: usize = 16;
        for stat in &data.stats {
            writeln!(f, "{:<LABEL_WIDTH$} : {}", stat.name, stat.value)?;
        }
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "total", data.base_stat_total())?;

        // --- 4. Moves ---
        write!(f, "Moves ({}):", data.moves.len())?;
        for mv in data.moves.iter().take(6) {
            let marker = if mv.is_enriched() { "" } else { "*" };
            write!(f, "\n  Lv.{:<3} {} [{}{}]", mv.level, mv.name, mv.move_type.value(), marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn detail(id: u32, name: &str, types: serde_json::Value, is_default: bool) -> PokemonDetail {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "is_default": is_default,
            "height": 7,
            "weight": 69,
            "sprites": { "front_default": "front.png", "other": {} },
            "types": types,
            "stats": [
                { "base_stat": 45, "stat": { "name": "hp", "url": "" } },
                { "base_stat": 49, "stat": { "name": "attack", "url": "" } }
            ],
            "abilities": [],
            "moves": [{
                "move": { "name": "tackle", "url": "https://pokeapi.co/api/v2/move/33/" },
                "version_group_details": [{
                    "level_learned_at": 1,
                    "move_learn_method": { "name": "level-up", "url": "" },
                    "version_group": { "name": "red-blue", "url": "" }
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_extracts_and_converts_fields() {
        let types = json!([
            { "slot": 2, "type": { "name": "poison", "url": "" } },
            { "slot": 1, "type": { "name": "grass", "url": "" } }
        ]);

        let record = transform(detail(1, "bulbasaur", types, true), &FetchConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(record.name, "bulbasaur");
        assert_eq!(record.types, vec![PokemonType::Grass, PokemonType::Poison]);
        assert_eq!(record.region, Region::Kanto);
        assert_eq!(record.height, 0.7);
        assert_eq!(record.weight, 6.9);
        // No official artwork, so the default sprite stands in
        assert_eq!(record.artwork.as_deref(), Some("front.png"));
        assert_eq!(record.ability, "None");
        assert_eq!(record.moves.len(), 1);
        assert_eq!(*record.moves[0].move_type.value(), PokemonType::Grass);
    }

    #[test]
    fn test_transform_truncates_form_suffix() {
        let types = json!([{ "slot": 1, "type": { "name": "ghost", "url": "" } }]);
        let record = transform(detail(487, "giratina-altered", types, true), &FetchConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "giratina");
        assert_eq!(record.region, Region::Sinnoh);
    }

    #[test]
    fn test_non_default_forms_are_filtered() {
        let types = json!([{ "slot": 1, "type": { "name": "fire", "url": "" } }]);
        let result = transform(detail(10034, "charizard-mega-x", types, false), &FetchConfig::default());
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_missing_or_unknown_types_are_transform_errors() {
        let config = FetchConfig::default();
        assert!(matches!(
            transform(detail(1, "missingno", json!([]), true), &config),
            Err(FetchError::Transform { .. })
        ));
        let shadow = json!([{ "slot": 1, "type": { "name": "shadow", "url": "" } }]);
        assert!(matches!(
            transform(detail(1, "missingno", shadow, true), &config),
            Err(FetchError::Transform { .. })
        ));
    }

    #[test]
    fn test_sheet_lists_stats_and_marks_defaulted_moves() {
        let types = json!([{ "slot": 1, "type": { "name": "grass", "url": "" } }]);
        let record = transform(detail(1, "bulbasaur", types, true), &FetchConfig::default())
            .unwrap()
            .unwrap();

        let sheet = SpeciesSheet(&record).to_string();

        assert!(sheet.starts_with("bulbasaur (#001) - Kanto"));
        assert!(sheet.contains("total            : 94"));
        assert!(sheet.contains("tackle [grass*]"));
    }
}
