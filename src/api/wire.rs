//! Response shapes of the PokeAPI endpoints the pipeline consumes.
//!
//! Only the fields that are read are modelled; everything else is ignored
//! by serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `GET /pokemon?limit=N`
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesListing {
    #[serde(default)]
    pub count: usize,
    pub results: Vec<NamedResource>,
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub height: u32, // decimeters
    #[serde(default)]
    pub weight: u32, // hectograms
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkSprite {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_: NamedResource,
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

impl MoveSlot {
    pub fn learned_by(&self, method: &str) -> bool {
        self.version_group_details
            .iter()
            .any(|detail| detail.move_learn_method.name == method)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionGroupDetail {
    /// Kept loose: the feed has been seen with numbers, numeric strings and nulls.
    #[serde(default)]
    pub level_learned_at: Value,
    pub move_learn_method: NamedResource,
    pub version_group: NamedResource,
}

impl VersionGroupDetail {
    /// The learn level when it is a positive number or numeric string.
    pub fn positive_level(&self) -> Option<u32> {
        let level = match &self.level_learned_at {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }?;
        u32::try_from(level).ok().filter(|l| *l > 0)
    }
}

/// `GET /move/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MoveDetail {
    #[serde(rename = "type")]
    pub type_: Option<NamedResource>,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    pub damage_class: Option<NamedResource>,
}
