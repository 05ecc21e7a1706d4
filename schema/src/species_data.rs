use crate::{DamageClass, PokemonType, Region};
use serde::{Deserialize, Serialize};

/// Default PP reported for a move whose detail record was never fetched.
pub const DEFAULT_MOVE_PP: u32 = 20;

/// A field value tagged with where it came from.
///
/// `Resolved` values were read from the move detail endpoint; `Defaulted`
/// values are fallbacks filled in at acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sourced<T> {
    Resolved(T),
    Defaulted(T),
}

impl<T> Sourced<T> {
    pub fn value(&self) -> &T {
        match self {
            Sourced::Resolved(value) | Sourced::Defaulted(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Resolved(value) | Sourced::Defaulted(value) => value,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Sourced::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String, // "hp", "attack", "special-defense", ...
    pub value: u32,
}

/// A move learned by level-up, as attached to a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedMove {
    pub name: String,
    pub url: String,
    pub level: u32,            // Always >= 1
    pub version_group: String, // Version group the level was read from
    pub move_type: Sourced<PokemonType>,
    pub power: Sourced<Option<u32>>,
    pub accuracy: Sourced<Option<u32>>,
    pub pp: Sourced<u32>,
    pub category: Sourced<DamageClass>,
}

impl LearnedMove {
    /// A move with every detail field defaulted; `fallback_type` is the
    /// owning species' primary type.
    pub fn with_defaults(
        name: String,
        url: String,
        level: u32,
        version_group: String,
        fallback_type: PokemonType,
    ) -> Self {
        Self {
            name,
            url,
            level,
            version_group,
            move_type: Sourced::Defaulted(fallback_type),
            power: Sourced::Defaulted(None),
            accuracy: Sourced::Defaulted(None),
            pp: Sourced::Defaulted(DEFAULT_MOVE_PP),
            category: Sourced::Defaulted(DamageClass::default()),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.move_type.is_resolved()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub artwork: Option<String>,
    pub types: Vec<PokemonType>, // 1-2 entries, first is primary
    pub stats: Vec<StatEntry>,
    pub moves: Vec<LearnedMove>,
    pub machine_moves: Vec<String>,
    pub height: f64, // meters
    pub weight: f64, // kilograms
    pub region: Region,
    pub ability: String,
}

impl SpeciesRecord {
    pub fn primary_type(&self) -> Option<PokemonType> {
        self.types.first().copied()
    }

    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Sum of all base stats.
    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|s| s.value).sum()
    }
}
