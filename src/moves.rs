//! Level-up move extraction and learn-level provenance.

use crate::api::wire::{MoveSlot, VersionGroupDetail};
use schema::{LearnedMove, PokemonType};

pub const LEVEL_UP_METHOD: &str = "level-up";
pub const MACHINE_METHOD: &str = "machine";
pub const UNKNOWN_VERSION_GROUP: &str = "unknown";

/// Version groups in the order their learn levels are trusted, newest first.
pub const VERSION_GROUP_PRIORITY: [&str; 18] = [
    "scarlet-violet",
    "sword-shield",
    "sun-moon",
    "ultra-sun-ultra-moon",
    "omega-ruby-alpha-sapphire",
    "x-y",
    "black-white",
    "black-2-white-2",
    "diamond-pearl",
    "platinum",
    "heartgold-soulsilver",
    "ruby-sapphire",
    "emerald",
    "firered-leafgreen",
    "gold-silver",
    "crystal",
    "red-blue",
    "yellow",
];

/// The learn level of a move and the version group it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnLevel {
    pub level: u32,
    pub version_group: String,
}

/// Pick the level-up record a move's learn level is taken from.
///
/// 1. the first priority version group that has a record with a positive level
/// 2. otherwise the first record with a positive level
/// 3. otherwise the first record
pub fn preferred_detail<'a>(details: &[&'a VersionGroupDetail]) -> Option<&'a VersionGroupDetail> {
    VERSION_GROUP_PRIORITY
        .iter()
        .find_map(|group| {
            details
                .iter()
                .find(|d| d.version_group.name == *group)
                .filter(|d| d.positive_level().is_some())
        })
        .or_else(|| details.iter().find(|d| d.positive_level().is_some()))
        .or_else(|| details.first())
        .copied()
}

/// Resolve the learn level of a move from its version-group records.
/// Levels that are missing, non-numeric or non-positive become 1.
pub fn resolve_learn_level(details: &[VersionGroupDetail]) -> LearnLevel {
    let level_up: Vec<&VersionGroupDetail> = details
        .iter()
        .filter(|d| d.move_learn_method.name == LEVEL_UP_METHOD)
        .collect();

    match preferred_detail(&level_up) {
        Some(detail) => LearnLevel {
            level: detail.positive_level().unwrap_or(1),
            version_group: detail.version_group.name.clone(),
        },
        None => LearnLevel {
            level: 1,
            version_group: UNKNOWN_VERSION_GROUP.to_string(),
        },
    }
}

/// Level-up moves of a species, capped at `limit` and sorted by learn level.
///
/// Every move starts with defaulted details typed as `fallback_type`.
pub fn level_up_moves(
    slots: &[MoveSlot],
    limit: usize,
    fallback_type: PokemonType,
) -> Vec<LearnedMove> {
    let mut moves: Vec<LearnedMove> = slots
        .iter()
        .filter(|slot| slot.learned_by(LEVEL_UP_METHOD))
        .take(limit)
        .map(|slot| {
            let learned = resolve_learn_level(&slot.version_group_details);
            LearnedMove::with_defaults(
                slot.move_.name.clone(),
                slot.move_.url.clone(),
                learned.level,
                learned.version_group,
                fallback_type,
            )
        })
        .collect();

    // Stable, so moves sharing a level keep feed order
    moves.sort_by_key(|m| m.level);
    moves
}

/// Names of machine-taught moves, capped at `limit`.
pub fn machine_moves(slots: &[MoveSlot], limit: usize) -> Vec<String> {
    slots
        .iter()
        .filter(|slot| slot.learned_by(MACHINE_METHOD))
        .take(limit)
        .map(|slot| slot.move_.name.clone())
        .collect()
}
