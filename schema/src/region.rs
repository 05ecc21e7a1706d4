use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Inclusive upper Pokédex number of every region except the last.
/// Anything above the final bound belongs to Paldea.
const REGION_UPPER_BOUNDS: [(u32, Region); 8] = [
    (151, Region::Kanto),
    (251, Region::Johto),
    (386, Region::Hoenn),
    (493, Region::Sinnoh),
    (649, Region::Unova),
    (721, Region::Kalos),
    (809, Region::Alola),
    (905, Region::Galar),
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Region {
    Kanto,
    Johto,
    Hoenn,
    Sinnoh,
    Unova,
    Kalos,
    Alola,
    Galar,
    Paldea,
}

impl Region {
    /// Classify a national Pokédex number into its home region.
    ///
    /// Total: 0 falls back to Kanto, everything past the Galar range is Paldea.
    pub fn from_pokedex_number(id: u32) -> Region {
        REGION_UPPER_BOUNDS
            .iter()
            .find(|(upper, _)| id <= *upper)
            .map(|(_, region)| *region)
            .unwrap_or(Region::Paldea)
    }

    pub fn all() -> Vec<Region> {
        Region::iter().collect()
    }

    /// Lowercase slug, as used in filters and by the original data feed.
    pub fn slug(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn generation(&self) -> Generation {
        match self {
            Region::Kanto => Generation::I,
            Region::Johto => Generation::II,
            Region::Hoenn => Generation::III,
            Region::Sinnoh => Generation::IV,
            Region::Unova => Generation::V,
            Region::Kalos => Generation::VI,
            Region::Alola => Generation::VII,
            Region::Galar => Generation::VIII,
            Region::Paldea => Generation::IX,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    Display, EnumIter,
)]
pub enum Generation {
    #[strum(to_string = "Generation I")]
    I,
    #[strum(to_string = "Generation II")]
    II,
    #[strum(to_string = "Generation III")]
    III,
    #[strum(to_string = "Generation IV")]
    IV,
    #[strum(to_string = "Generation V")]
    V,
    #[strum(to_string = "Generation VI")]
    VI,
    #[strum(to_string = "Generation VII")]
    VII,
    #[strum(to_string = "Generation VIII")]
    VIII,
    #[strum(to_string = "Generation IX")]
    IX,
}

impl Generation {
    pub fn from_pokedex_number(id: u32) -> Generation {
        Region::from_pokedex_number(id).generation()
    }

    pub fn all() -> Vec<Generation> {
        Generation::iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        let cases = [
            (1, Region::Kanto),
            (151, Region::Kanto),
            (152, Region::Johto),
            (251, Region::Johto),
            (252, Region::Hoenn),
            (386, Region::Hoenn),
            (387, Region::Sinnoh),
            (493, Region::Sinnoh),
            (494, Region::Unova),
            (649, Region::Unova),
            (650, Region::Kalos),
            (721, Region::Kalos),
            (722, Region::Alola),
            (809, Region::Alola),
            (810, Region::Galar),
            (905, Region::Galar),
            (906, Region::Paldea),
            (1025, Region::Paldea),
        ];
        for (id, expected) in cases {
            assert_eq!(Region::from_pokedex_number(id), expected, "id {}", id);
        }
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut previous = Region::from_pokedex_number(1);
        for id in 2..=1100 {
            let current = Region::from_pokedex_number(id);
            assert!(current >= previous, "region went backwards at id {}", id);
            previous = current;
        }
    }

    #[test]
    fn test_zero_falls_back_to_first_region() {
        assert_eq!(Region::from_pokedex_number(0), Region::Kanto);
    }

    #[test]
    fn test_generation_labels_follow_regions() {
        assert_eq!(Generation::from_pokedex_number(25).to_string(), "Generation I");
        assert_eq!(Generation::from_pokedex_number(1000).to_string(), "Generation IX");
        assert_eq!(Region::Galar.to_string(), "Galar");
        assert_eq!(Region::Galar.slug(), "galar");
        assert_eq!(Region::all().len(), 9);
        assert_eq!(Generation::all().len(), 9);
    }
}
