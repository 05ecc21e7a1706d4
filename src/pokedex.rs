//! Filtering and navigation over a loaded species list.

use schema::{LearnedMove, PokemonType, Region, SpeciesRecord};
use std::collections::BTreeMap;

/// A filtered view of the pokedex: optional region, optional search text.
pub struct PokedexView<'a> {
    species: &'a [SpeciesRecord],
    region: Option<Region>,
    query: String,
}

impl<'a> PokedexView<'a> {
    pub fn new(species: &'a [SpeciesRecord]) -> Self {
        Self {
            species,
            region: None,
            query: String::new(),
        }
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_lowercase();
        self
    }

    fn matches(&self, species: &SpeciesRecord) -> bool {
        if self.region.is_some_and(|region| species.region != region) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        species.name.to_lowercase().contains(&self.query)
            || species.id.to_string().contains(&self.query)
            || format!("{:03}", species.id).contains(&self.query)
    }

    /// Species passing the current filters, in list order.
    pub fn visible(&self) -> Vec<&'a SpeciesRecord> {
        self.species.iter().filter(|s| self.matches(s)).collect()
    }

    /// The visible species after `id`, or `None` at the end of the list.
    pub fn next_after(&self, id: u32) -> Option<&'a SpeciesRecord> {
        let visible = self.visible();
        let index = visible.iter().position(|s| s.id == id)?;
        visible.get(index + 1).copied()
    }

    /// The visible species before `id`, or `None` at the start of the list.
    pub fn previous_before(&self, id: u32) -> Option<&'a SpeciesRecord> {
        let visible = self.visible();
        let index = visible.iter().position(|s| s.id == id)?;
        index.checked_sub(1).and_then(|i| visible.get(i).copied())
    }
}

/// Moves grouped by type, biggest group first.
pub fn moves_by_type(species: &SpeciesRecord) -> Vec<(PokemonType, Vec<&LearnedMove>)> {
    let mut groups: BTreeMap<PokemonType, Vec<&LearnedMove>> = BTreeMap::new();
    for mv in &species.moves {
        groups.entry(*mv.move_type.value()).or_default().push(mv);
    }
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups
}

/// Number of species per region, in region order.
pub fn region_counts(species: &[SpeciesRecord]) -> Vec<(Region, usize)> {
    Region::all()
        .into_iter()
        .map(|region| (region, species.iter().filter(|s| s.region == region).count()))
        .collect()
}
