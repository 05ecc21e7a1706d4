//! Best-effort move detail enrichment.
//!
//! Only the head of the species list is enriched, to bound the number of
//! move requests. A failed move lookup leaves that move's defaulted fields
//! in place and never fails the species or the load.

use crate::api::wire::MoveDetail;
use crate::api::PokeApi;
use crate::config::EnrichConfig;
use futures::future::join_all;
use schema::{DamageClass, LearnedMove, PokemonType, SpeciesRecord, Sourced};
use std::str::FromStr;

pub struct MoveEnricher<'a, A: PokeApi> {
    api: &'a A,
    config: &'a EnrichConfig,
}

impl<'a, A: PokeApi> MoveEnricher<'a, A> {
    pub fn new(api: &'a A, config: &'a EnrichConfig) -> Self {
        Self { api, config }
    }

    /// Enrich the first `species_limit` species in place.
    ///
    /// Species are handled in groups of `pause_every`, each group concurrently,
    /// with a pause between groups.
    pub async fn enrich(&self, species: &mut [SpeciesRecord]) {
        let limit = self.config.species_limit.min(species.len());
        let group_size = self.config.pause_every.max(1);
        tracing::info!("Fetching move details for {} species", limit);

        let head = &mut species[..limit];
        let group_count = head.len().div_ceil(group_size);
        for (index, group) in head.chunks_mut(group_size).enumerate() {
            join_all(group.iter_mut().map(|s| self.enrich_species(s))).await;
            if index + 1 < group_count {
                tokio::time::sleep(self.config.pause()).await;
            }
        }
    }

    async fn enrich_species(&self, species: &mut SpeciesRecord) {
        species.moves.truncate(self.config.moves_per_species);
        let details = join_all(species.moves.iter().map(|mv| self.fetch_move(mv))).await;

        let mut resolved = 0;
        for (mv, detail) in species.moves.iter_mut().zip(details) {
            if let Some(detail) = detail {
                merge_move_detail(mv, detail);
                resolved += 1;
            }
        }
        tracing::debug!(
            "{}: {}/{} moves enriched",
            species.name,
            resolved,
            species.moves.len()
        );
    }

    async fn fetch_move(&self, mv: &LearnedMove) -> Option<MoveDetail> {
        match self.api.move_detail(&mv.url).await {
            Ok(detail) => Some(detail),
            Err(err) => {
                tracing::warn!("Failed to fetch move {}: {}", mv.name, err);
                None
            }
        }
    }
}

/// Merge a fetched move record into a learned move.
///
/// Fields the record does not carry (or carries in an unknown form) keep
/// their defaulted values.
pub fn merge_move_detail(mv: &mut LearnedMove, detail: MoveDetail) {
    if let Some(move_type) = detail
        .type_
        .as_ref()
        .and_then(|t| PokemonType::from_str(&t.name).ok())
    {
        mv.move_type = Sourced::Resolved(move_type);
    }
    mv.power = Sourced::Resolved(detail.power);
    mv.accuracy = Sourced::Resolved(detail.accuracy);
    if let Some(pp) = detail.pp {
        mv.pp = Sourced::Resolved(pp);
    }
    if let Some(category) = detail
        .damage_class
        .as_ref()
        .and_then(|c| DamageClass::from_str(&c.name).ok())
    {
        mv.category = Sourced::Resolved(category);
    }
}
