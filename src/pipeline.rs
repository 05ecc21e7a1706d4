use crate::api::PokeApi;
use crate::cache::{SnapshotStore, SpeciesCache};
use crate::config::PokesphereConfig;
use crate::enrich::MoveEnricher;
use crate::errors::PokedexResult;
use crate::fetcher::{BatchFetcher, LoadObserver};
use schema::SpeciesRecord;

/// Where a loaded species list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Network,
}

#[derive(Debug, Clone)]
pub struct LoadedPokedex {
    pub species: Vec<SpeciesRecord>,
    pub source: LoadSource,
}

/// Cache-aware species loader: cache → batched fetch → move enrichment → cache.
pub struct PokedexLoader<A: PokeApi, S: SnapshotStore> {
    api: A,
    cache: SpeciesCache<S>,
    config: PokesphereConfig,
}

impl<A: PokeApi, S: SnapshotStore> PokedexLoader<A, S> {
    pub fn new(api: A, store: S, config: PokesphereConfig) -> Self {
        let cache = SpeciesCache::new(store, &config.cache);
        Self { api, cache, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &SpeciesCache<S> {
        &self.cache
    }

    /// Load the species list, reusing a fresh snapshot when there is one.
    ///
    /// On a miss the list is fetched, enriched and written back. The snapshot
    /// is only replaced after a successful load; a failed write is logged.
    pub async fn load<O: LoadObserver>(&mut self, observer: &mut O) -> PokedexResult<LoadedPokedex> {
        if let Some(species) = self.cache.load() {
            tracing::info!("Using cached Pokemon data ({} species)", species.len());
            return Ok(LoadedPokedex {
                species,
                source: LoadSource::Cache,
            });
        }
        self.refresh(observer).await
    }

    /// Fetch a fresh list, ignoring any cached snapshot.
    pub async fn refresh<O: LoadObserver>(&mut self, observer: &mut O) -> PokedexResult<LoadedPokedex> {
        let mut species = BatchFetcher::new(&self.api, &self.config.fetch)
            .fetch_all(observer)
            .await?;

        MoveEnricher::new(&self.api, &self.config.enrich)
            .enrich(&mut species)
            .await;

        if let Err(err) = self.cache.store(&species) {
            tracing::warn!("Could not cache Pokemon data: {}", err);
        }
        tracing::info!("Loaded {} Pokemon", species.len());

        Ok(LoadedPokedex {
            species,
            source: LoadSource::Network,
        })
    }
}
