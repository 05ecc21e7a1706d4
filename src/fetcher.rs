//! Batched species acquisition.
//!
//! One listing call, then fixed-size batches of concurrent detail fetches.
//! Batches run strictly one after another, so at most `batch_size` detail
//! requests are ever outstanding.

use crate::api::wire::NamedResource;
use crate::api::PokeApi;
use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use crate::species::transform;
use futures::future::join_all;
use schema::SpeciesRecord;

/// How far a load has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
    pub batches_done: usize,
}

/// Receives the accumulated species list after every batch.
pub trait LoadObserver {
    fn on_batch(&mut self, partial: &[SpeciesRecord], progress: LoadProgress);
}

impl<F> LoadObserver for F
where
    F: FnMut(&[SpeciesRecord], LoadProgress),
{
    fn on_batch(&mut self, partial: &[SpeciesRecord], progress: LoadProgress) {
        self(partial, progress)
    }
}

/// Observer that ignores every update.
pub struct Silent;

impl LoadObserver for Silent {
    fn on_batch(&mut self, _partial: &[SpeciesRecord], _progress: LoadProgress) {}
}

pub struct BatchFetcher<'a, A: PokeApi> {
    api: &'a A,
    config: &'a FetchConfig,
}

impl<'a, A: PokeApi> BatchFetcher<'a, A> {
    pub fn new(api: &'a A, config: &'a FetchConfig) -> Self {
        Self { api, config }
    }

    /// Fetch and transform every listed species.
    ///
    /// Individual failures drop only the affected species. A failed listing
    /// call, or ending up with no species at all, is an error.
    pub async fn fetch_all<O: LoadObserver>(&self, observer: &mut O) -> FetchResult<Vec<SpeciesRecord>> {
        let summaries = self.api.list_species(self.config.listing_limit).await?;
        let total = summaries.len();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = total.div_ceil(batch_size);

        let mut species = Vec::with_capacity(total);
        for (index, batch) in summaries.chunks(batch_size).enumerate() {
            let results = join_all(batch.iter().map(|summary| self.fetch_one(summary))).await;
            species.extend(results.into_iter().flatten());

            let progress = LoadProgress {
                loaded: species.len(),
                total,
                batches_done: index + 1,
            };
            tracing::debug!(
                "Batch {}/{} done: {} of {} species loaded",
                index + 1,
                batch_count,
                progress.loaded,
                total
            );
            if !species.is_empty() {
                observer.on_batch(&species, progress);
            }

            if index + 1 < batch_count {
                tokio::time::sleep(self.config.batch_delay()).await;
            }
        }

        if species.is_empty() {
            return Err(FetchError::NoSpeciesLoaded);
        }
        tracing::info!("Fetched {} species from {} listed", species.len(), total);
        Ok(species)
    }

    /// Fetch and transform one species; any failure becomes `None`.
    async fn fetch_one(&self, summary: &NamedResource) -> Option<SpeciesRecord> {
        let outcome = match self.api.species_detail(&summary.url).await {
            Ok(detail) => transform(detail, self.config),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!("Dropping {}: {}", summary.name, err);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::wire::{MoveDetail, PokemonDetail};
    use pretty_assertions::assert_eq;
    use schema::Region;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Started(String),
        Finished(String),
    }

    /// In-memory PokeAPI. Details are keyed by URL; missing URLs answer 500.
    #[derive(Default)]
    pub(crate) struct FakePokeApi {
        pub listing: Vec<NamedResource>,
        pub details: HashMap<String, serde_json::Value>,
        pub moves: HashMap<String, serde_json::Value>,
        pub listing_fails: bool,
        pub in_flight: Cell<usize>,
        pub max_in_flight: Cell<usize>,
        pub calls: RefCell<Vec<String>>,
        pub log: RefCell<Vec<Call>>,
    }

    impl FakePokeApi {
        pub fn add_species(&mut self, id: u32, name: &str, types: &[&str]) {
            let url = format!("https://pokeapi.co/api/v2/pokemon/{}/", id);
            self.listing.push(NamedResource {
                name: name.to_string(),
                url: url.clone(),
            });
            self.details.insert(url, species_json(id, name, types, true));
        }

        pub fn add_listing_only(&mut self, id: u32, name: &str) {
            self.listing.push(NamedResource {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", id),
            });
        }

        fn status(url: &str, status: u16) -> FetchError {
            FetchError::Status {
                url: url.to_string(),
                status,
            }
        }

        async fn track<T>(&self, url: &str, value: FetchResult<T>) -> FetchResult<T> {
            self.calls.borrow_mut().push(url.to_string());
            self.log.borrow_mut().push(Call::Started(url.to_string()));
            self.in_flight.set(self.in_flight.get() + 1);
            self.max_in_flight
                .set(self.max_in_flight.get().max(self.in_flight.get()));
            tokio::task::yield_now().await;
            self.in_flight.set(self.in_flight.get() - 1);
            self.log.borrow_mut().push(Call::Finished(url.to_string()));
            value
        }
    }

    impl PokeApi for FakePokeApi {
        async fn list_species(&self, limit: usize) -> FetchResult<Vec<NamedResource>> {
            if self.listing_fails {
                return Err(Self::status("listing", 503));
            }
            Ok(self.listing.iter().take(limit).cloned().collect())
        }

        async fn species_detail(&self, url: &str) -> FetchResult<PokemonDetail> {
            let value = match self.details.get(url) {
                Some(payload) => serde_json::from_value(payload.clone()).map_err(|e| {
                    FetchError::Decode {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }),
                None => Err(Self::status(url, 500)),
            };
            self.track(url, value).await
        }

        async fn move_detail(&self, url: &str) -> FetchResult<MoveDetail> {
            let value = match self.moves.get(url) {
                Some(payload) => serde_json::from_value(payload.clone()).map_err(|e| {
                    FetchError::Decode {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }),
                None => Err(Self::status(url, 404)),
            };
            self.track(url, value).await
        }
    }

    pub(crate) fn move_url(name: &str) -> String {
        format!("https://pokeapi.co/api/v2/move/{}/", name)
    }

    pub(crate) fn species_json(id: u32, name: &str, types: &[&str], is_default: bool) -> serde_json::Value {
        let types: Vec<serde_json::Value> = types
            .iter()
            .enumerate()
            .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
            .collect();
        let stats: Vec<serde_json::Value> = [
            "hp",
            "attack",
            "defense",
            "special-attack",
            "special-defense",
            "speed",
        ]
        .iter()
        .enumerate()
        .map(|(i, s)| json!({ "base_stat": 40 + id + i as u32, "stat": { "name": s, "url": "" } }))
        .collect();
        let signature = format!("{}-special", name);
        let moves: Vec<serde_json::Value> = ["tackle", "growl", signature.as_str()]
            .iter()
            .enumerate()
            .map(|(i, m)| {
                json!({
                    "move": { "name": m, "url": move_url(m) },
                    "version_group_details": [{
                        "level_learned_at": i * 5 + 1,
                        "move_learn_method": { "name": "level-up", "url": "" },
                        "version_group": { "name": "scarlet-violet", "url": "" }
                    }]
                })
            })
            .collect();
        json!({
            "id": id,
            "name": name,
            "is_default": is_default,
            "height": 10,
            "weight": 100,
            "sprites": {
                "front_default": format!("{}.png", name),
                "other": { "official-artwork": { "front_default": format!("{}-art.png", name) } }
            },
            "types": types,
            "stats": stats,
            "abilities": [{ "ability": { "name": "overgrow", "url": "" } }],
            "moves": moves
        })
    }

    fn config(batch_size: usize) -> FetchConfig {
        FetchConfig {
            batch_size,
            batch_delay_ms: 0,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_failed_detail_drops_only_that_species() {
        let mut api = FakePokeApi::default();
        api.add_species(1, "bulbasaur", &["grass", "poison"]);
        api.add_listing_only(2, "ivysaur"); // answers HTTP 500
        api.add_species(3, "venusaur", &["grass", "poison"]);
        let config = config(15);

        let species = BatchFetcher::new(&api, &config)
            .fetch_all(&mut Silent)
            .await
            .unwrap();

        let ids: Vec<u32> = species.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(species.iter().all(|s| s.region == Region::Kanto));
    }

    #[tokio::test]
    async fn test_bad_payloads_drop_only_their_own_species() {
        let mut api = FakePokeApi::default();
        api.add_species(1, "bulbasaur", &["grass", "poison"]);
        // Decodes, but carries a type the game doesn't know
        let odd_type = "https://pokeapi.co/api/v2/pokemon/2/".to_string();
        api.add_listing_only(2, "ivysaur");
        api.details
            .insert(odd_type, species_json(2, "ivysaur", &["shadow"], true));
        // Doesn't decode at all
        let garbled = "https://pokeapi.co/api/v2/pokemon/3/".to_string();
        api.add_listing_only(3, "venusaur");
        api.details.insert(garbled, json!({ "id": "nope" }));
        api.add_species(4, "charmander", &["fire"]);
        let config = config(15);

        let species = BatchFetcher::new(&api, &config)
            .fetch_all(&mut Silent)
            .await
            .unwrap();

        let ids: Vec<u32> = species.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(api.calls.borrow().len(), 4);
    }

    #[tokio::test]
    async fn test_region_is_derived_per_species() {
        let mut api = FakePokeApi::default();
        api.add_species(25, "pikachu", &["electric"]);
        api.add_species(152, "chikorita", &["grass"]);
        api.add_species(906, "sprigatito", &["grass"]);
        let config = config(2);

        let species = BatchFetcher::new(&api, &config)
            .fetch_all(&mut Silent)
            .await
            .unwrap();

        let regions: Vec<Region> = species.iter().map(|s| s.region).collect();
        assert_eq!(regions, vec![Region::Kanto, Region::Johto, Region::Paldea]);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_batch_size() {
        let mut api = FakePokeApi::default();
        for id in 1..=40 {
            api.add_species(id, &format!("mon{}", id), &["normal"]);
        }
        let config = config(15);
        let mut batch_sizes = Vec::new();

        let species = BatchFetcher::new(&api, &config)
            .fetch_all(&mut |partial: &[SpeciesRecord], progress: LoadProgress| {
                assert_eq!(partial.len(), progress.loaded);
                batch_sizes.push(progress.loaded);
            })
            .await
            .unwrap();

        assert_eq!(species.len(), 40);
        assert!(api.max_in_flight.get() <= 15);
        assert!(api.max_in_flight.get() > 1, "a batch should run concurrently");
        assert_eq!(batch_sizes, vec![15, 30, 40]);
    }

    #[tokio::test]
    async fn test_batches_run_in_listing_order() {
        let mut api = FakePokeApi::default();
        for id in 1..=9 {
            api.add_species(id, &format!("mon{}", id), &["water"]);
        }
        let config = config(3);

        BatchFetcher::new(&api, &config)
            .fetch_all(&mut Silent)
            .await
            .unwrap();

        // Every request of batch N completes before any request of batch N+1 starts
        let log = api.log.borrow();
        let index_of = |wanted: &Call| log.iter().position(|c| c == wanted).unwrap();
        let url = |id: u32| format!("https://pokeapi.co/api/v2/pokemon/{}/", id);
        assert_eq!(log.len(), 18);
        for batch in 0..2u32 {
            let last_finish = (1..=3)
                .map(|i| index_of(&Call::Finished(url(batch * 3 + i))))
                .max()
                .unwrap();
            let first_start = (1..=3)
                .map(|i| index_of(&Call::Started(url((batch + 1) * 3 + i))))
                .min()
                .unwrap();
            assert!(
                last_finish < first_start,
                "batch {} still running when batch {} started",
                batch,
                batch + 1
            );
        }
        // Within a batch the requests overlap
        let first_finish = log.iter().position(|c| matches!(c, Call::Finished(_))).unwrap();
        assert_eq!(first_finish, 3);
    }

    #[tokio::test]
    async fn test_non_default_forms_are_dropped() {
        let mut api = FakePokeApi::default();
        api.add_species(6, "charizard", &["fire", "flying"]);
        let mega_url = "https://pokeapi.co/api/v2/pokemon/10034/".to_string();
        api.listing.push(NamedResource {
            name: "charizard-mega-x".to_string(),
            url: mega_url.clone(),
        });
        api.details
            .insert(mega_url, species_json(10034, "charizard-mega-x", &["fire", "dragon"], false));
        let config = config(15);

        let species = BatchFetcher::new(&api, &config)
            .fetch_all(&mut Silent)
            .await
            .unwrap();

        assert_eq!(species.len(), 1);
        assert_eq!(species[0].name, "charizard");
    }

    #[tokio::test]
    async fn test_nothing_loaded_is_an_error() {
        let mut api = FakePokeApi::default();
        api.add_listing_only(1, "bulbasaur");
        api.add_listing_only(2, "ivysaur");
        let config = config(15);
        let mut published = 0;

        let result = BatchFetcher::new(&api, &config)
            .fetch_all(&mut |_: &[SpeciesRecord], _: LoadProgress| published += 1)
            .await;

        assert!(matches!(result, Err(FetchError::NoSpeciesLoaded)));
        assert_eq!(published, 0);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let api = FakePokeApi {
            listing_fails: true,
            ..FakePokeApi::default()
        };
        let config = config(15);

        let result = BatchFetcher::new(&api, &config).fetch_all(&mut Silent).await;

        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }
}
