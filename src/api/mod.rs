//! PokeAPI access: the `PokeApi` seam and its reqwest-backed implementation.

pub mod wire;

use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use wire::{MoveDetail, NamedResource, PokemonDetail, SpeciesListing};

/// The three PokeAPI calls the acquisition pipeline depends on.
///
/// Implemented by [`PokeApiClient`] for real traffic and by in-memory fakes
/// in tests.
#[allow(async_fn_in_trait)]
pub trait PokeApi {
    async fn list_species(&self, limit: usize) -> FetchResult<Vec<NamedResource>>;
    async fn species_detail(&self, url: &str) -> FetchResult<PokemonDetail>;
    async fn move_detail(&self, url: &str) -> FetchResult<MoveDetail>;
}

/// HTTP client for PokeAPI
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| FetchError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl PokeApi for PokeApiClient {
    async fn list_species(&self, limit: usize) -> FetchResult<Vec<NamedResource>> {
        let url = format!("{}/pokemon?limit={}", self.base_url, limit);
        tracing::debug!("Fetching species listing: {}", url);
        let listing: SpeciesListing = self.get_json(&url).await?;
        tracing::info!(
            "Listing returned {} of {} species",
            listing.results.len(),
            listing.count
        );
        Ok(listing.results)
    }

    async fn species_detail(&self, url: &str) -> FetchResult<PokemonDetail> {
        self.get_json(url).await
    }

    async fn move_detail(&self, url: &str) -> FetchResult<MoveDetail> {
        self.get_json(url).await
    }
}
