//! Pokémon Trading Card Game catalog: sets, cards and prices.

pub mod browse;
pub mod models;
pub mod pricing;

use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult, FetchError, FetchResult};
use models::{ApiPage, Card, CardSet};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use browse::{CardQuery, SortOrder, Supertype};
pub use pricing::{highest_price, rarity_rank, relevant_price, PriceQuote};

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[allow(async_fn_in_trait)]
pub trait CardCatalogApi {
    async fn sets(&self) -> CatalogResult<Vec<CardSet>>;
    async fn cards_in_set(&self, set_id: &str) -> CatalogResult<Vec<Card>>;
}

/// HTTP client for the Pokémon TCG API
pub struct TcgClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TcgClient {
    pub fn new(config: &CatalogConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        if config.api_key.is_none() {
            tracing::warn!("No TCG API key configured; requests will be rate limited");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> FetchResult<Vec<T>> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
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

        let page: ApiPage<T> = response.json().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(page.data)
    }
}

impl CardCatalogApi for TcgClient {
    async fn sets(&self) -> CatalogResult<Vec<CardSet>> {
        let url = format!("{}/sets", self.base_url);
        Ok(self.get_page(&url).await?)
    }

    async fn cards_in_set(&self, set_id: &str) -> CatalogResult<Vec<Card>> {
        let url = format!("{}/cards?q=set.id:{}", self.base_url, set_id);
        Ok(self.get_page(&url).await?)
    }
}

/// Ordered access to the catalog.
pub struct CardCatalog<A: CardCatalogApi> {
    api: A,
}

impl<A: CardCatalogApi> CardCatalog<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// All sets, newest release first. An empty catalog is an error.
    pub async fn sets(&self) -> CatalogResult<Vec<CardSet>> {
        let mut sets = self.api.sets().await?;
        if sets.is_empty() {
            return Err(CatalogError::NoSets);
        }
        browse::sort_sets_newest_first(&mut sets);
        tracing::info!("Loaded {} card sets", sets.len());
        Ok(sets)
    }

    /// The newest set, which the catalog opens on.
    pub async fn latest_set(&self) -> CatalogResult<CardSet> {
        self.sets().await?.into_iter().next().ok_or(CatalogError::NoSets)
    }

    /// Cards of one set in collector-number order.
    pub async fn cards(&self, set_id: &str) -> CatalogResult<Vec<Card>> {
        let mut cards = self.api.cards_in_set(set_id).await?;
        browse::sort_cards_by_number(&mut cards);
        tracing::debug!("Set {} has {} cards", set_id, cards.len());
        Ok(cards)
    }
}
