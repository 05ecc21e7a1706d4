//! Runtime configuration.
//!
//! Every field has a default matching the values the pipeline was tuned
//! with; a RON file can override any subset of them.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const TCG_API_BASE_URL: &str = "https://api.pokemontcg.io/v2";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokesphereConfig {
    pub fetch: FetchConfig,
    pub enrich: EnrichConfig,
    pub cache: CacheConfig,
    pub quiz: QuizConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub listing_limit: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub max_level_up_moves: usize,
    pub max_machine_moves: usize,
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: POKEAPI_BASE_URL.to_string(),
            listing_limit: 1200,
            batch_size: 15,
            batch_delay_ms: 100,
            max_level_up_moves: 30,
            max_machine_moves: 10,
            request_timeout_secs: 15,
        }
    }
}

impl FetchConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Only the first `species_limit` species get move details fetched.
    pub species_limit: usize,
    pub moves_per_species: usize,
    pub pause_every: usize,
    pub pause_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            species_limit: 500,
            moves_per_species: 20,
            pause_every: 10,
            pause_ms: 200,
        }
    }
}

impl EnrichConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Bumping the version suffix orphans every older snapshot.
    pub key: String,
    pub max_age_secs: u64,
    pub directory: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: "pokemon_data_cache_v5".to_string(),
            max_age_secs: 24 * 60 * 60,
            directory: None,
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub pool_size: usize,
    pub question_time_secs: u32,
    pub timed_advance_ms: u64,
    pub untimed_advance_ms: u64,
    pub max_stat_value: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            pool_size: 151,
            question_time_secs: 30,
            timed_advance_ms: 2000,
            untimed_advance_ms: 3000,
            max_stat_value: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: TCG_API_BASE_URL.to_string(),
            api_key: option_env!("POKEMONTCG_API_KEY").map(str::to_string),
        }
    }
}

impl PokesphereConfig {
    /// Load configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
