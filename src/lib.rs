//! PokéSphere data engine
//!
//! Acquires and caches Pokédex data from PokeAPI, enriches move details,
//! generates multiple-choice quizzes with a timed session state machine, and
//! browses the Pokémon Trading Card Game catalog.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod enrich;
pub mod errors;
pub mod fetcher;
pub mod moves;
pub mod pipeline;
pub mod pokedex;
pub mod quiz;
pub mod species;

pub use schema::{
    DamageClass, Generation, LearnedMove, PokemonType, Region, Sourced, SpeciesRecord, StatEntry,
};

pub use api::{PokeApi, PokeApiClient};
pub use cache::{FileStore, MemoryStore, SnapshotStore, SpeciesCache};
pub use fetcher::{LoadObserver, LoadProgress, Silent};
pub use pipeline::{LoadSource, LoadedPokedex, PokedexLoader};

pub use pokedex::PokedexView;
pub use species::SpeciesSheet;

pub use quiz::{
    assemble_quiz, spawn_session, Archetype, Question, QuestionGenerator, QuizSession, QuizSettings,
};

pub use catalog::{CardCatalog, CardCatalogApi, TcgClient};

pub use config::PokesphereConfig;

pub use errors::{
    CacheError, CacheResult, CatalogError, CatalogResult, ConfigError, FetchError, FetchResult,
    PokedexError, PokedexResult, QuizError, QuizResult,
};
