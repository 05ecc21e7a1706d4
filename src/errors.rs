use thiserror::Error;

/// Main error type for the pokesphere library
#[derive(Debug, Error)]
pub enum PokedexError {
    /// Error while acquiring species data from the API
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// Error reading or writing the snapshot cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    /// Error generating or running a quiz
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),
    /// Error talking to the trading-card catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to fetching species and move data
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The response body was not the expected JSON shape
    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    /// A decoded payload could not be turned into a species record
    #[error("malformed species data for {name}: {reason}")]
    Transform { name: String, reason: String },
    /// Every detail fetch failed or was filtered out
    #[error("Failed to fetch any Pokemon data")]
    NoSpeciesLoaded,
}

/// Errors related to the snapshot cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] postcard::Error),
    #[error("could not write snapshot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to quiz generation and sessions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The sampler could not find enough distinct candidates
    #[error("need {needed} distinct candidates but only {available} are available")]
    InsufficientCandidates { needed: usize, available: usize },
    /// The subject species lacks the data an archetype needs
    #[error("{species} has no {field} to ask about")]
    MissingData { species: String, field: &'static str },
    /// No question archetypes were selected
    #[error("Please select at least one question type")]
    NoArchetypesSelected,
    /// The species pool is empty
    #[error("No Pokemon data available for a quiz")]
    EmptyPool,
    /// The knowledge bank has no entries for a category
    #[error("no knowledge questions bundled for {0}")]
    EmptyKnowledgeBank(String),
    /// Every generation attempt failed or produced a duplicate
    #[error("Unable to generate quiz questions after {attempts} attempts")]
    NoQuestionsGenerated { attempts: usize },
    /// The session cannot accept the requested action in its current phase
    #[error("invalid action for the current quiz phase: {0}")]
    InvalidTransition(String),
}

/// Errors related to the trading-card catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] FetchError),
    #[error("the catalog returned no card sets")]
    NoSets,
}

/// Errors related to configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Type alias for Results using PokedexError
pub type PokedexResult<T> = Result<T, PokedexError>;

/// Type alias for Results using FetchError
pub type FetchResult<T> = Result<T, FetchError>;

/// Type alias for Results using CacheError
pub type CacheResult<T> = Result<T, CacheError>;

/// Type alias for Results using QuizError
pub type QuizResult<T> = Result<T, QuizError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
