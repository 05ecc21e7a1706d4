use pokesphere::catalog::pricing::format_price;
use pokesphere::catalog::{relevant_price, CardQuery};
use pokesphere::config::QuizConfig;
use pokesphere::fetcher::LoadProgress;
use pokesphere::pokedex::region_counts;
use pokesphere::{
    assemble_quiz, CardCatalog, FileStore, PokeApiClient, PokedexError, PokedexLoader,
    PokesphereConfig, Question, QuestionGenerator, QuizSettings, SpeciesRecord, SpeciesSheet,
    TcgClient,
};
use rand::Rng;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "pokesphere.ron";
const DEFAULT_CACHE_DIR: &str = ".pokesphere-cache";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        println!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PokedexError> {
    let config = PokesphereConfig::load_or_default(Path::new(CONFIG_PATH))?;

    let api = PokeApiClient::new(&config.fetch)?;
    let store = FileStore::new(
        config
            .cache
            .directory
            .clone()
            .unwrap_or_else(|| DEFAULT_CACHE_DIR.into()),
    );
    let quiz_config = config.quiz.clone();
    let catalog_config = config.catalog.clone();
    let mut loader = PokedexLoader::new(api, store, config);

    // Example 1: Load the Pokédex, reporting each batch
    let loaded = loader
        .load(&mut |_: &[SpeciesRecord], progress: LoadProgress| {
            tracing::info!(
                "Loaded {}/{} Pokemon ({} batches)",
                progress.loaded,
                progress.total,
                progress.batches_done
            );
        })
        .await?;
    println!(
        "Loaded {} Pokemon from {:?}",
        loaded.species.len(),
        loaded.source
    );
    for (region, count) in region_counts(&loaded.species) {
        println!("  {:<8} {}", region.to_string(), count);
    }
    println!();

    // Example 2: Show one species sheet
    if let Some(first) = loaded.species.first() {
        println!("{}", SpeciesSheet(first));
    }

    // Example 3: Generate a sample quiz
    if let Some(questions) = sample_quiz(&loaded.species, &quiz_config, &mut rand::rng()) {
        println!("Sample quiz ({} questions):", questions.len());
        for (i, question) in questions.iter().enumerate() {
            println!("  {}. {}", i + 1, question.prompt);
            println!("     {}", question.options.join(" | "));
        }
        println!();
    }

    // Example 4: Browse the newest card set
    let catalog = CardCatalog::new(TcgClient::new(&catalog_config)?);
    match catalog.latest_set().await {
        Ok(set) => {
            let cards = catalog.cards(&set.id).await?;
            println!("Newest set: {} ({} cards)", set.name, cards.len());
            for card in CardQuery::new().apply(&cards).into_iter().take(5) {
                let quote = relevant_price(card);
                println!(
                    "  #{:<4} {:<24} {}",
                    card.number,
                    card.name,
                    format_price(quote.price)
                );
            }
        }
        Err(e) => tracing::warn!("Card catalog unavailable: {}", e),
    }

    Ok(())
}

/// A quiz over the loaded species, or `None` (with a warning) when the pool
/// can't support one.
fn sample_quiz<R: Rng>(
    species: &[SpeciesRecord],
    config: &QuizConfig,
    rng: &mut R,
) -> Option<Vec<Question>> {
    let generator = QuestionGenerator::new(species, config);
    match assemble_quiz(&generator, &QuizSettings::default(), rng) {
        Ok(questions) => Some(questions),
        Err(e) => {
            tracing::warn!("Could not build a sample quiz: {}", e);
            None
        }
    }
}
