//! Bundled trivia questions for the untimed knowledge archetypes.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum KnowledgeCategory {
    #[strum(to_string = "Game History")]
    GameHistory,
    #[strum(to_string = "Pokémon Lore")]
    Lore,
    #[strum(to_string = "Gym Leaders")]
    GymLeaders,
    #[strum(to_string = "Legendary Pokémon")]
    Legendary,
    #[strum(to_string = "Evolution")]
    Evolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeQuestion {
    pub category: KnowledgeCategory,
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

static KNOWLEDGE_BANK: LazyLock<Vec<KnowledgeQuestion>> = LazyLock::new(|| {
    match ron::from_str(include_str!("../../data/knowledge.ron")) {
        Ok(bank) => bank,
        Err(err) => {
            tracing::error!("Bundled knowledge bank is malformed: {}", err);
            Vec::new()
        }
    }
});

/// Every bundled question.
pub fn bank() -> &'static [KnowledgeQuestion] {
    &KNOWLEDGE_BANK
}

/// Bundled questions for one category, in file order.
pub fn questions_for(category: KnowledgeCategory) -> Vec<&'static KnowledgeQuestion> {
    KNOWLEDGE_BANK
        .iter()
        .filter(|q| q.category == category)
        .collect()
}
