//! Multiple-choice question generation.

use super::knowledge::{self, KnowledgeCategory};
use super::sampler::{distractors, sample_distinct, SubjectCycle};
use crate::config::QuizConfig;
use crate::errors::{QuizError, QuizResult};
use rand::Rng;
use schema::{Generation, PokemonType, Region, SpeciesRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 50;
pub const DEFAULT_QUESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Name,
    PrimaryType,
    Move,
    Stat,
    Generation,
    Region,
    Knowledge(KnowledgeCategory),
}

impl Archetype {
    /// Knowledge questions run without a countdown.
    pub fn is_timed(&self) -> bool {
        !matches!(self, Archetype::Knowledge(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub archetype: Archetype,
    /// Pokédex number of the species the question is about.
    pub subject: Option<u32>,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub timed: bool,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// Which archetypes to mix and how many questions to ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    question_count: usize,
    pub archetypes: Vec<Archetype>,
}

impl QuizSettings {
    pub fn new(question_count: usize, archetypes: Vec<Archetype>) -> Self {
        Self {
            question_count: question_count.clamp(MIN_QUESTIONS, MAX_QUESTIONS),
            archetypes,
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_QUESTIONS,
            vec![Archetype::Name, Archetype::Generation, Archetype::Region],
        )
    }
}

/// Builds single questions over a fixed pool of species.
pub struct QuestionGenerator<'a> {
    pool: Vec<&'a SpeciesRecord>,
    names: Vec<String>,
    moves: Vec<String>,
    stat_values: Vec<String>,
}

impl<'a> QuestionGenerator<'a> {
    /// The pool is the first `pool_size` species that have types, stats and moves.
    pub fn new(species: &'a [SpeciesRecord], config: &QuizConfig) -> Self {
        let pool: Vec<&SpeciesRecord> = species
            .iter()
            .filter(|s| !s.types.is_empty() && !s.stats.is_empty() && !s.moves.is_empty())
            .take(config.pool_size)
            .collect();

        let names = pool.iter().map(|s| s.name.clone()).collect();
        let mut seen = HashSet::new();
        let moves = pool
            .iter()
            .flat_map(|s| s.moves.iter())
            .filter(|mv| seen.insert(mv.name.as_str()))
            .map(|mv| mv.name.clone())
            .collect();
        let stat_values = (1..=config.max_stat_value).map(|v| v.to_string()).collect();

        Self {
            pool,
            names,
            moves,
            stat_values,
        }
    }

    pub fn pool(&self) -> &[&'a SpeciesRecord] {
        &self.pool
    }

    /// A question of `archetype` about `species`.
    pub fn about<R: Rng>(
        &self,
        archetype: Archetype,
        species: &SpeciesRecord,
        rng: &mut R,
    ) -> QuizResult<Question> {
        let (prompt, correct, wrong) = match archetype {
            Archetype::Name => (
                format!("Who's That Pokémon? (#{:03})", species.id),
                species.name.clone(),
                distractors(&self.names, &species.name, OPTIONS_PER_QUESTION - 1, rng)?,
            ),
            Archetype::PrimaryType => {
                let primary = species.primary_type().ok_or_else(|| missing(species, "type"))?;
                let universe: Vec<String> =
                    PokemonType::all().iter().map(|t| t.to_string()).collect();
                let correct = primary.to_string();
                let wrong = distractors(&universe, &correct, OPTIONS_PER_QUESTION - 1, rng)?;
                (
                    format!("What is {}'s primary type?", species.name),
                    correct,
                    wrong,
                )
            }
            Archetype::Move => {
                if species.moves.is_empty() {
                    return Err(missing(species, "moves"));
                }
                let correct = species.moves[rng.random_range(0..species.moves.len())]
                    .name
                    .clone();
                // Other moves this species knows would also be right answers
                let universe: Vec<String> = self
                    .moves
                    .iter()
                    .filter(|name| !species.moves.iter().any(|mv| &mv.name == *name))
                    .cloned()
                    .collect();
                let wrong = distractors(&universe, &correct, OPTIONS_PER_QUESTION - 1, rng)?;
                (
                    format!("Which move can {} learn?", species.name),
                    correct,
                    wrong,
                )
            }
            Archetype::Stat => {
                if species.stats.is_empty() {
                    return Err(missing(species, "stats"));
                }
                let stat = &species.stats[rng.random_range(0..species.stats.len())];
                let correct = stat.value.to_string();
                let wrong = distractors(&self.stat_values, &correct, OPTIONS_PER_QUESTION - 1, rng)?;
                (
                    format!(
                        "What is {}'s {} stat?",
                        species.name,
                        stat.name.replacen('-', " ", 1)
                    ),
                    correct,
                    wrong,
                )
            }
            Archetype::Generation => {
                let universe: Vec<String> =
                    Generation::all().iter().map(|g| g.to_string()).collect();
                let correct = Generation::from_pokedex_number(species.id).to_string();
                let wrong = distractors(&universe, &correct, OPTIONS_PER_QUESTION - 1, rng)?;
                (
                    format!("Which generation is {} from?", species.name),
                    correct,
                    wrong,
                )
            }
            Archetype::Region => {
                let universe: Vec<String> = Region::all().iter().map(|r| r.to_string()).collect();
                let correct = species.region.to_string();
                let wrong = distractors(&universe, &correct, OPTIONS_PER_QUESTION - 1, rng)?;
                (
                    format!("Which region is {} originally from?", species.name),
                    correct,
                    wrong,
                )
            }
            Archetype::Knowledge(category) => return self.knowledge(category, rng),
        };

        let mut options = wrong;
        options.push(correct.clone());
        let options = sample_distinct(&options, options.len(), rng)?;

        Ok(Question {
            archetype,
            subject: Some(species.id),
            prompt,
            options,
            correct_answer: correct,
            timed: true,
        })
    }

    /// A random bundled trivia question from `category`, options reshuffled.
    pub fn knowledge<R: Rng>(&self, category: KnowledgeCategory, rng: &mut R) -> QuizResult<Question> {
        let bank = knowledge::questions_for(category);
        if bank.is_empty() {
            return Err(QuizError::EmptyKnowledgeBank(category.to_string()));
        }
        let picked = bank[rng.random_range(0..bank.len())];
        let options = sample_distinct(&picked.options, picked.options.len(), rng)?;

        Ok(Question {
            archetype: Archetype::Knowledge(category),
            subject: None,
            prompt: picked.question.clone(),
            options,
            correct_answer: picked.answer.clone(),
            timed: false,
        })
    }
}

fn missing(species: &SpeciesRecord, field: &'static str) -> QuizError {
    QuizError::MissingData {
        species: species.name.clone(),
        field,
    }
}

/// Assemble up to `settings.question_count()` questions with distinct prompts
/// and distinct answers.
///
/// Each attempt picks an archetype uniformly from the selection and, for
/// species archetypes, the next subject from a shuffled cycle over the pool.
/// Failed attempts and duplicates are skipped; at most three attempts per
/// requested question are made.
pub fn assemble_quiz<R: Rng>(
    generator: &QuestionGenerator<'_>,
    settings: &QuizSettings,
    rng: &mut R,
) -> QuizResult<Vec<Question>> {
    if settings.archetypes.is_empty() {
        return Err(QuizError::NoArchetypesSelected);
    }
    if generator.pool().is_empty() {
        return Err(QuizError::EmptyPool);
    }

    let wanted = settings.question_count();
    let max_attempts = wanted * 3;
    let mut subjects = SubjectCycle::new(generator.pool().len());
    let mut questions: Vec<Question> = Vec::with_capacity(wanted);
    let mut attempts = 0;

    while questions.len() < wanted && attempts < max_attempts {
        attempts += 1;
        let archetype = settings.archetypes[rng.random_range(0..settings.archetypes.len())];

        let generated = match archetype {
            Archetype::Knowledge(category) => generator.knowledge(category, rng),
            _ => match subjects.next(rng) {
                Some(index) => generator.about(archetype, generator.pool()[index], rng),
                None => Err(QuizError::EmptyPool),
            },
        };

        let question = match generated {
            Ok(question) => question,
            Err(err) => {
                tracing::debug!("Skipping {:?} question: {}", archetype, err);
                continue;
            }
        };

        let duplicate = questions.iter().any(|q| {
            q.prompt == question.prompt || q.correct_answer == question.correct_answer
        });
        if duplicate {
            tracing::debug!("Skipping duplicate question: {}", question.prompt);
            continue;
        }
        questions.push(question);
    }

    if questions.is_empty() {
        return Err(QuizError::NoQuestionsGenerated { attempts });
    }
    if questions.len() < wanted {
        tracing::info!(
            "Generated {} of {} requested questions after {} attempts",
            questions.len(),
            wanted,
            attempts
        );
    }
    Ok(questions)
}
