//! Uniform sampling without replacement.
//!
//! Every function takes the RNG as a parameter so callers (and tests) can
//! pass a seeded `StdRng` and get reproducible draws.

use crate::errors::{QuizError, QuizResult};
use rand::Rng;
use std::collections::HashSet;

/// Draw `count` distinct positions of `universe` with a partial Fisher–Yates
/// shuffle and return the items at those positions.
///
/// Each `count`-subset is equally likely. Fails when the universe is smaller
/// than `count`.
pub fn sample_distinct<T: Clone, R: Rng>(
    universe: &[T],
    count: usize,
    rng: &mut R,
) -> QuizResult<Vec<T>> {
    if universe.len() < count {
        return Err(QuizError::InsufficientCandidates {
            needed: count,
            available: universe.len(),
        });
    }

    let mut indices: Vec<usize> = (0..universe.len()).collect();
    for i in 0..count {
        let j = rng.random_range(i..indices.len());
        indices.swap(i, j);
    }
    Ok(indices[..count].iter().map(|&i| universe[i].clone()).collect())
}

/// Draw `count` distinct values from `universe`, none equal to `exclude`.
///
/// Duplicates in the universe count once. Never returns fewer than `count`
/// values: a universe that cannot supply them is an error.
pub fn distractors<R: Rng>(
    universe: &[String],
    exclude: &str,
    count: usize,
    rng: &mut R,
) -> QuizResult<Vec<String>> {
    let mut seen = HashSet::new();
    let candidates: Vec<String> = universe
        .iter()
        .filter(|value| value.as_str() != exclude && seen.insert(value.as_str()))
        .cloned()
        .collect();
    sample_distinct(&candidates, count, rng)
}

/// Visits every index of a pool once, in random order, before any repeats.
pub struct SubjectCycle {
    order: Vec<usize>,
    cursor: usize,
}

impl SubjectCycle {
    pub fn new(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
            cursor: len,
        }
    }

    pub fn next<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor >= self.order.len() {
            let len = self.order.len();
            self.order = sample_distinct(&self.order, len, rng).ok()?;
            self.cursor = 0;
        }
        let index = self.order[self.cursor];
        self.cursor += 1;
        Some(index)
    }
}
