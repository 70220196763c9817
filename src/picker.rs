use rand::Rng;
use std::fmt;

use crate::api::types::{Difficulty, FavoriteQuestionList, Question, QuestionStatus};
use crate::storage::SolvedSet;

/// What a pick run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// The snapshot holds no questions at all.
    Empty,
    AllDone,
    Picked {
        eligible: usize,
        total: usize,
        slugs: Vec<String>,
    },
}

impl fmt::Display for PickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickOutcome::Empty => write!(f, "No questions found in the JSON file"),
            PickOutcome::AllDone => write!(f, "All questions have been solved! 🎉"),
            PickOutcome::Picked {
                eligible,
                total,
                slugs,
            } => {
                writeln!(
                    f,
                    "Found {eligible} unsolved questions out of {total} total questions"
                )?;
                writeln!(f)?;
                writeln!(f, "Random {} unsolved titleSlugs:", slugs.len())?;
                for (i, slug) in slugs.iter().enumerate() {
                    writeln!(f, "{}. {}", i + 1, slug)?;
                }
                Ok(())
            }
        }
    }
}

/// Slugs worth working on: not solved on the site, not easy, and not in the
/// local solved list. Snapshot order is kept.
pub fn eligible_slugs(questions: &[Question], solved: &SolvedSet) -> Vec<String> {
    questions
        .iter()
        .filter(|q| q.status != Some(QuestionStatus::Solved))
        .filter(|q| q.difficulty != Difficulty::Easy)
        .filter(|q| !solved.contains(&q.title_slug))
        .map(|q| q.title_slug.clone())
        .collect()
}

/// Two or three, but never more than are available.
pub fn pick_count<R: Rng + ?Sized>(rng: &mut R, available: usize) -> usize {
    rng.random_range(2..=3).min(available)
}

/// Draws `k` distinct items uniformly. `items` itself is left untouched;
/// draws come out of a shrinking working copy.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    items: &[String],
    k: usize,
) -> Vec<String> {
    let mut pool = items.to_vec();
    let mut picked = Vec::with_capacity(k.min(pool.len()));
    while picked.len() < k && !pool.is_empty() {
        let idx = rng.random_range(0..pool.len());
        picked.push(pool.swap_remove(idx));
    }
    picked
}

pub fn pick<R: Rng + ?Sized>(
    rng: &mut R,
    snapshot: &FavoriteQuestionList,
    solved: &SolvedSet,
) -> PickOutcome {
    if snapshot.questions.is_empty() {
        return PickOutcome::Empty;
    }

    let eligible = eligible_slugs(&snapshot.questions, solved);
    if eligible.is_empty() {
        return PickOutcome::AllDone;
    }

    let k = pick_count(rng, eligible.len());
    PickOutcome::Picked {
        eligible: eligible.len(),
        total: snapshot.questions.len(),
        slugs: sample_without_replacement(rng, &eligible, k),
    }
}
