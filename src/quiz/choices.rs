use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::quiz::angles::{self, ANGLES};
use crate::quiz::QuestionKind;

pub const CHOICE_COUNT: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("only {available} distractors available for {kind:?}, need {needed}")]
    PoolTooSmall {
        kind: QuestionKind,
        available: usize,
        needed: usize,
    },
}

/// Builds the shuffled options for a question: the correct answer plus
/// three distinct distractors of the same sort.
pub fn generate_choices<R: Rng + ?Sized>(
    correct: &str,
    kind: QuestionKind,
    rng: &mut R,
) -> Result<Vec<String>, ChoiceError> {
    let needed = CHOICE_COUNT - 1;
    let pool = distractor_pool(correct, kind);
    if pool.len() < needed {
        return Err(ChoiceError::PoolTooSmall {
            kind,
            available: pool.len(),
            needed,
        });
    }

    // Sampling without replacement from a deduplicated pool, so there is
    // nothing to retry.
    let mut choices = pool.into_iter().choose_multiple(rng, needed);
    choices.push(correct.to_string());
    choices.shuffle(rng);
    Ok(choices)
}

/// Distinct candidates for `kind`, never containing `correct`.
fn distractor_pool(correct: &str, kind: QuestionKind) -> Vec<String> {
    let candidates: Vec<String> = match kind {
        QuestionKind::Sin | QuestionKind::Cos => ANGLES
            .iter()
            .flat_map(|a| [a.sine, a.cosine])
            .map(str::to_string)
            .collect(),
        QuestionKind::Coord => ANGLES.iter().map(|a| a.coordinates()).collect(),
        QuestionKind::DegToRad => ANGLES.iter().map(|a| a.radian.to_string()).collect(),
        QuestionKind::RadToDeg => ANGLES.iter().map(|a| a.degree_label()).collect(),
        QuestionKind::AngleFromSin | QuestionKind::AngleFromCos => {
            // Angles sharing the queried value would be correct as well
            let value_of = |a: &angles::AngleEntry| match kind {
                QuestionKind::AngleFromSin => a.sine,
                _ => a.cosine,
            };
            let queried = angles::find_by_radian(correct).map(value_of);
            ANGLES
                .iter()
                .filter(|a| Some(value_of(*a)) != queried)
                .map(|a| a.radian.to_string())
                .collect()
        }
    };

    let mut pool: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate != correct && !pool.contains(&candidate) {
            pool.push(candidate);
        }
    }
    pool
}
