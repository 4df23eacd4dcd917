use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::angles::{self, AngleEntry};
use crate::quiz::choices::{self, ChoiceError};
use crate::quiz::{AnswerMode, QuestionItem, QuestionKind, Variant};

/// Produces random unit-circle questions from a fixed set of kinds.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    kinds: Vec<QuestionKind>,
    mode: AnswerMode,
}

impl QuestionGenerator {
    /// Find-angle kinds are dropped in free-text mode, several angles
    /// would be right.
    pub fn new(kinds: Vec<QuestionKind>, mode: AnswerMode) -> Self {
        let kinds = match mode {
            AnswerMode::FreeText => kinds.into_iter().filter(|k| !k.is_find_angle()).collect(),
            AnswerMode::MultipleChoice => kinds,
        };
        Self { kinds, mode }
    }

    pub fn for_variant(variant: Variant) -> Self {
        Self::new(variant.kinds(), variant.answer_mode())
    }

    pub fn kinds(&self) -> &[QuestionKind] {
        &self.kinds
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<QuestionItem, ChoiceError> {
        let angle = angles::random_angle(rng);
        let kind = self.kinds.choose(rng).copied().unwrap_or(QuestionKind::Sin);
        let question = build_question(angle, kind);

        match self.mode {
            AnswerMode::FreeText => Ok(question),
            AnswerMode::MultipleChoice => {
                let options = choices::generate_choices(&question.answer, kind, rng)?;
                Ok(question.with_choices(options))
            }
        }
    }

    pub fn batch<R: Rng + ?Sized>(
        &self,
        amount: usize,
        rng: &mut R,
    ) -> Result<Vec<QuestionItem>, ChoiceError> {
        (0..amount).map(|_| self.generate(rng)).collect()
    }
}

fn build_question(angle: &AngleEntry, kind: QuestionKind) -> QuestionItem {
    let (text, answer) = match kind {
        QuestionKind::Sin => (format!("What is sin({})?", angle.radian), angle.sine.to_string()),
        QuestionKind::Cos => (
            format!("What is cos({})?", angle.radian),
            angle.cosine.to_string(),
        ),
        QuestionKind::Coord => (
            format!("What are the coordinates at {}?", angle.radian),
            angle.coordinates(),
        ),
        QuestionKind::DegToRad => (
            format!("Convert {} to radians.", angle.degree_label()),
            angle.radian.to_string(),
        ),
        QuestionKind::RadToDeg => (
            format!("Convert {} to degrees.", angle.radian),
            angle.degree_label(),
        ),
        QuestionKind::AngleFromSin => (
            format!("Which angle has sin = {}?", angle.sine),
            angle.radian.to_string(),
        ),
        QuestionKind::AngleFromCos => (
            format!("Which angle has cos = {}?", angle.cosine),
            angle.radian.to_string(),
        ),
    };
    QuestionItem::new(text, answer, kind)
}
