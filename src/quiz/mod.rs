pub mod angles;
pub mod choices;
pub mod generator;
pub mod results;
pub mod session;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuestionKind {
    Sin,
    Cos,
    Coord,
    DegToRad,
    RadToDeg,
    AngleFromSin,
    AngleFromCos,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 7] = [
        QuestionKind::Sin,
        QuestionKind::Cos,
        QuestionKind::Coord,
        QuestionKind::DegToRad,
        QuestionKind::RadToDeg,
        QuestionKind::AngleFromSin,
        QuestionKind::AngleFromCos,
    ];

    /// Kinds whose value is shared by several angles, so a typed answer
    /// cannot be matched exactly.
    pub fn is_find_angle(&self) -> bool {
        matches!(self, QuestionKind::AngleFromSin | QuestionKind::AngleFromCos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnswerMode {
    FreeText,
    MultipleChoice,
}

/// The three historical flavours of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Classic,
    Choice,
    Extended,
}

impl Variant {
    pub fn kinds(&self) -> Vec<QuestionKind> {
        match self {
            Variant::Classic | Variant::Choice => {
                vec![QuestionKind::Sin, QuestionKind::Cos, QuestionKind::Coord]
            }
            Variant::Extended => QuestionKind::ALL.to_vec(),
        }
    }

    pub fn answer_mode(&self) -> AnswerMode {
        match self {
            Variant::Classic => AnswerMode::FreeText,
            Variant::Choice | Variant::Extended => AnswerMode::MultipleChoice,
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "choice" => Ok(Variant::Choice),
            "extended" => Ok(Variant::Extended),
            other => Err(format!(
                "unknown quiz variant '{}', expected classic, choice or extended",
                other
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Classic => "classic",
            Variant::Choice => "choice",
            Variant::Extended => "extended",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionItem {
    pub text: String,
    pub answer: String,
    pub kind: QuestionKind,
    /// Options shown to the user in multiple-choice mode.
    pub choices: Option<Vec<String>>,
}

impl QuestionItem {
    pub fn new(text: String, answer: String, kind: QuestionKind) -> Self {
        Self {
            text,
            answer,
            kind,
            choices: None,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim() == self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_matched_exactly_after_trimming() {
        let q = QuestionItem::new("What is sin(π/6)?".into(), "1/2".into(), QuestionKind::Sin);
        assert!(q.is_correct("1/2"));
        assert!(q.is_correct("  1/2\n"));
        assert!(!q.is_correct("0.5"));
        assert!(!q.is_correct("1 / 2"));
    }

    #[test]
    fn variants_parse_and_pick_their_kinds() {
        assert_eq!("Extended".parse::<Variant>().unwrap(), Variant::Extended);
        assert!("trig".parse::<Variant>().is_err());

        assert_eq!(Variant::Classic.answer_mode(), AnswerMode::FreeText);
        assert!(Variant::Classic.kinds().iter().all(|k| !k.is_find_angle()));
        assert_eq!(Variant::Extended.kinds().len(), 7);
    }
}
