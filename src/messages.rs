use crate::quiz::results::SessionOutcome;
use crate::quiz::session::QuizSession;

pub const GREETING_TEXT: &str =
    "Hi! This is the 1-minute unit circle challenge. Enter your name to begin:";
pub const START_QUIZ: &str = "Start quiz";
pub const RESTART: &str = "Restart";

pub fn ready_text(name: &str, duration_secs: i64) -> String {
    format!(
        "Nice to meet you, {}! You will have {} seconds to answer as many questions as you can.\nPress \"{}\" when you are ready.",
        name, duration_secs, START_QUIZ
    )
}

pub fn question_text(session: &QuizSession, remaining_secs: i64) -> String {
    let prompt = session
        .current_question()
        .map(|q| q.text.as_str())
        .unwrap_or_default();
    format!(
        "🕒 Time left: {} seconds\n\nQ{}: {}",
        remaining_secs,
        session.current + 1,
        prompt
    )
}

pub fn feedback_text(correct: bool, answer: &str) -> String {
    if correct {
        "✅ Correct!".to_string()
    } else {
        format!("❌ Not quite, it was {}", answer)
    }
}

pub fn results_text(outcome: &SessionOutcome) -> String {
    let record = &outcome.record;
    let mut text = format!(
        "⏰ Time's up! {}, you scored {} out of {}. Accuracy: {}%\nChange from last attempt: {}%",
        record.name,
        record.score,
        record.attempted,
        percent(record.accuracy),
        percent(record.improvement)
    );
    if let Some(warning) = &outcome.warning {
        text.push_str("\n\n⚠️ ");
        text.push_str(warning);
    }
    text
}

/// Two decimals at most, without trailing zeros: 75, 66.67, -12.5.
pub fn percent(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Options laid out two per row.
pub fn choice_rows(choices: &[String]) -> Vec<Vec<String>> {
    choices.chunks(2).map(|row| row.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::results::ResultRecord;

    fn outcome(accuracy: f64, improvement: f64, warning: Option<&str>) -> SessionOutcome {
        SessionOutcome {
            record: ResultRecord {
                name: "Alex".into(),
                score: 15,
                attempted: 20,
                accuracy,
                improvement,
                timestamp: "2024-01-01 00:00:00".into(),
            },
            warning: warning.map(str::to_string),
        }
    }

    #[test]
    fn percentages_drop_trailing_zeros() {
        assert_eq!(percent(75.0), "75");
        assert_eq!(percent(66.67), "66.67");
        assert_eq!(percent(-12.5), "-12.5");
        assert_eq!(percent(0.0), "0");
        assert_eq!(percent(100.0), "100");
    }

    #[test]
    fn results_show_score_and_change() {
        let text = results_text(&outcome(75.0, 0.0, None));
        assert_eq!(
            text,
            "⏰ Time's up! Alex, you scored 15 out of 20. Accuracy: 75%\nChange from last attempt: 0%"
        );
    }

    #[test]
    fn results_mention_a_failed_save() {
        let text = results_text(&outcome(90.0, 20.0, Some("Your result could not be saved")));
        assert!(text.contains("Change from last attempt: 20%"));
        assert!(text.ends_with("⚠️ Your result could not be saved"));
    }

    #[test]
    fn choices_are_laid_out_in_pairs() {
        let choices: Vec<String> = ["0", "1", "1/2", "√3/2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            choice_rows(&choices),
            vec![
                vec!["0".to_string(), "1".to_string()],
                vec!["1/2".to_string(), "√3/2".to_string()]
            ]
        );
    }
}
