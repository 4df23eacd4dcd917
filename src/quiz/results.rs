use chrono::{DateTime, Local};

use crate::quiz::session::QuizSession;
use crate::recorder::ResultRecorder;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the results log.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Score")]
    pub score: u32,
    #[serde(rename = "Attempted")]
    pub attempted: u32,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Improvement %")]
    pub improvement: f64,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl ResultRecord {
    pub const HEADER: [&'static str; 6] = [
        "Name",
        "Score",
        "Attempted",
        "Accuracy",
        "Improvement %",
        "Timestamp",
    ];
}

/// What the user sees once the time is up.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionOutcome {
    pub record: ResultRecord,
    /// Set when the record could not be saved.
    pub warning: Option<String>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn accuracy(score: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    round2(score as f64 / attempted as f64 * 100.0)
}

/// Relative change against the previous accuracy. A previous accuracy of
/// exactly zero counts as no previous attempt.
pub fn improvement(accuracy: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev != 0.0 => round2((accuracy - prev) / prev * 100.0),
        _ => 0.0,
    }
}

/// Scores a finished session, compares it with the last recorded attempt
/// and appends it to the store. Store failures never prevent the outcome.
pub async fn record_session(
    session: &QuizSession,
    recorder: &dyn ResultRecorder,
    finished_at: DateTime<Local>,
) -> SessionOutcome {
    let accuracy = accuracy(session.score, session.attempted);

    let previous = match recorder.last_accuracy(&session.name).await {
        Ok(previous) => previous,
        Err(err) => {
            log::warn!(
                "Could not look up the last result of {}: {}",
                session.name,
                err
            );
            None
        }
    };

    let record = ResultRecord {
        name: session.name.clone(),
        score: session.score,
        attempted: session.attempted,
        accuracy,
        improvement: improvement(accuracy, previous),
        timestamp: finished_at.format(TIMESTAMP_FORMAT).to_string(),
    };

    let warning = match recorder.append(&record).await {
        Ok(()) => None,
        Err(err) => {
            log::warn!("Could not save the result of {}: {}", record.name, err);
            Some(format!("Your result could not be saved: {}", err))
        }
    };

    SessionOutcome { record, warning }
}
