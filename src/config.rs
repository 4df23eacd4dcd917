use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::quiz::session::QuizSettings;
use crate::quiz::Variant;
use crate::recorder::{sheet, CsvRecorder, ResultRecorder, SheetRecorder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Csv {
        path: PathBuf,
    },
    Sheet {
        api_base: String,
        spreadsheet_id: String,
        sheet_name: String,
        access_token: String,
    },
}

impl StoreConfig {
    /// Where results go, without credentials.
    pub fn describe(&self) -> String {
        match self {
            StoreConfig::Csv { path } => format!("csv file {}", path.display()),
            StoreConfig::Sheet {
                spreadsheet_id,
                sheet_name,
                ..
            } => format!("spreadsheet {} ({})", spreadsheet_id, sheet_name),
        }
    }

    pub fn build(&self) -> Arc<dyn ResultRecorder> {
        match self {
            StoreConfig::Csv { path } => Arc::new(CsvRecorder::new(path.clone())),
            StoreConfig::Sheet {
                api_base,
                spreadsheet_id,
                sheet_name,
                access_token,
            } => Arc::new(SheetRecorder::new(
                api_base.clone(),
                spreadsheet_id.clone(),
                sheet_name.clone(),
                access_token.clone(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dialogue_db: String,
    pub variant: Variant,
    pub store: StoreConfig,
    pub quiz: QuizSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `from_env` uses the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::Config(format!("Missing environment variable: {}", key)))
        };

        let variant = match get("QUIZ_VARIANT") {
            Some(raw) => raw.parse::<Variant>().map_err(Error::Config)?,
            None => Variant::Classic,
        };

        let store = match get("RESULT_STORE").as_deref().map(str::trim) {
            None | Some("csv") => StoreConfig::Csv {
                path: get("RESULTS_PATH")
                    .unwrap_or_else(|| "results.csv".to_string())
                    .into(),
            },
            Some("sheet") => StoreConfig::Sheet {
                api_base: get("SHEETS_API_BASE")
                    .unwrap_or_else(|| sheet::DEFAULT_API_BASE.to_string()),
                spreadsheet_id: require("SHEET_ID")?,
                sheet_name: get("SHEET_NAME").unwrap_or_else(|| "Sheet1".to_string()),
                access_token: require("SHEET_ACCESS_TOKEN")?,
            },
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for RESULT_STORE: {} (expected csv or sheet)",
                    other
                )))
            }
        };

        let defaults = QuizSettings::default();
        let quiz = QuizSettings {
            duration_secs: parse_or(&get, "QUIZ_DURATION_SECS", defaults.duration_secs)?,
            initial_batch: parse_or(&get, "QUIZ_INITIAL_BATCH", defaults.initial_batch)?,
            extend_batch: parse_or(&get, "QUIZ_EXTEND_BATCH", defaults.extend_batch)?,
        };
        if quiz.duration_secs <= 0 {
            return Err(Error::Config(
                "QUIZ_DURATION_SECS must be positive".to_string(),
            ));
        }
        if quiz.initial_batch == 0 || quiz.extend_batch == 0 {
            return Err(Error::Config(
                "Question batch sizes must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            dialogue_db: get("DIALOGUE_DB").unwrap_or_else(|| "db.sqlite".to_string()),
            variant,
            store,
            quiz,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", key, e))),
    }
}
