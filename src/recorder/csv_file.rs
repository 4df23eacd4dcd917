use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::quiz::results::ResultRecord;
use crate::recorder::ResultRecorder;

/// Results kept in a local CSV file.
pub struct CsvRecorder {
    path: PathBuf,
    // Several chats may finish at the same moment, readers wait for
    // a row to be written in full
    write_lock: Mutex<()>,
}

#[derive(Debug, serde::Deserialize)]
struct StoredRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Accuracy")]
    accuracy: f64,
}

impl CsvRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultRecorder for CsvRecorder {
    async fn last_accuracy(&self, name: &str) -> Result<Option<f64>> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut last = None;
        for row in reader.deserialize() {
            let row: StoredRow = row?;
            if row.name == name {
                last = Some(row.accuracy);
            }
        }
        Ok(last)
    }

    async fn append(&self, record: &ResultRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        log::debug!("Appended result of {} to {}", record.name, self.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    fn record(name: &str, score: u32, attempted: u32, accuracy: f64) -> ResultRecord {
        ResultRecord {
            name: name.to_string(),
            score,
            attempted,
            accuracy,
            improvement: 0.0,
            timestamp: "2024-01-02 03:04:05".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_file_means_no_previous_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CsvRecorder::new(dir.path().join("results.csv"));

        assert_eq!(recorder.last_accuracy("Alex").await.unwrap(), None);
    }

    #[tokio::test]
    async fn header_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CsvRecorder::new(dir.path().join("results.csv"));

        recorder.append(&record("Alex", 15, 20, 75.0)).await.unwrap();
        recorder.append(&record("Sam", 2, 3, 66.67)).await.unwrap();

        let contents = fs::read_to_string(recorder.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Name,Score,Attempted,Accuracy,Improvement %,Timestamp",
                "Alex,15,20,75.0,0.0,2024-01-02 03:04:05",
                "Sam,2,3,66.67,0.0,2024-01-02 03:04:05",
            ]
        );
    }

    #[tokio::test]
    async fn last_matching_row_wins() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = CsvRecorder::new(dir.path().join("results.csv"));

        recorder.append(&record("Alex", 15, 20, 75.0)).await.unwrap();
        recorder.append(&record("Alexander", 1, 1, 100.0)).await.unwrap();
        recorder.append(&record("Alex", 9, 10, 90.0)).await.unwrap();
        recorder.append(&record("Sam", 0, 4, 0.0)).await.unwrap();

        assert_eq!(recorder.last_accuracy("Alex").await.unwrap(), Some(90.0));
        assert_eq!(recorder.last_accuracy("Sam").await.unwrap(), Some(0.0));
        assert_eq!(recorder.last_accuracy("alex").await.unwrap(), None);
    }

    #[tokio::test]
    async fn reads_files_written_by_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(
            &path,
            "Name,Score,Attempted,Accuracy,Improvement %,Timestamp\n\
             Alex,3,4,75,0.0,2023-09-01 10:00:00\n",
        )
        .unwrap();
        let recorder = CsvRecorder::new(&path);

        assert_eq!(recorder.last_accuracy("Alex").await.unwrap(), Some(75.0));

        recorder.append(&record("Alex", 4, 4, 100.0)).await.unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Name,Score").count(), 1);
        assert_eq!(recorder.last_accuracy("Alex").await.unwrap(), Some(100.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn lookups_never_see_a_partial_row() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(CsvRecorder::new(dir.path().join("results.csv")));

        let mut tasks = Vec::new();
        for i in 0..4 {
            let recorder = Arc::clone(&recorder);
            tasks.push(tokio::spawn(async move {
                let name = format!("Player {}", i);
                for _ in 0..50 {
                    recorder.append(&record(&name, 2, 4, 50.0)).await.unwrap();
                    let last = recorder.last_accuracy("Alex").await.unwrap();
                    assert!(last.is_none() || last == Some(75.0));
                }
            }));
        }
        for _ in 0..50 {
            recorder.append(&record("Alex", 3, 4, 75.0)).await.unwrap();
            assert_eq!(recorder.last_accuracy("Alex").await.unwrap(), Some(75.0));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let contents = fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(contents.lines().count(), 1 + 4 * 50 + 50);
        assert_eq!(recorder.last_accuracy("Player 3").await.unwrap(), Some(50.0));
    }
}
