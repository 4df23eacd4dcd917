use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::quiz::results::ResultRecord;
use crate::recorder::ResultRecorder;

/// In-memory store for tests; can pretend to be offline.
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<ResultRecord>>,
    offline: bool,
}

impl MemoryRecorder {
    pub fn unreachable() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ResultRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "store is offline",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResultRecorder for MemoryRecorder {
    async fn last_accuracy(&self, name: &str) -> Result<Option<f64>> {
        self.check_online()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.name == name)
            .map(|r| r.accuracy))
    }

    async fn append(&self, record: &ResultRecord) -> Result<()> {
        self.check_online()?;
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
