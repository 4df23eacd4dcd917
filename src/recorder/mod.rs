pub mod csv_file;
#[cfg(test)]
pub mod memory;
pub mod sheet;

use async_trait::async_trait;

use crate::error::Result;
use crate::quiz::results::ResultRecord;

pub use csv_file::CsvRecorder;
pub use sheet::SheetRecorder;

/// Append-only log of finished sessions.
#[async_trait]
pub trait ResultRecorder: Send + Sync {
    /// Accuracy of the most recent record for exactly `name`, if any.
    async fn last_accuracy(&self, name: &str) -> Result<Option<f64>>;

    /// Appends `record`, writing the header first if the store is empty.
    async fn append(&self, record: &ResultRecord) -> Result<()>;
}
