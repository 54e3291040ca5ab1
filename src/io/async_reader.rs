//! Asynchronous transaction reader with batch interface
//!
//! Provides a streaming interface over the transaction lines of one batch
//! file, for loading several files concurrently.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming parsing of the `:`-separated format
//! - tokio (through the tokio-util compat layer) for file access
//! - Chunked reading so one call never buffers more than `chunk_size` records
//!
//! # Architecture
//!
//! ```text
//! tokio File → compat → AsyncReader → chunks of TransactionRecords
//!                           ↓
//!                    haui_format module
//!           (RawTransaction, convert_raw_transaction)
//! ```

use crate::io::haui_format::{convert_raw_transaction, RawTransaction, FIELD_DELIMITER};
use crate::types::{MiningError, TransactionRecord};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::io::ErrorKind;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

/// Number of records read per chunk when loading a whole file
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Asynchronous transaction reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .quoting(false)
            .trim(csv_async::Trim::All)
            .flexible(true)
            .create_reader(reader);

        Self { csv_reader }
    }

    /// Read a chunk of transaction records
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Maximum number of records to read
    ///
    /// # Returns
    ///
    /// Up to `chunk_size` records; an empty vector at end of input.
    ///
    /// # Errors
    ///
    /// Returns the first line that fails to parse or convert, with its line
    /// number.
    pub async fn read_batch(
        &mut self,
        chunk_size: usize,
    ) -> Result<Vec<TransactionRecord>, MiningError> {
        let mut batch = Vec::with_capacity(chunk_size.min(DEFAULT_CHUNK_SIZE));
        let mut rows = self.csv_reader.records();

        while batch.len() < chunk_size {
            match rows.next().await {
                Some(Ok(row)) => batch.push(convert_row(&row)?),
                Some(Err(e)) => {
                    return Err(MiningError::ParseError {
                        line: None,
                        message: e.to_string(),
                    })
                }
                None => break,
            }
        }

        Ok(batch)
    }
}

fn convert_row(row: &StringRecord) -> Result<TransactionRecord, MiningError> {
    let line = row.position().map_or(0, |position| position.line());
    row.deserialize::<RawTransaction>(None)
        .map_err(|e| MiningError::ParseError {
            line: Some(line),
            message: e.to_string(),
        })
        .and_then(|raw| convert_raw_transaction(raw).map_err(|e| MiningError::at_line(line, &e)))
}

/// Load a whole batch file asynchronously
///
/// # Errors
///
/// Returns `FileNotFound` for a missing path, `IoError` for other open
/// failures, and the first line error otherwise.
pub async fn read_batch_file_async(path: &Path) -> Result<Vec<TransactionRecord>, MiningError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => MiningError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => MiningError::from(e),
    })?;

    let mut reader = AsyncReader::new(file.compat());
    let mut records = Vec::new();
    loop {
        let chunk = reader.read_batch(DEFAULT_CHUNK_SIZE).await?;
        if chunk.is_empty() {
            break;
        }
        records.extend(chunk);
    }

    debug!(path = %path.display(), transactions = records.len(), "Batch file loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let content = "1 2:8:5 3\n1 3:8:2 6\n2 3:5:4 1\n";
        let mut reader = AsyncReader::new(Cursor::new(content.as_bytes()));

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].transaction_utility(), 8);
        assert_eq!(batch[1].items()[1].utility, 6);

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].max_item_utility(), 4);

        assert!(reader.read_batch(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_input() {
        let mut reader = AsyncReader::new(Cursor::new("".as_bytes()));
        assert!(reader.read_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_reports_line_of_invalid_record() {
        let content = "1:1:1\n2 x:3:1 2\n";
        let mut reader = AsyncReader::new(Cursor::new(content.as_bytes()));

        let error = reader.read_batch(10).await.unwrap_err();

        assert!(matches!(error, MiningError::ParseError { line: Some(2), .. }));
        assert!(error.to_string().contains("Invalid item value 'x'"));
    }

    #[tokio::test]
    async fn test_read_batch_file_async_loads_everything() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"1 2:8:5 3\n1 3::2 6\n").unwrap();
        file.flush().unwrap();

        let records = read_batch_file_async(file.path()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].transaction_utility(), 8);
    }

    #[tokio::test]
    async fn test_read_batch_file_async_missing_file() {
        let result = read_batch_file_async(Path::new("nonexistent.txt")).await;
        assert!(matches!(result, Err(MiningError::FileNotFound { .. })));
    }
}
