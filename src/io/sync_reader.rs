//! Synchronous transaction reader with iterator interface
//!
//! Provides a streaming iterator over transaction records of one batch file.
//! Delegates line format concerns to the haui_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader configured for the `:`-separated line
//! format (no header row, no quoting, rows of varying width). Each row is
//! deserialized into a RawTransaction and converted on the fly, so only one
//! line is held in memory at a time.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Line errors are yielded as Err variants carrying the 1-based line number
//! - [`read_batch_file`] stops at the first line error: a batch is loaded
//!   completely or not at all

use crate::io::haui_format::{convert_raw_transaction, RawTransaction, FIELD_DELIMITER};
use crate::types::{MiningError, TransactionRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Synchronous transaction reader
///
/// # Examples
///
/// ```no_run
/// use haui_miner::io::sync_reader::SyncReader;
/// use std::path::Path;
///
/// let reader = SyncReader::new(Path::new("db1.txt")).unwrap();
/// let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
/// println!("Loaded {} transactions", records.len());
/// ```
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    row: StringRecord,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` when the path does not exist and `IoError` for
    /// any other failure to open it.
    pub fn new(path: &Path) -> Result<Self, MiningError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MiningError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => MiningError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .quoting(false)
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            row: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransactionRecord, MiningError>;

    /// Get the next transaction record
    ///
    /// # Returns
    ///
    /// * `Some(Ok(TransactionRecord))` - Successfully parsed line
    /// * `Some(Err(MiningError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.row.position().map_or(0, |position| position.line());
                let converted = self
                    .row
                    .deserialize::<RawTransaction>(None)
                    .map_err(MiningError::from)
                    .and_then(convert_raw_transaction)
                    .map_err(|e| MiningError::at_line(line, &e));
                Some(converted)
            }
            Err(e) => Some(Err(MiningError::from(e))),
        }
    }
}

/// Load a whole batch file
///
/// # Errors
///
/// Returns the first error met: opening the file or decoding any line.
pub fn read_batch_file(path: &Path) -> Result<Vec<TransactionRecord>, MiningError> {
    let records = SyncReader::new(path)?.collect::<Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), transactions = records.len(), "Batch file loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary batch file for testing
    fn create_temp_batch(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.txt"));
        assert!(matches!(result, Err(MiningError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_reader_iterates_records() {
        let file = create_temp_batch("1 2:8:5 3\n1 3:8:2 6\n2 3:5:4 1\n");

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].transaction_utility(), 8);
        assert_eq!(records[1].items()[1].item, 3);
        assert_eq!(records[2].max_item_utility(), 4);
    }

    #[test]
    fn test_sync_reader_computes_empty_transaction_utility() {
        let file = create_temp_batch("4 2::1 9\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.transaction_utility(), 10);
        assert_eq!(record.items()[0].item, 2);
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_batch("1 2:8:5 3\n1 2:8:5\n3:1:1\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());
        let error = records[1].as_ref().unwrap_err();
        assert!(matches!(error, MiningError::ParseError { line: Some(2), .. }));
        assert!(error.to_string().contains("2 items but 1 utilities"));
    }

    #[test]
    fn test_sync_reader_missing_utility_field() {
        let file = create_temp_batch("1 2:8\n");

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        let error = records[0].as_ref().unwrap_err();
        assert!(error.to_string().contains("Missing utilities field"));
    }

    #[test]
    fn test_read_batch_file_fails_on_first_bad_line() {
        let file = create_temp_batch("1:1:1\n0:1:1\n2:2:2\n");

        let result = read_batch_file(file.path());

        assert_eq!(
            result.unwrap_err().to_string(),
            "Parse error at line 2: Invalid item id 0: item ids must be positive"
        );
    }

    #[test]
    fn test_read_batch_file_empty_file() {
        let file = create_temp_batch("");
        assert!(read_batch_file(file.path()).unwrap().is_empty());
    }
}
