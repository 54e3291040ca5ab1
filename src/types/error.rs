//! Error types for the HAUI miner
//!
//! This module defines all error types that can occur while loading transaction
//! data, configuring thresholds, and mining. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Input Errors**: Malformed transaction lines, missing utility fields, bad item ids
//! - **Configuration Errors**: Threshold fractions out of range, missing pre-large threshold
//! - **Itemset Errors**: Undecodable itemset keys, unsorted itemsets

use thiserror::Error;

/// Main error type for the HAUI miner
///
/// Every fallible operation in the crate returns this error. Input and
/// configuration errors are fatal: the load or run that produced them is
/// aborted rather than continued with partial data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// A transaction line could not be decoded
    ///
    /// Wraps the underlying record error together with the line it came from.
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A required field of the `items:utility:utilities` line format is absent
    #[error("Missing {field} field")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A token that should be an unsigned integer is not one
    #[error("Invalid {field} value '{token}'")]
    InvalidNumber {
        /// Which field the token belongs to
        field: String,
        /// The offending token
        token: String,
    },

    /// Items and utilities of one transaction are not positionally paired
    #[error("Transaction lists {items} items but {utilities} utilities")]
    UtilityCountMismatch {
        /// Number of item tokens
        items: usize,
        /// Number of utility tokens
        utilities: usize,
    },

    /// Item ids are positive integers
    #[error("Invalid item id {item}: item ids must be positive")]
    InvalidItemId {
        /// The rejected item id
        item: u32,
    },

    /// The same item appears twice in one transaction
    #[error("Item {item} appears more than once in a transaction")]
    DuplicateItem {
        /// The duplicated item id
        item: u32,
    },

    /// A threshold fraction lies outside its admissible range
    #[error("Invalid {name} threshold {value}: expected a fraction in [0, 1]")]
    InvalidThreshold {
        /// Threshold name ("minimal utility" or "pre-large")
        name: String,
        /// The rejected value
        value: f64,
    },

    /// The pre-large fraction must not exceed the minimal utility fraction
    #[error("Pre-large threshold {pre_large} exceeds minimal utility threshold {min_utility}")]
    PreLargeExceedsMinimal {
        /// Configured pre-large fraction
        pre_large: f64,
        /// Configured minimal utility fraction
        min_utility: f64,
    },

    /// Incremental mining over several batches needs a pre-large threshold
    #[error("Incremental mining over {batches} batches requires a pre-large threshold")]
    PreLargeRequired {
        /// Number of batches that were supplied
        batches: usize,
    },

    /// An itemset key could not be decoded back into an itemset
    #[error("Invalid itemset key '{key}': {reason}")]
    InvalidItemsetKey {
        /// The undecodable key
        key: String,
        /// Why decoding failed
        reason: String,
    },

    /// Itemsets must be strictly ascending and non-empty
    #[error("Itemset {items:?} is not a non-empty strictly ascending sequence")]
    UnsortedItemset {
        /// The rejected item sequence
        items: Vec<u32>,
    },

    /// No input files were given
    #[error("No input files given")]
    NoInput,

    /// Failure of the async runtime or of a loading task
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },
}

// Conversion from io::Error to MiningError
impl From<std::io::Error> for MiningError {
    fn from(error: std::io::Error) -> Self {
        MiningError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to MiningError
impl From<csv::Error> for MiningError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        MiningError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl MiningError {
    /// Create a ParseError tied to an input line
    pub fn at_line(line: u64, cause: &MiningError) -> Self {
        MiningError::ParseError {
            line: Some(line),
            message: cause.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str) -> Self {
        MiningError::MissingField {
            field: field.to_string(),
        }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(field: &str, token: &str) -> Self {
        MiningError::InvalidNumber {
            field: field.to_string(),
            token: token.to_string(),
        }
    }

    /// Create an InvalidThreshold error
    pub fn invalid_threshold(name: &str, value: f64) -> Self {
        MiningError::InvalidThreshold {
            name: name.to_string(),
            value,
        }
    }

    /// Create an InvalidItemsetKey error
    pub fn invalid_itemset_key(key: &str, reason: &str) -> Self {
        MiningError::InvalidItemsetKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        MiningError::Runtime {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        MiningError::FileNotFound { path: "db.txt".to_string() },
        "File not found: db.txt"
    )]
    #[case::io_error(
        MiningError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        MiningError::ParseError { line: Some(42), message: "Missing utilities field".to_string() },
        "Parse error at line 42: Missing utilities field"
    )]
    #[case::parse_error_without_line(
        MiningError::ParseError { line: None, message: "bad record".to_string() },
        "Parse error: bad record"
    )]
    #[case::invalid_number(
        MiningError::InvalidNumber { field: "item".to_string(), token: "x1".to_string() },
        "Invalid item value 'x1'"
    )]
    #[case::count_mismatch(
        MiningError::UtilityCountMismatch { items: 3, utilities: 2 },
        "Transaction lists 3 items but 2 utilities"
    )]
    #[case::invalid_item(
        MiningError::InvalidItemId { item: 0 },
        "Invalid item id 0: item ids must be positive"
    )]
    #[case::invalid_threshold(
        MiningError::InvalidThreshold { name: "minimal utility".to_string(), value: 1.5 },
        "Invalid minimal utility threshold 1.5: expected a fraction in [0, 1]"
    )]
    #[case::pre_large_exceeds(
        MiningError::PreLargeExceedsMinimal { pre_large: 0.4, min_utility: 0.3 },
        "Pre-large threshold 0.4 exceeds minimal utility threshold 0.3"
    )]
    #[case::pre_large_required(
        MiningError::PreLargeRequired { batches: 3 },
        "Incremental mining over 3 batches requires a pre-large threshold"
    )]
    #[case::unsorted_itemset(
        MiningError::UnsortedItemset { items: vec![3, 1] },
        "Itemset [3, 1] is not a non-empty strictly ascending sequence"
    )]
    fn test_error_display(#[case] error: MiningError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::missing_field(
        MiningError::missing_field("utilities"),
        MiningError::MissingField { field: "utilities".to_string() }
    )]
    #[case::invalid_threshold(
        MiningError::invalid_threshold("pre-large", -0.1),
        MiningError::InvalidThreshold { name: "pre-large".to_string(), value: -0.1 }
    )]
    #[case::invalid_key(
        MiningError::invalid_itemset_key("1,,2", "empty item"),
        MiningError::InvalidItemsetKey { key: "1,,2".to_string(), reason: "empty item".to_string() }
    )]
    fn test_helper_functions(#[case] result: MiningError, #[case] expected: MiningError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_at_line_wraps_cause() {
        let error = MiningError::at_line(7, &MiningError::DuplicateItem { item: 4 });
        assert_eq!(
            error.to_string(),
            "Parse error at line 7: Item 4 appears more than once in a transaction"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: MiningError = io_error.into();
        assert!(matches!(error, MiningError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
