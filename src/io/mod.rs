//! I/O module
//!
//! Handles transaction file parsing and result output.
//!
//! # Components
//!
//! - `haui_format` - Line format handling (record conversion, result serialization)
//! - `sync_reader` - Synchronous reader with iterator interface
//! - `async_reader` - Asynchronous reader with chunked reading interface

pub mod async_reader;
pub mod haui_format;
pub mod sync_reader;

pub use async_reader::{read_batch_file_async, AsyncReader};
pub use haui_format::{convert_raw_transaction, write_results_csv, RawTransaction};
pub use sync_reader::{read_batch_file, SyncReader};
