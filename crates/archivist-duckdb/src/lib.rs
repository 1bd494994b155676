pub mod archive;
pub mod backend;
pub mod processor;
pub mod schema;

pub use archive::{ArchiveRecord, ARCHIVE_DONE_OK, ARCHIVE_DONE_RECORD, ARCHIVE_DONE_TEMPORARY};
pub use backend::DuckDbBackend;
pub use processor::ArchiveProcessor;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `archivist_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
