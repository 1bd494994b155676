/// Re-export `Config` from `archivist-core` for use within this crate.
///
/// All environment-variable parsing lives in `archivist-core` so it can be
/// shared with the archivers and integration tests without depending on the
/// full server.
pub use archivist_core::config::Config;
