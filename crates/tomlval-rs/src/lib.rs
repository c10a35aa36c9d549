//! Public SDK surface for tomlval.
//!
//! This crate re-exports the validation engine and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use tomlval_rs_core as core;
pub use tomlval_rs_core::*;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Log levels come from
/// `RUST_LOG`.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
