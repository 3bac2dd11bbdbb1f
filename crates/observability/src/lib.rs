//! Tracing/logging setup shared by boardlens binaries.

pub mod subscriber;

pub use subscriber::{LogConfig, LogFormat, init_with};

/// Initialize process-wide logging with defaults (JSON lines, `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let _ = init_with(&LogConfig::default());
}
