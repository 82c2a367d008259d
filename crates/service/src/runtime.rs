//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime` without depending directly on `common`.

use std::path::Path;

/// Ensure the directory holding a data file exists.
pub async fn ensure_data_parent<P: AsRef<Path>>(file: P) -> anyhow::Result<()> {
    common::env::ensure_data_parent(file).await
}
