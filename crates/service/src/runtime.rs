//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binaries only need the service crate.

/// Ensure the directory holding the cart storage file exists.
pub async fn ensure_env(storage_path: &str) -> anyhow::Result<()> {
    common::env::ensure_env(storage_path).await
}
