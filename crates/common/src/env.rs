//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory holding the cart storage file exists.
///
/// A missing parent is created; a `.env` file that could not be found is only
/// worth a warning since every setting has a default.
pub async fn ensure_env(storage_path: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(".env").await.is_err() {
        warn!("no .env file found; relying on process environment and config.toml");
    }
    if let Some(parent) = Path::new(storage_path).parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        debug!(dir = %parent.display(), "storage directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_storage_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("cart_env_{}", std::process::id()));
        let file = dir.join("nested").join("storage.json");
        ensure_env(file.to_str().unwrap_or_default()).await?;
        assert!(tokio::fs::metadata(dir.join("nested")).await.is_ok());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_dir() -> anyhow::Result<()> {
        ensure_env("storage.json").await
    }
}
