//! Environment/runtime helpers
//!
//! Sanity checks on the directories the forms read their choices from.

use tracing::warn;

/// Warn about missing choice directories; create the data directory.
///
/// Missing feature or template directories are not fatal: the forms simply
/// offer no features and only the `None` template.
pub async fn ensure_env(features_dir: &str, templates_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(features_dir).await.is_err() {
        warn!(%features_dir, "features directory not found; no features will be offered");
    }
    if tokio::fs::metadata(templates_dir).await.is_err() {
        warn!(%templates_dir, "templates directory not found; only the None template will be offered");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
