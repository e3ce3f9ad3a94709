//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use configs::ImagingConfig;

/// Check the imaging directories and make sure `data_dir` exists.
pub async fn ensure_env(imaging: &ImagingConfig, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(&imaging.features_dir, &imaging.templates_dir, data_dir).await
}
