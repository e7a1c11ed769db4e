//! Environment/runtime helpers

/// Create the local blob root when the filesystem backend is in use.
pub async fn ensure_blob_root(local_root: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(local_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {local_root}: {e}"))?;
    Ok(())
}
