use async_trait::async_trait;

/// Durable storage for uploaded files, addressed by a path relative to the
/// uploads root (e.g. `profile-images/1700000000000-42.png`).
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> anyhow::Result<()>;
    /// Returns false when there was nothing to remove.
    async fn remove(&self, relative_path: &str) -> anyhow::Result<bool>;
}
