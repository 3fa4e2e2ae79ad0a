use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;

use crate::domain::ports::FileStore;

/// Stores uploads under a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDiskFileStore {
    root: PathBuf,
}

impl LocalDiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative_path: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(relative_path);
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("refusing path outside uploads root: {relative_path}");
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStore for LocalDiskFileStore {
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let path = self.resolve(relative_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write {}", path.display()))
    }

    async fn remove(&self, relative_path: &str) -> anyhow::Result<bool> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}
