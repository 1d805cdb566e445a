use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Read-only view of where archived CSV files land.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn exists(&self, path: &Path) -> io::Result<bool>;
}

/// Archive store backed by the local filesystem
#[derive(Debug, Clone, Default)]
pub struct LocalArchiveStore;

impl LocalArchiveStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArchiveStore for LocalArchiveStore {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        // Directories are not archives.
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_detects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("monthly_2025-02.csv");
        std::fs::write(&file, "meter_id,reading\n").unwrap();

        let store = LocalArchiveStore::new();
        assert!(store.exists(&file).await.unwrap());
        assert!(!store
            .exists(&dir.path().join("monthly_2025-01.csv"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_local_store_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("monthly_2025-02.csv");
        std::fs::create_dir(&nested).unwrap();

        assert!(!LocalArchiveStore::new().exists(&nested).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_parent_directory_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Archive").join("monthly_2025-02.csv");

        assert!(!LocalArchiveStore::new().exists(&path).await.unwrap());
    }
}
