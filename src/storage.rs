use crate::error::Result;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Key holding the whole CMS dataset as JSON.
pub const DATASET_KEY: &str = "prime_cms";
/// Key holding the dashboard auth token.
pub const AUTH_KEY: &str = "prime_dashboard_token";

/// Directory-backed string key-value store. One file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Missing keys read as `None`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Readers never see a partially written value. Each write goes through
    /// its own temp file, so concurrent writers of one key do not collide.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        let bytes = value.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| io::Error::new(ErrorKind::Other, e))??;
        debug!("Stored {} bytes under key {}", value.len(), key);
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get(AUTH_KEY).await.unwrap(), None);

        storage.set(AUTH_KEY, "token-1").await.unwrap();
        assert_eq!(storage.get(AUTH_KEY).await.unwrap().as_deref(), Some("token-1"));

        storage.set(AUTH_KEY, "token-2").await.unwrap();
        assert_eq!(storage.get(AUTH_KEY).await.unwrap().as_deref(), Some("token-2"));

        storage.remove(AUTH_KEY).await.unwrap();
        storage.remove(AUTH_KEY).await.unwrap();
        assert_eq!(storage.get(AUTH_KEY).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sets_on_one_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for round in 0..20 {
            let writers: Vec<_> = (0..8)
                .map(|i| {
                    let storage = storage.clone();
                    tokio::spawn(async move {
                        storage.set(AUTH_KEY, &format!("token-{}-{}", round, i)).await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }

            let stored = storage.get(AUTH_KEY).await.unwrap().unwrap();
            assert!(stored.starts_with(&format!("token-{}-", round)), "got {}", stored);
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "only the key file remains: {:?}", leftovers);
    }
}
