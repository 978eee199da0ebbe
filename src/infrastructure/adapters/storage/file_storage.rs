//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{AudioStorageError, AudioStoragePort};

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn save_audio(&self, data: &[u8], extension: &str) -> Result<PathBuf, AudioStorageError> {
        let extension = extension.trim_start_matches('.');
        let audio_path = self
            .base_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        fs::write(&audio_path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            path = %audio_path.display(),
            size = data.len(),
            "Saved audio"
        );

        Ok(audio_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_audio() {
        let dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(dir.path()).await.unwrap();

        let path = storage.save_audio(b"test audio data", "mp3").await.unwrap();

        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(fs::read(&path).await.unwrap(), b"test audio data");
    }

    #[tokio::test]
    async fn test_each_save_gets_a_new_file() {
        let dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(dir.path().join("nested/audio")).await.unwrap();

        let first = storage.save_audio(b"a", ".mp3").await.unwrap();
        let second = storage.save_audio(b"b", "mp3").await.unwrap();

        assert_ne!(first, second);
        assert!(storage.base_dir().exists());
    }
}
