//! JSON Profile Store - 单文件语音档案库
//!
//! 文件格式: `{ "version": 1, "profiles": [ ... ] }`，按插入顺序排列
//!
//! 写入流程: 序列化到同目录临时文件 → fsync → 原子 rename → 替换内存快照。
//! 写入失败时内存快照保持不变

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use crate::application::ports::{ProfileStorePort, StoreError};
use crate::domain::profile::VoiceProfile;

const FORMAT_VERSION: u32 = 1;

/// 磁盘上的文件结构
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    version: u32,
    #[serde(default)]
    profiles: Vec<VoiceProfile>,
}

/// JSON 文件档案库
pub struct JsonProfileStore {
    path: PathBuf,
    /// 读操作只拿快照，不等待写入
    snapshot: RwLock<Arc<Vec<VoiceProfile>>>,
    /// 串行化所有写操作
    write_lock: Mutex<()>,
}

impl JsonProfileStore {
    /// 打开档案库，文件不存在时视为空库
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::IoError(format!("{}: {}", parent.display(), e)))?;
        }

        let profiles = match fs::read(&path).await {
            Ok(bytes) => Self::decode(&path, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::IoError(format!("{}: {}", path.display(), e))),
        };

        tracing::info!(
            path = %path.display(),
            profiles = profiles.len(),
            "Voice profile store opened"
        );

        Ok(Self {
            path,
            snapshot: RwLock::new(Arc::new(profiles)),
            write_lock: Mutex::new(()),
        })
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<Vec<VoiceProfile>, StoreError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let file: ProfileFile = serde_json::from_slice(bytes).map_err(|e| {
            StoreError::SerializationError(format!("{}: {}", path.display(), e))
        })?;

        if file.version != FORMAT_VERSION {
            return Err(StoreError::SerializationError(format!(
                "{}: unsupported profile file version {}",
                path.display(),
                file.version
            )));
        }

        let mut profiles: Vec<VoiceProfile> = Vec::with_capacity(file.profiles.len());
        for profile in file.profiles {
            profile.validate()?;
            if let Some(existing) = profiles.iter_mut().find(|p| p.name() == profile.name()) {
                tracing::warn!(
                    name = %profile.name(),
                    "Duplicate profile in store file, keeping the last one"
                );
                *existing = profile;
            } else {
                profiles.push(profile);
            }
        }

        Ok(profiles)
    }

    async fn current(&self) -> Arc<Vec<VoiceProfile>> {
        self.snapshot.read().await.clone()
    }

    /// 把完整档案列表写入磁盘
    async fn persist(&self, profiles: &[VoiceProfile]) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct ProfileFileRef<'a> {
            version: u32,
            profiles: &'a [VoiceProfile],
        }

        let bytes = serde_json::to_vec_pretty(&ProfileFileRef {
            version: FORMAT_VERSION,
            profiles,
        })
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let io_err =
            |e: std::io::Error| StoreError::IoError(format!("{}: {}", tmp_path.display(), e));

        let mut file = fs::File::create(&tmp_path).await.map_err(io_err)?;
        file.write_all(&bytes).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::IoError(format!("{}: {}", self.path.display(), e)));
        }

        Ok(())
    }

    /// 持久化成功后才替换快照
    async fn commit(&self, profiles: Vec<VoiceProfile>) -> Result<(), StoreError> {
        self.persist(&profiles).await?;
        *self.snapshot.write().await = Arc::new(profiles);
        Ok(())
    }
}

#[async_trait]
impl ProfileStorePort for JsonProfileStore {
    async fn save(&self, profile: VoiceProfile) -> Result<VoiceProfile, StoreError> {
        profile.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut profiles = self.current().await.as_ref().clone();

        let saved = match profiles.iter().position(|p| p.name() == profile.name()) {
            Some(index) => {
                let saved = profile.replacing(&profiles[index]);
                profiles[index] = saved.clone();
                saved
            }
            None => {
                profiles.push(profile.clone());
                profile
            }
        };

        self.commit(profiles).await?;

        tracing::debug!(
            name = %saved.name(),
            voice_id = %saved.voice_id(),
            "Voice profile persisted"
        );
        Ok(saved)
    }

    async fn get(&self, name: &str) -> Result<VoiceProfile, StoreError> {
        self.current()
            .await
            .iter()
            .find(|p| p.name().as_str() == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list(&self) -> Result<Vec<VoiceProfile>, StoreError> {
        Ok(self.current().await.as_ref().clone())
    }

    async fn delete(&self, name: &str) -> Result<VoiceProfile, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.current().await.as_ref().clone();

        let index = profiles
            .iter()
            .position(|p| p.name().as_str() == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let removed = profiles.remove(index);

        self.commit(profiles).await?;

        tracing::debug!(name = %name, "Voice profile removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{ProfileName, VoiceSettings};
    use tempfile::tempdir;

    fn profile(name: &str, voice_id: &str, stability: f32, similarity: f32) -> VoiceProfile {
        VoiceProfile::new_unchecked(
            ProfileName::new(name).unwrap(),
            voice_id,
            VoiceSettings::new(stability, similarity),
        )
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("data/profiles.json"))
            .await
            .unwrap();

        assert!(store.list().await.unwrap().is_empty());
        assert!(dir.path().join("data").is_dir());
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();

        store.save(profile("helpful-assistant", "21m00", 0.7, 0.8)).await.unwrap();

        let loaded = store.get("helpful-assistant").await.unwrap();
        assert_eq!(loaded.voice_id(), "21m00");
        assert_eq!(loaded.settings(), &VoiceSettings::new(0.7, 0.8));
    }

    #[tokio::test]
    async fn test_invalid_profile_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let store = JsonProfileStore::open(&path).await.unwrap();
        store.save(profile("calm", "v1", 0.5, 0.5)).await.unwrap();
        let before = fs::read(&path).await.unwrap();

        let err = store.save(profile("loud", "v2", 1.5, 0.5)).await.unwrap_err();

        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(fs::read(&path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();

        let err = store.delete("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_removes_profile() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();
        store.save(profile("a", "v1", 0.5, 0.5)).await.unwrap();

        let removed = store.delete("a").await.unwrap();

        assert_eq!(removed.name().as_str(), "a");
        assert!(matches!(store.get("a").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_position_and_created_at() {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();
        let first = store.save(profile("a", "v1", 0.5, 0.5)).await.unwrap();
        store.save(profile("b", "v2", 0.5, 0.5)).await.unwrap();

        let updated = store.save(profile("a", "v3", 0.9, 0.1)).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(updated.voice_id(), "v3");
        assert_eq!(updated.created_at(), first.created_at());
    }

    #[tokio::test]
    async fn test_profiles_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        {
            let store = JsonProfileStore::open(&path).await.unwrap();
            store.save(profile("narrator", "v9", 0.3, 0.6)).await.unwrap();
            store.save(profile("butler", "v1", 0.5, 0.5)).await.unwrap();
        }

        let reopened = JsonProfileStore::open(&path).await.unwrap();
        let profiles = reopened.list().await.unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name().as_str(), "narrator");
        assert_eq!(profiles[0].settings(), &VoiceSettings::new(0.3, 0.6));

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert!(!dir.path().join("profiles.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_to_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, b"{ not json").await.unwrap();

        let err = JsonProfileStore::open(&path).await.err().unwrap();
        assert!(matches!(err, StoreError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_concurrent_saves_of_same_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let store = Arc::new(JsonProfileStore::open(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save(profile("shared", &format!("voice-{}", i), 0.5, 0.5))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 1);

        let reopened = JsonProfileStore::open(&path).await.unwrap();
        let profiles = reopened.list().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0], store.get("shared").await.unwrap());
    }
}
