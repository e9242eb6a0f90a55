// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::domain::models::professor::ScrapeResult;
use crate::domain::repositories::storage_repository::{ResultStore, StorageError};

/// 本地 JSON 文件存储实现
///
/// 先写入同目录下的临时文件再原子重命名，失败时不会留下部分内容
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // 确保目录存在
    std::fs::create_dir_all(&parent)?;

    let mut file = NamedTempFile::new_in(&parent)?;
    file.write_all(data)?;
    file.flush()?;
    file.as_file().set_permissions(target_permissions(path, file.as_file())?)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| StorageError::Io(e.error))?;

    Ok(())
}

/// 覆盖时沿用目标文件的权限，新文件为 0644
fn target_permissions(path: &Path, temp: &std::fs::File) -> Result<Permissions, StorageError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.permissions()),
        Ok(_) => Ok(default_permissions(temp)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default_permissions(temp)?),
        Err(e) => Err(StorageError::Io(e)),
    }
}

#[cfg(unix)]
fn default_permissions(_temp: &std::fs::File) -> std::io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(temp: &std::fs::File) -> std::io::Result<Permissions> {
    Ok(temp.metadata()?.permissions())
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn save(&self, result: &ScrapeResult) -> Result<(), StorageError> {
        let mut data = serde_json::to_vec_pretty(result)?;
        data.push(b'\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &data))
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?
    }

    async fn load(&self) -> Result<Option<ScrapeResult>, StorageError> {
        match fs::read(&self.path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// 测试用的内存存储实现（用于单元测试）
pub struct InMemoryStore {
    data: std::sync::Arc<tokio::sync::RwLock<Option<ScrapeResult>>>,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: std::sync::Arc::new(tokio::sync::RwLock::new(None)),
            fail_writes: false,
        }
    }

    /// 所有写入都失败的存储
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn save(&self, result: &ScrapeResult) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Other("write rejected".to_string()));
        }
        *self.data.write().await = Some(result.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ScrapeResult>, StorageError> {
        Ok(self.data.read().await.clone())
    }
}
