// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::professor::ScrapeResult;
use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 结果存储特质
///
/// 定义抓取结果的持久化接口
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 保存抓取结果，覆盖已有内容；失败时已有内容保持不变
    async fn save(&self, result: &ScrapeResult) -> Result<(), StorageError>;

    /// 读取上次保存的抓取结果
    async fn load(&self) -> Result<Option<ScrapeResult>, StorageError>;
}
