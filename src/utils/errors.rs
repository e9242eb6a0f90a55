// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::storage_repository::StorageError;
use crate::engines::traits::EngineError;
use thiserror::Error;

/// 配置错误类型
///
/// 在任何导航发生之前终止运行
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("配置加载失败: {0}")]
    Load(#[from] config::ConfigError),

    #[error("配置取值无效: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("配置不一致: {0}")]
    Inconsistent(String),

    #[error("无效的选择器 {field}: {selector}")]
    InvalidSelector { field: &'static str, selector: String },

    #[error("无效的正则 {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// 结构性致命错误
///
/// 页面结构变化或输出失败，整次运行以非零码退出
#[derive(Error, Debug)]
pub enum FatalStructureError {
    #[error("初始加载未发现任何卡片 (selector: {selector})")]
    NoCardsOnInitialLoad { selector: String },

    #[error("拒绝率过高: {rejected}/{extracted} 超过阈值 {threshold}")]
    RejectionThresholdExceeded {
        rejected: usize,
        extracted: usize,
        threshold: f64,
    },

    #[error("没有任何有效记录")]
    NoValidRecords,

    #[error("输出写入失败: {0}")]
    OutputWrite(#[from] StorageError),
}

/// 抓取运行错误
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    FatalStructure(#[from] FatalStructureError),

    #[error("页面加载失败: {0}")]
    PageLoad(#[source] EngineError),

    #[error("浏览器错误: {0}")]
    Browser(#[from] EngineError),
}

impl ScrapeError {
    /// 进程退出码：配置错误为 2，其余致命错误为 1
    pub fn exit_code(&self) -> u8 {
        match self {
            ScrapeError::Configuration(_) => 2,
            _ => 1,
        }
    }
}
