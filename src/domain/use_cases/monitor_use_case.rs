// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MonitorSettings;
use crate::domain::repositories::storage_repository::ResultStore;
use crate::domain::services::health_service::{self, HealthReport};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::error;

/// 健康检查结果
#[derive(Debug, Clone)]
pub enum MonitorOutcome {
    /// 已加载结果文件并完成评估
    Report(HealthReport),
    /// 结果文件不存在或无法读取
    NoData,
}

impl MonitorOutcome {
    /// 进程退出码：无数据时为 1，否则取报告状态
    pub fn exit_code(&self) -> u8 {
        match self {
            MonitorOutcome::Report(report) => report.status.exit_code(),
            MonitorOutcome::NoData => 1,
        }
    }
}

/// 健康检查用例
pub struct MonitorUseCase<S: ResultStore> {
    settings: MonitorSettings,
    store: Arc<S>,
}

impl<S: ResultStore> MonitorUseCase<S> {
    pub fn new(settings: &MonitorSettings, store: Arc<S>) -> Self {
        Self {
            settings: settings.clone(),
            store,
        }
    }

    pub async fn execute(&self, now: DateTime<Utc>) -> MonitorOutcome {
        match self.store.load().await {
            Ok(Some(result)) => {
                MonitorOutcome::Report(health_service::assess(&result, now, &self.settings))
            }
            Ok(None) => {
                error!("No scrape result found");
                MonitorOutcome::NoData
            }
            Err(e) => {
                error!(error = %e, "Failed to read scrape result");
                MonitorOutcome::NoData
            }
        }
    }
}
