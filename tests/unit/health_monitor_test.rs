// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 健康监控测试
///
/// 对写出的结果文件进行评估
#[cfg(test)]
mod tests {
    use crate::helpers::{test_settings, VirtualScrollPage};
    use chrono::{Duration, Utc};
    use polyscrape::domain::repositories::storage_repository::ResultStore;
    use polyscrape::domain::services::health_service::{assess, Finding, HealthStatus};
    use polyscrape::domain::use_cases::scrape_use_case::ScrapeUseCase;
    use polyscrape::infrastructure::storage::JsonFileStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fresh_small_result_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        ScrapeUseCase::new(&settings, store.clone())
            .unwrap()
            .execute(&VirtualScrollPage::numbered(20))
            .await
            .unwrap();

        let result = store.load().await.unwrap().unwrap();
        let report = assess(&result, Utc::now(), &settings.monitor);
        assert!(report.is_fresh);
        assert_eq!(report.total_professors, 20);
        assert_eq!(report.with_departments, 20);
        assert_eq!(report.departments_count, 1);
        assert_eq!(report.status, HealthStatus::Warning);
        assert!(report
            .findings
            .contains(&Finding::LowProfessorCount { total: 20 }));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["total_professors"], 20);
    }

    #[tokio::test]
    async fn test_old_result_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        ScrapeUseCase::new(&settings, store.clone())
            .unwrap()
            .execute(&VirtualScrollPage::numbered(5))
            .await
            .unwrap();

        let result = store.load().await.unwrap().unwrap();
        let report = assess(&result, Utc::now() + Duration::hours(30), &settings.monitor);
        assert!(!report.is_fresh);
        assert_eq!(report.status, HealthStatus::Critical);
        assert_eq!(report.status.exit_code(), 2);
    }
}
