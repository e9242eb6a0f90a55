// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取流程集成测试
///
/// 在虚拟滚动模拟页面上运行完整流程并检查写出的结果文件
#[cfg(test)]
mod tests {
    use crate::helpers::{professor_url, test_settings, VirtualScrollPage};
    use polyscrape::domain::models::scrape_context::ScrollOutcome;
    use polyscrape::domain::repositories::storage_repository::ResultStore;
    use polyscrape::domain::use_cases::scrape_use_case::ScrapeUseCase;
    use polyscrape::infrastructure::storage::JsonFileStore;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_small_page_stabilizes_after_one_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store.clone()).unwrap();
        let page = VirtualScrollPage::numbered(3);

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(summary.total_professors, 3);
        assert!(summary.stats.settle_iterations <= 1);
        assert_eq!(
            summary.stats.scroll_outcome,
            Some(ScrollOutcome::Stable { iterations: 1 })
        );
        assert!(!summary.is_partial());

        let result = store.load().await.unwrap().unwrap();
        assert_eq!(result.total_professors, 3);
        assert_eq!(result.professors.len(), 3);
        assert_eq!(page.navigations(), 1);
    }

    #[tokio::test]
    async fn test_recycled_cards_are_all_captured_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store.clone()).unwrap();
        let page = VirtualScrollPage::numbered(40);

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(
            summary.stats.scroll_outcome,
            Some(ScrollOutcome::Stable { iterations: 5 })
        );

        let result = store.load().await.unwrap().unwrap();
        let urls: Vec<_> = result.professors.iter().map(|p| p.url.clone()).collect();
        let expected: Vec<_> = (0..40).map(professor_url).collect();
        assert_eq!(urls, expected);
        assert_eq!(result.total_professors, result.professors.len());
    }

    #[tokio::test]
    async fn test_written_records_satisfy_invariants() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store.clone()).unwrap();

        use_case
            .execute(&VirtualScrollPage::numbered(25))
            .await
            .unwrap();

        let result = store.load().await.unwrap().unwrap();
        let department = regex::Regex::new(&settings.validation.department_pattern).unwrap();
        let mut urls = HashSet::new();
        for professor in &result.professors {
            assert!(urls.insert(professor.url.clone()), "duplicate {}", professor.url);
            assert!(!professor.name.is_empty());
            assert!(department.is_match(&professor.department));
            assert_eq!(professor.department, "CSC");
            if let Some(rating) = professor.rating {
                assert!((1.0..=5.0).contains(&rating));
            }
            assert!(professor.url.starts_with("https://polyratings.dev/professor/"));
        }
        assert_eq!(result.total_professors, 25);
    }

    #[tokio::test]
    async fn test_endless_page_returns_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.scroll.max_attempts = 50;
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store.clone()).unwrap();
        let page = VirtualScrollPage::numbered(10).endless();

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(
            summary.stats.scroll_outcome,
            Some(ScrollOutcome::AttemptsExhausted)
        );
        assert!(summary.is_partial());
        assert_eq!(summary.stats.settle_iterations, 50);
        assert_eq!(page.scrolls(), 50);

        let result = store.load().await.unwrap().unwrap();
        assert_eq!(result.total_professors, 60);
    }

    #[tokio::test]
    async fn test_transient_query_errors_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store).unwrap();
        let page = VirtualScrollPage::numbered(3).failing_queries([2, 3]);

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(summary.stats.transient_errors, 2);
        assert_eq!(
            summary.stats.scroll_outcome,
            Some(ScrollOutcome::Stable { iterations: 3 })
        );

        let waits = page.waits();
        assert!(waits.contains(&Duration::from_millis(500)));
        assert!(waits.contains(&Duration::from_millis(1000)));
    }

    #[tokio::test]
    async fn test_persistent_query_errors_keep_captured_cards() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store.clone()).unwrap();
        let page = VirtualScrollPage::numbered(12).failing_queries_after(1);

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(
            summary.stats.scroll_outcome,
            Some(ScrollOutcome::RetriesExhausted)
        );
        assert_eq!(summary.stats.transient_errors, 4);
        assert_eq!(summary.total_professors, 10);
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_navigation_retries_then_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store).unwrap();
        let page = VirtualScrollPage::numbered(3).failing_navigations(2);

        let summary = use_case.execute(&page).await.unwrap();
        assert_eq!(page.navigations(), 3);
        assert_eq!(summary.stats.transient_errors, 2);
    }
}
