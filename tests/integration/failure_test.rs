// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 致命错误测试
///
/// 配置错误、页面结构变化和输出失败都应终止运行且不写出结果
#[cfg(test)]
mod tests {
    use crate::helpers::{test_settings, VirtualScrollPage};
    use polyscrape::domain::use_cases::scrape_use_case::ScrapeUseCase;
    use polyscrape::infrastructure::storage::{InMemoryStore, JsonFileStore};
    use polyscrape::utils::errors::{ConfigurationError, FatalStructureError, ScrapeError};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_zero_cards_on_first_load_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store).unwrap();
        let page = VirtualScrollPage::numbered(0);

        let err = use_case.execute(&page).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FatalStructure(FatalStructureError::NoCardsOnInitialLoad { .. })
        ));
        assert_eq!(err.exit_code(), 1);
        // One poll plus three retries.
        assert_eq!(page.queries(), 4);
        assert_eq!(page.scrolls(), 0);
        assert!(!settings.output.path.exists());
    }

    #[tokio::test]
    async fn test_failed_run_leaves_previous_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::create_dir_all(settings.output.path.parent().unwrap()).unwrap();
        std::fs::write(&settings.output.path, "previous").unwrap();

        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store).unwrap();
        assert!(use_case
            .execute(&VirtualScrollPage::numbered(0))
            .await
            .is_err());

        assert_eq!(
            std::fs::read_to_string(&settings.output.path).unwrap(),
            "previous"
        );
    }

    #[tokio::test]
    async fn test_unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "keep").unwrap();
        settings.output.path = blocker.join("professors.json");

        let store = Arc::new(JsonFileStore::new(&settings.output.path));
        let use_case = ScrapeUseCase::new(&settings, store).unwrap();

        let err = use_case
            .execute(&VirtualScrollPage::numbered(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FatalStructure(FatalStructureError::OutputWrite(_))
        ));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "keep");

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let use_case = ScrapeUseCase::new(&settings, Arc::new(InMemoryStore::failing())).unwrap();

        let err = use_case
            .execute(&VirtualScrollPage::numbered(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FatalStructure(FatalStructureError::OutputWrite(_))
        ));
    }

    #[tokio::test]
    async fn test_navigation_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let use_case = ScrapeUseCase::new(&settings, Arc::new(InMemoryStore::new())).unwrap();
        let page = VirtualScrollPage::numbered(3).failing_navigations(10);

        let err = use_case.execute(&page).await.unwrap_err();
        assert!(matches!(err, ScrapeError::PageLoad(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(page.navigations(), 4);
        assert_eq!(page.queries(), 0);
    }

    #[test]
    fn test_negative_increment_rejected_before_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.scroll.increment_px = -800;

        let result = ScrapeUseCase::new(&settings, Arc::new(InMemoryStore::new()));
        let err = ScrapeError::from(result.err().unwrap());
        assert!(matches!(
            err,
            ScrapeError::Configuration(ConfigurationError::Invalid(_))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_card_selector_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.target.selectors.card = "div[".to_string();

        let result = ScrapeUseCase::new(&settings, Arc::new(InMemoryStore::new()));
        assert!(matches!(
            result.err(),
            Some(ConfigurationError::InvalidSelector { field: "target.selectors.card", .. })
        ));
    }

    #[test]
    fn test_invalid_department_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(dir.path());
        settings.validation.department_pattern = "^[A-Z".to_string();

        let result = ScrapeUseCase::new(&settings, Arc::new(InMemoryStore::new()));
        assert!(matches!(
            result.err(),
            Some(ConfigurationError::InvalidPattern { .. })
        ));
    }
}
