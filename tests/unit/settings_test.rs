// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置分层加载和校验
#[cfg(test)]
mod tests {
    use polyscrape::config::settings::Settings;
    use polyscrape::utils::errors::ConfigurationError;

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polyscrape.toml");
        std::fs::write(&path, "[scroll]\npause_ms = 400\nincrement_px = 600\n").unwrap();

        std::env::set_var("POLYSCRAPE__SCROLL__INCREMENT_PX", "1200");
        let settings = Settings::load(Some(&path));
        std::env::remove_var("POLYSCRAPE__SCROLL__INCREMENT_PX");

        let settings = settings.unwrap();
        assert_eq!(settings.scroll.increment_px, 1200);
        assert_eq!(settings.scroll.pause_ms, 400);
        settings.ensure_valid().unwrap();
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("absent.toml")));

        let err = ConfigurationError::from(result.unwrap_err());
        assert!(matches!(err, ConfigurationError::Load(_)));
    }

    #[test]
    fn test_backoff_bounds_must_be_ordered() {
        let mut settings = Settings::defaults().unwrap();
        settings.retry.initial_backoff_ms = 20_000;

        assert!(matches!(
            settings.ensure_valid(),
            Err(ConfigurationError::Inconsistent(_))
        ));
    }
}
