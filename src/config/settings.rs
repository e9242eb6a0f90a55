// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::utils::errors::ConfigurationError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

/// 应用程序配置设置
///
/// 包含目标页面、浏览器、滚动、重试、校验、输出和监控等所有配置项
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 目标页面配置
    #[validate(nested)]
    pub target: TargetSettings,
    /// 浏览器配置
    #[validate(nested)]
    pub browser: BrowserSettings,
    /// 滚动配置
    #[validate(nested)]
    pub scroll: ScrollSettings,
    /// 重试配置
    #[validate(nested)]
    pub retry: RetrySettings,
    /// 记录校验配置
    #[validate(nested)]
    pub validation: ValidationSettings,
    /// 输出配置
    pub output: OutputSettings,
    /// 健康监控配置
    #[validate(nested)]
    pub monitor: MonitorSettings,
}

/// 目标页面配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TargetSettings {
    /// 站点根地址，用于解析卡片中的相对链接
    #[validate(url)]
    pub base_url: String,
    /// 虚拟滚动列表页面地址
    #[validate(url)]
    pub search_url: String,
    /// 卡片结构选择器
    #[validate(nested)]
    pub selectors: CardSelectors,
}

/// 卡片结构选择器
///
/// `card` 在整页上匹配，其余选择器在单个卡片片段内匹配
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CardSelectors {
    #[validate(length(min = 1))]
    pub card: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(length(min = 1))]
    pub rating: String,
    #[validate(length(min = 1))]
    pub review_count: String,
    /// 带 `href` 的链接元素，可匹配卡片根元素本身
    #[validate(length(min = 1))]
    pub link: String,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 用户代理
    #[validate(length(min = 1))]
    pub user_agent: String,
    #[validate(range(min = 1))]
    pub window_width: u32,
    #[validate(range(min = 1))]
    pub window_height: u32,
    /// 页面加载超时时间（秒）
    #[validate(range(min = 1))]
    pub page_load_timeout_secs: u64,
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    #[serde(default)]
    pub remote_debugging_url: Option<String>,
}

/// 滚动配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScrollSettings {
    /// 每次滚动的像素增量
    #[validate(range(min = 1))]
    pub increment_px: i64,
    /// 每次滚动后的停顿时间（毫秒）
    pub pause_ms: u64,
    /// 导航完成后等待首屏渲染的时间（毫秒）
    pub initial_wait_ms: u64,
    /// 最大滚动次数
    #[validate(range(min = 1))]
    pub max_attempts: u32,
    /// 连续多少次无新卡片视为内容稳定
    #[validate(range(min = 1))]
    pub stable_iterations: u32,
}

impl ScrollSettings {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn initial_wait(&self) -> Duration {
        Duration::from_millis(self.initial_wait_ms)
    }
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RetrySettings {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    #[validate(range(min = 1))]
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    #[validate(range(min = 1))]
    pub max_backoff_ms: u64,
    /// 退避乘数
    #[validate(range(min = 1.0))]
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    #[validate(range(min = 0.0, max = 1.0))]
    pub jitter_factor: f64,
    pub enable_jitter: bool,
}

/// 记录校验配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidationSettings {
    pub min_rating: f64,
    pub max_rating: f64,
    #[validate(range(min = 1))]
    pub min_name_length: usize,
    #[validate(range(min = 1))]
    pub max_name_length: usize,
    /// 规范化（大写）后的院系名称需匹配的正则
    #[validate(length(min = 1))]
    pub department_pattern: String,
    /// 教授主页所在主机名
    #[validate(length(min = 1))]
    pub expected_host: String,
    /// 教授主页路径需匹配的正则
    #[validate(length(min = 1))]
    pub url_path_pattern: String,
    /// 允许的最大拒绝率，超过则整次运行失败
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_rejection_rate: f64,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 结果 JSON 文件路径
    pub path: PathBuf,
}

/// 健康监控配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MonitorSettings {
    /// 数据过期阈值（小时）
    #[validate(range(min = 1))]
    pub max_age_hours: i64,
    /// 低于该数量视为抓取可能失效
    pub low_count_threshold: usize,
    /// 达到该数量视为数据完整
    pub healthy_count_threshold: usize,
    /// 评分与院系信息的最低覆盖率
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_coverage: f64,
}

impl Settings {
    /// 加载配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// `explicit` 指定的文件和环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut builder = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("POLYSCRAPE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅包含内置默认值的配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults()?.build()?.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Target page
            .set_default("target.base_url", "https://polyratings.dev")?
            .set_default("target.search_url", "https://polyratings.dev/search/name")?
            .set_default("target.selectors.card", "div.absolute > a")?
            .set_default("target.selectors.name", "h3")?
            .set_default("target.selectors.department", "h3 + p")?
            .set_default(
                "target.selectors.rating",
                "div.flex.items-center.justify-end > div:last-child",
            )?
            .set_default("target.selectors.review_count", "p.text-sm")?
            .set_default("target.selectors.link", "a[href]")?
            // Browser
            .set_default("browser.headless", true)?
            .set_default(
                "browser.user_agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )?
            .set_default("browser.window_width", 1920)?
            .set_default("browser.window_height", 1080)?
            .set_default("browser.page_load_timeout_secs", 30)?
            // Scroll
            .set_default("scroll.increment_px", 800)?
            .set_default("scroll.pause_ms", 150)?
            .set_default("scroll.initial_wait_ms", 5000)?
            .set_default("scroll.max_attempts", 500)?
            .set_default("scroll.stable_iterations", 1)?
            // Retry
            .set_default("retry.max_retries", 3)?
            .set_default("retry.initial_backoff_ms", 500)?
            .set_default("retry.max_backoff_ms", 10_000)?
            .set_default("retry.backoff_multiplier", 2.0)?
            .set_default("retry.jitter_factor", 0.1)?
            .set_default("retry.enable_jitter", true)?
            // Validation
            .set_default("validation.min_rating", 1.0)?
            .set_default("validation.max_rating", 5.0)?
            .set_default("validation.min_name_length", 2)?
            .set_default("validation.max_name_length", 100)?
            .set_default("validation.department_pattern", "^[A-Z]{2,5}$")?
            .set_default("validation.expected_host", "polyratings.dev")?
            .set_default(
                "validation.url_path_pattern",
                "^/professor/[0-9a-fA-F-]{36}$",
            )?
            .set_default("validation.max_rejection_rate", 0.5)?
            // Output
            .set_default("output.path", "data/professors.json")?
            // Monitor
            .set_default("monitor.max_age_hours", 24)?
            .set_default("monitor.low_count_threshold", 1000)?
            .set_default("monitor.healthy_count_threshold", 2000)?
            .set_default("monitor.min_coverage", 0.8)
    }

    /// 校验配置的取值范围及字段间约束
    ///
    /// 必须在启动浏览器之前调用
    pub fn ensure_valid(&self) -> Result<(), ConfigurationError> {
        self.validate()?;

        let v = &self.validation;
        if v.min_rating > v.max_rating {
            return Err(ConfigurationError::Inconsistent(format!(
                "validation.min_rating ({}) exceeds validation.max_rating ({})",
                v.min_rating, v.max_rating
            )));
        }
        if v.min_name_length > v.max_name_length {
            return Err(ConfigurationError::Inconsistent(format!(
                "validation.min_name_length ({}) exceeds validation.max_name_length ({})",
                v.min_name_length, v.max_name_length
            )));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigurationError::Inconsistent(
                "retry.initial_backoff_ms exceeds retry.max_backoff_ms".to_string(),
            ));
        }
        if self.monitor.low_count_threshold > self.monitor.healthy_count_threshold {
            return Err(ConfigurationError::Inconsistent(
                "monitor.low_count_threshold exceeds monitor.healthy_count_threshold".to_string(),
            ));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigurationError::Inconsistent(
                "output.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
