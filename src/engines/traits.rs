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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 元素查询失败
    #[error("Element query failed: {0}")]
    ElementQuery(String),
    /// 脚本执行失败
    #[error("Script failed: {0}")]
    Script(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 单次迭代内的页面错误（超时、查询失败等）返回true，浏览器级错误返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Navigation(_)
            | EngineError::ElementQuery(_)
            | EngineError::Script(_)
            | EngineError::Timeout => true,
            EngineError::Launch(_) | EngineError::Other(_) => false,
        }
    }
}

/// 元素快照
///
/// 查询时刻元素的外层HTML，与实时DOM脱钩，虚拟滚动回收元素后依然可用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub outer_html: String,
}

impl ElementSnapshot {
    pub fn new(outer_html: impl Into<String>) -> Self {
        Self {
            outer_html: outer_html.into(),
        }
    }
}

/// 页面驱动特质
///
/// 浏览器自动化驱动的最小接口。所有等待都经由 `wait`，
/// 测试驱动可以据此模拟瞬时时间
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定URL
    async fn navigate(&self, url: &str) -> Result<(), EngineError>;

    /// 查询当前已渲染的匹配元素
    async fn find_elements(&self, selector: &str) -> Result<Vec<ElementSnapshot>, EngineError>;

    /// 纵向滚动指定像素
    async fn scroll_by(&self, px: i64) -> Result<(), EngineError>;

    /// 等待指定时长
    async fn wait(&self, duration: Duration);

    /// 驱动名称
    fn name(&self) -> &'static str;
}
