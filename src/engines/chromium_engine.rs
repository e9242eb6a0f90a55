// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::dom;
use crate::engines::traits::{ElementSnapshot, EngineError, PageDriver};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Chromium引擎
///
/// 基于chromiumoxide实现的页面驱动，单浏览器会话、单页面
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    page_load_timeout: Duration,
}

impl ChromiumDriver {
    /// 启动（或连接）浏览器并打开一个空白页面
    ///
    /// 设置了 `remote_debugging_url` 时连接远程 Chrome，否则本地启动
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, EngineError> {
        let remote_debugging_url = settings
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            let config = browser_config(settings).map_err(EngineError::Launch)?;
            Browser::launch(config)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        if remote_debugging_url.is_some() {
            page.set_user_agent(settings.user_agent.as_str())
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?;
        }

        Ok(Self {
            browser,
            page,
            handler,
            page_load_timeout: Duration::from_secs(settings.page_load_timeout_secs),
        })
    }

    /// 关闭浏览器会话
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "Failed to close browser cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "Browser process wait failed");
        }
        self.handler.abort();
    }
}

fn browser_config(settings: &BrowserSettings) -> Result<BrowserConfig, String> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .request_timeout(Duration::from_secs(settings.page_load_timeout_secs))
        .window_size(settings.window_width, settings.window_height)
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg(format!("--user-agent={}", settings.user_agent));

    if !settings.headless {
        builder = builder.with_head();
    }

    builder.build()
}

pub(crate) fn scroll_script(px: i64) -> String {
    format!("window.scrollBy(0, {});", px)
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<(), EngineError> {
        tokio::time::timeout(self.page_load_timeout, self.page.goto(url))
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<ElementSnapshot>, EngineError> {
        // Snapshot the live DOM; virtual scrolling recycles element handles.
        let content = self
            .page
            .content()
            .await
            .map_err(|e| EngineError::ElementQuery(e.to_string()))?;

        dom::select_snapshots(&content, selector)
    }

    async fn scroll_by(&self, px: i64) -> Result<(), EngineError> {
        self.page
            .evaluate(scroll_script(px))
            .await
            .map_err(|e| EngineError::Script(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
