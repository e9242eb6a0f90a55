// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::scrape_context::ScrapeContext;
use crate::domain::services::extraction_service::CardExtractor;
use crate::engines::traits::PageDriver;
use crate::utils::errors::{FatalStructureError, ScrapeError};
use crate::utils::retry_policy::{RetryDecision, RetryPolicy};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 页面加载器
///
/// 导航到目标页面并等待首批卡片渲染
pub struct PageLoader {
    search_url: String,
    initial_wait: Duration,
    retry: RetryPolicy,
}

impl PageLoader {
    pub fn new(settings: &Settings, retry: RetryPolicy) -> Self {
        Self {
            search_url: settings.target.search_url.clone(),
            initial_wait: settings.scroll.initial_wait(),
            retry,
        }
    }

    /// 加载页面并捕获首批卡片
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 首批卡片数量（至少为1）
    /// * `Err(ScrapeError)` - 导航失败或始终没有卡片
    pub async fn load<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        extractor: &CardExtractor,
        ctx: &mut ScrapeContext,
    ) -> Result<usize, ScrapeError> {
        self.navigate(driver, ctx).await?;
        driver.wait(self.initial_wait).await;

        let selector = extractor.card_selector();
        let mut polls = 0;
        loop {
            match driver.find_elements(selector).await {
                Ok(snapshots) if !snapshots.is_empty() => {
                    let now = Utc::now();
                    let captured = ctx.absorb(
                        snapshots
                            .into_iter()
                            .map(|snapshot| extractor.identify(snapshot, now)),
                    );
                    info!(cards = captured, "Initial content rendered");
                    return Ok(captured);
                }
                Ok(_) => debug!(poll = polls + 1, "No cards rendered yet"),
                Err(e) if e.is_retryable() => {
                    ctx.stats.transient_errors += 1;
                    warn!(poll = polls + 1, error = %e, "Initial card query failed");
                }
                Err(e) => return Err(ScrapeError::Browser(e)),
            }

            polls += 1;
            match self.retry.decide(polls) {
                RetryDecision::RetryAfter(delay) => driver.wait(delay).await,
                RetryDecision::GiveUp => {
                    return Err(FatalStructureError::NoCardsOnInitialLoad {
                        selector: selector.to_string(),
                    }
                    .into())
                }
            }
        }
    }

    async fn navigate<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        ctx: &mut ScrapeContext,
    ) -> Result<(), ScrapeError> {
        let mut failures = 0;
        loop {
            match driver.navigate(&self.search_url).await {
                Ok(()) => {
                    info!(url = %self.search_url, driver = driver.name(), "Page loaded");
                    return Ok(());
                }
                Err(e) if e.is_retryable() => {
                    failures += 1;
                    ctx.stats.transient_errors += 1;
                    match self.retry.decide(failures) {
                        RetryDecision::RetryAfter(delay) => {
                            warn!(attempt = failures, error = %e, "Navigation failed, retrying");
                            driver.wait(delay).await;
                        }
                        RetryDecision::GiveUp => return Err(ScrapeError::PageLoad(e)),
                    }
                }
                Err(e) => return Err(ScrapeError::PageLoad(e)),
            }
        }
    }
}
