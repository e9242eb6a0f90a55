// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScrollSettings;
use crate::domain::models::scrape_context::{ScrapeContext, ScrollOutcome};
use crate::domain::services::extraction_service::CardExtractor;
use crate::engines::traits::{ElementSnapshot, EngineError, PageDriver};
use crate::utils::retry_policy::{RetryDecision, RetryPolicy};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 滚动服务
///
/// 按固定增量滚动虚拟列表并累积新出现的卡片，直到内容稳定或达到次数上限
pub struct ScrollService {
    increment_px: i64,
    pause: Duration,
    max_attempts: u32,
    stable_iterations: u32,
    retry: RetryPolicy,
}

impl ScrollService {
    pub fn new(settings: &ScrollSettings, retry: RetryPolicy) -> Self {
        Self {
            increment_px: settings.increment_px,
            pause: settings.pause(),
            max_attempts: settings.max_attempts,
            stable_iterations: settings.stable_iterations,
            retry,
        }
    }

    /// 滚动并收集卡片
    ///
    /// 未稳定或瞬时错误过多时返回部分结果（见 `ScrollOutcome::is_partial`），
    /// 只有不可重试的驱动错误才会失败
    pub async fn collect<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        extractor: &CardExtractor,
        ctx: &mut ScrapeContext,
    ) -> Result<ScrollOutcome, EngineError> {
        let selector = extractor.card_selector();
        let mut stable = 0;
        let mut consecutive_failures = 0;

        for attempt in 1..=self.max_attempts {
            ctx.stats.settle_iterations = attempt;

            match self.settle(driver, selector).await {
                Ok(snapshots) => {
                    consecutive_failures = 0;
                    let now = Utc::now();
                    let new_cards = ctx.absorb(
                        snapshots
                            .into_iter()
                            .map(|snapshot| extractor.identify(snapshot, now)),
                    );

                    if new_cards == 0 {
                        stable += 1;
                        if stable >= self.stable_iterations {
                            info!(
                                iterations = attempt,
                                cards = ctx.card_count(),
                                "Scroll content stable"
                            );
                            return Ok(ScrollOutcome::Stable { iterations: attempt });
                        }
                    } else {
                        stable = 0;
                        debug!(attempt, new_cards, total = ctx.card_count(), "New cards rendered");
                    }
                }
                Err(e) if e.is_retryable() => {
                    consecutive_failures += 1;
                    ctx.stats.transient_errors += 1;
                    match self.retry.decide(consecutive_failures) {
                        RetryDecision::RetryAfter(delay) => {
                            warn!(attempt, error = %e, "Transient page error during scroll");
                            driver.wait(delay).await;
                        }
                        RetryDecision::GiveUp => {
                            warn!(
                                attempt,
                                failures = consecutive_failures,
                                cards = ctx.card_count(),
                                "Too many consecutive page errors; returning partial results"
                            );
                            return Ok(ScrollOutcome::RetriesExhausted);
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            max_attempts = self.max_attempts,
            cards = ctx.card_count(),
            "Scroll did not stabilize; returning partial results"
        );
        Ok(ScrollOutcome::AttemptsExhausted)
    }

    /// 一次滚动-等待-查询
    async fn settle<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        selector: &str,
    ) -> Result<Vec<ElementSnapshot>, EngineError> {
        driver.scroll_by(self.increment_px).await?;
        driver.wait(self.pause).await;
        driver.find_elements(selector).await
    }
}
