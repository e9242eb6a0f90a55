// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::professor::{ProfessorRecord, ScrapeResult};
use crate::domain::models::scrape_context::{RunStats, ScrapeContext, ScrollOutcome};
use crate::domain::repositories::storage_repository::ResultStore;
use crate::domain::services::extraction_service::CardExtractor;
use crate::domain::services::page_loader::PageLoader;
use crate::domain::services::scroll_service::ScrollService;
use crate::domain::services::validation_service::RecordValidator;
use crate::engines::traits::PageDriver;
use crate::utils::errors::{ConfigurationError, FatalStructureError, ScrapeError};
use crate::utils::retry_policy::RetryPolicy;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// 单次运行的摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub total_professors: usize,
    pub stats: RunStats,
}

impl RunSummary {
    /// 滚动是否提前结束
    pub fn is_partial(&self) -> bool {
        self.stats
            .scroll_outcome
            .is_some_and(|outcome| outcome.is_partial())
    }
}

/// 抓取用例
///
/// 加载页面、滚动收集、提取、校验、去重并写出结果
pub struct ScrapeUseCase<S: ResultStore> {
    loader: PageLoader,
    scroller: ScrollService,
    extractor: CardExtractor,
    validator: RecordValidator,
    max_rejection_rate: f64,
    store: Arc<S>,
}

impl<S: ResultStore> ScrapeUseCase<S> {
    /// 根据配置构建用例
    ///
    /// 所有配置错误都在这里暴露，此时尚未接触浏览器
    pub fn new(settings: &Settings, store: Arc<S>) -> Result<Self, ConfigurationError> {
        settings.ensure_valid()?;

        let retry = RetryPolicy::from(&settings.retry);
        Ok(Self {
            loader: PageLoader::new(settings, retry.clone()),
            scroller: ScrollService::new(&settings.scroll, retry),
            extractor: CardExtractor::new(&settings.target)?,
            validator: RecordValidator::new(&settings.validation)?,
            max_rejection_rate: settings.validation.max_rejection_rate,
            store,
        })
    }

    pub async fn execute<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
    ) -> Result<RunSummary, ScrapeError> {
        let mut ctx = ScrapeContext::new();
        let span = info_span!("scrape_run", run_id = %ctx.run_id, driver = driver.name());
        self.run(driver, &mut ctx).instrument(span).await
    }

    async fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        ctx: &mut ScrapeContext,
    ) -> Result<RunSummary, ScrapeError> {
        info!("Starting scrape run");

        self.loader.load(driver, &self.extractor, ctx).await?;

        let outcome = self.scroller.collect(driver, &self.extractor, ctx).await?;
        ctx.stats.scroll_outcome = Some(outcome);
        if let ScrollOutcome::Stable { iterations } = outcome {
            info!(iterations, cards = ctx.card_count(), "Scrolling finished");
        }

        let raw_records = self.extractor.extract_all(ctx.cards());
        ctx.stats.extracted = raw_records.len();

        let mut professors = Vec::with_capacity(raw_records.len());
        for raw in raw_records {
            match self.validator.validate(raw) {
                Ok(record) => professors.push(record),
                Err(e) => {
                    ctx.stats.rejected += 1;
                    warn!(card_id = %e.card_id, reasons = %e, "Record rejected");
                }
            }
        }

        self.check_rejection_rate(&ctx.stats)?;

        let professors = dedupe_by_url(professors, &mut ctx.stats);
        if professors.is_empty() {
            return Err(FatalStructureError::NoValidRecords.into());
        }
        ctx.stats.accepted = professors.len();

        let result = ScrapeResult::new(ctx.started_at, professors);
        self.store
            .save(&result)
            .await
            .map_err(FatalStructureError::OutputWrite)?;

        let summary = RunSummary {
            run_id: ctx.run_id,
            total_professors: result.total_professors,
            stats: ctx.stats.clone(),
        };
        info!(
            total = summary.total_professors,
            accepted = summary.stats.accepted,
            rejected = summary.stats.rejected,
            duplicates = summary.stats.duplicate_urls,
            transient_errors = summary.stats.transient_errors,
            partial = summary.is_partial(),
            "Scrape run complete"
        );
        Ok(summary)
    }

    fn check_rejection_rate(&self, stats: &RunStats) -> Result<(), FatalStructureError> {
        if stats.extracted == 0 {
            return Ok(());
        }
        let rate = stats.rejected as f64 / stats.extracted as f64;
        if rate > self.max_rejection_rate {
            return Err(FatalStructureError::RejectionThresholdExceeded {
                rejected: stats.rejected,
                extracted: stats.extracted,
                threshold: self.max_rejection_rate,
            });
        }
        Ok(())
    }
}

/// 按 URL 去重，保留首次出现的记录
fn dedupe_by_url(professors: Vec<ProfessorRecord>, stats: &mut RunStats) -> Vec<ProfessorRecord> {
    let mut seen = HashSet::with_capacity(professors.len());
    professors
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.url.clone());
            if !fresh {
                stats.duplicate_urls += 1;
                warn!(url = %record.url, "Duplicate professor URL dropped");
            }
            fresh
        })
        .collect()
}
