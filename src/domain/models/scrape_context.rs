// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::card::CardHandle;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// 滚动结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// 连续若干次迭代没有新卡片
    Stable { iterations: u32 },
    /// 达到最大滚动次数，结果可能不完整
    AttemptsExhausted,
    /// 连续的瞬时错误超过重试上限，结果可能不完整
    RetriesExhausted,
}

impl ScrollOutcome {
    pub fn is_partial(&self) -> bool {
        !matches!(self, ScrollOutcome::Stable { .. })
    }
}

/// 运行统计
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub settle_iterations: u32,
    pub transient_errors: u32,
    pub duplicate_urls: usize,
    pub extracted: usize,
    pub rejected: usize,
    pub accepted: usize,
    pub scroll_outcome: Option<ScrollOutcome>,
}

/// 单次运行的上下文
///
/// 累积滚动中捕获的卡片（按首次出现顺序）与运行统计，生命周期限于一次运行
#[derive(Debug)]
pub struct ScrapeContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stats: RunStats,
    cards: Vec<CardHandle>,
    seen: HashSet<String>,
}

impl ScrapeContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            stats: RunStats::default(),
            cards: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// 吸收一批卡片，返回其中新出现的数量
    pub fn absorb(&mut self, cards: impl IntoIterator<Item = CardHandle>) -> usize {
        let before = self.cards.len();
        for card in cards {
            if self.seen.insert(card.id.clone()) {
                self.cards.push(card);
            }
        }
        self.cards.len() - before
    }

    pub fn cards(&self) -> &[CardHandle] {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl Default for ScrapeContext {
    fn default() -> Self {
        Self::new()
    }
}
