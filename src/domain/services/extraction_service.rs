// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::TargetSettings;
use crate::domain::models::card::CardHandle;
use crate::domain::models::raw_record::{FieldValue, RawRecord};
use crate::engines::traits::ElementSnapshot;
use crate::utils::errors::ConfigurationError;
use crate::utils::text_processing::{first_number, normalize_whitespace};
use crate::utils::url_utils::resolve_link;
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// 卡片提取器
///
/// 负责从卡片快照中按结构选择器读取各字段。提取只依赖快照内容，
/// 对同一批卡片重复提取得到完全相同的记录
pub struct CardExtractor {
    card_selector: String,
    name: Selector,
    department: Selector,
    rating: Selector,
    review_count: Selector,
    link: Selector,
    base_url: Url,
}

impl CardExtractor {
    /// 编译全部选择器
    ///
    /// # 返回值
    ///
    /// * `Ok(CardExtractor)` - 提取器
    /// * `Err(ConfigurationError)` - 选择器或根地址无效
    pub fn new(target: &TargetSettings) -> Result<Self, ConfigurationError> {
        let selectors = &target.selectors;
        // The card selector runs in the driver; compile it here only to reject it early.
        parse_selector("target.selectors.card", &selectors.card)?;

        let base_url = Url::parse(&target.base_url).map_err(|e| {
            ConfigurationError::Inconsistent(format!("target.base_url is not a valid URL: {}", e))
        })?;

        Ok(Self {
            card_selector: selectors.card.clone(),
            name: parse_selector("target.selectors.name", &selectors.name)?,
            department: parse_selector("target.selectors.department", &selectors.department)?,
            rating: parse_selector("target.selectors.rating", &selectors.rating)?,
            review_count: parse_selector("target.selectors.review_count", &selectors.review_count)?,
            link: parse_selector("target.selectors.link", &selectors.link)?,
            base_url,
        })
    }

    /// 在整页上匹配卡片的选择器
    pub fn card_selector(&self) -> &str {
        &self.card_selector
    }

    /// 为快照生成卡片句柄
    ///
    /// 标识优先使用解析后的链接，否则使用规范化的卡片文本
    pub fn identify(&self, snapshot: ElementSnapshot, seen_at: DateTime<Utc>) -> CardHandle {
        let fragment = Html::parse_fragment(&snapshot.outer_html);
        let id = match self.link_field(&fragment) {
            FieldValue::Present(url) => url,
            _ => {
                let text = normalize_whitespace(&fragment.root_element().text().collect::<String>());
                format!("text:{}", text)
            }
        };

        CardHandle {
            id,
            outer_html: snapshot.outer_html,
            first_seen_at: seen_at,
        }
    }

    /// 提取单张卡片
    pub fn extract(&self, card: &CardHandle) -> RawRecord {
        let fragment = Html::parse_fragment(&card.outer_html);

        let record = RawRecord {
            card_id: card.id.clone(),
            scraped_at: card.first_seen_at,
            name: text_field(first_text(&fragment, &self.name)),
            department: text_field(first_text(&fragment, &self.department)),
            rating: numeric_field(first_text(&fragment, &self.rating)),
            review_count: numeric_field(first_text(&fragment, &self.review_count)),
            url: self.link_field(&fragment),
        };

        log_field(&card.id, "name", &record.name);
        log_field(&card.id, "department", &record.department);
        log_field(&card.id, "rating", &record.rating);
        log_field(&card.id, "review_count", &record.review_count);
        log_field(&card.id, "url", &record.url);

        record
    }

    /// 按顺序提取全部卡片
    pub fn extract_all(&self, cards: &[CardHandle]) -> Vec<RawRecord> {
        cards.iter().map(|card| self.extract(card)).collect()
    }

    fn link_field(&self, fragment: &Html) -> FieldValue<String> {
        let href = fragment
            .select(&self.link)
            .find_map(|element| element.value().attr("href"));

        match href {
            None => FieldValue::Missing,
            Some(href) => match resolve_link(&self.base_url, href) {
                Ok(url) => FieldValue::Present(url.to_string()),
                Err(_) => FieldValue::Unparseable(href.to_string()),
            },
        }
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigurationError> {
    Selector::parse(selector).map_err(|_| ConfigurationError::InvalidSelector {
        field,
        selector: selector.to_string(),
    })
}

/// 第一个匹配元素的规范化文本；元素不存在时返回 `None`
fn first_text(fragment: &Html, selector: &Selector) -> Option<String> {
    fragment
        .select(selector)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
}

fn text_field(text: Option<String>) -> FieldValue<String> {
    match text {
        Some(text) if !text.is_empty() => FieldValue::Present(text),
        _ => FieldValue::Missing,
    }
}

fn numeric_field(text: Option<String>) -> FieldValue<f64> {
    match text {
        Some(text) if !text.is_empty() => match first_number(&text) {
            Some(value) => FieldValue::Present(value),
            None => FieldValue::Unparseable(text),
        },
        _ => FieldValue::Missing,
    }
}

fn log_field<T: fmt::Display>(card_id: &str, field: &'static str, value: &FieldValue<T>) {
    match value {
        FieldValue::Present(_) => {}
        FieldValue::Missing => warn!(card_id, field, "Card sub-element missing"),
        FieldValue::Unparseable(_) => debug!(card_id, field, value = %value, "Card field unparseable"),
    }
}
