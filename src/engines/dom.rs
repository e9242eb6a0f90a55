// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{ElementSnapshot, EngineError};
use scraper::{Html, Selector};

/// 从整页HTML中选取匹配元素并生成快照
pub fn select_snapshots(html: &str, selector: &str) -> Result<Vec<ElementSnapshot>, EngineError> {
    let parsed = Selector::parse(selector)
        .map_err(|e| EngineError::ElementQuery(format!("invalid selector {}: {}", selector, e)))?;

    let document = Html::parse_document(html);
    Ok(document
        .select(&parsed)
        .map(|element| ElementSnapshot::new(element.html()))
        .collect())
}
