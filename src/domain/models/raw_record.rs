// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::fmt;

/// 单字段提取结果
///
/// 显式区分子元素缺失与文本无法解析两种失败
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    /// 成功提取
    Present(T),
    /// 子元素不存在或文本为空
    Missing,
    /// 文本存在但无法转换，保留原始文本
    Unparseable(String),
}

impl<T> FieldValue<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            FieldValue::Present(value) => Some(value),
            _ => None,
        }
    }

}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Present(value) => write!(f, "{}", value),
            FieldValue::Missing => write!(f, "<missing>"),
            FieldValue::Unparseable(raw) => write!(f, "<unparseable: {:?}>", raw),
        }
    }
}

/// 原始记录
///
/// 由提取器从单张卡片生成，尚未经过校验
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 来源卡片标识
    pub card_id: String,
    /// 卡片首次出现时间
    pub scraped_at: DateTime<Utc>,
    pub name: FieldValue<String>,
    pub department: FieldValue<String>,
    pub rating: FieldValue<f64>,
    /// 保留小数与符号，由校验器判定是否为非负整数
    pub review_count: FieldValue<f64>,
    pub url: FieldValue<String>,
}
