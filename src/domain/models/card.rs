// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};

/// 卡片句柄
///
/// 一张已渲染教授卡片的脱钩快照。`id` 为解析后的主页链接，
/// 缺少链接时退化为卡片文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHandle {
    /// 卡片标识，滚动去重的依据
    pub id: String,
    /// 卡片外层HTML
    pub outer_html: String,
    /// 首次出现时间
    pub first_seen_at: DateTime<Utc>,
}
