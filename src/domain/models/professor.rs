// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 教授记录
///
/// 通过校验的记录，创建后不再修改。`url` 在单次抓取内唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorRecord {
    /// 教授姓名
    pub name: String,
    /// 院系（已规范为大写）
    pub department: String,
    /// 评分，未评分时为 `null`
    pub rating: Option<f64>,
    /// 评价数量
    pub review_count: Option<u64>,
    /// 教授主页地址
    pub url: String,
    /// 卡片首次出现时间
    pub scraped_at: DateTime<Utc>,
}

/// 抓取结果
///
/// 每次运行生成一次，`professors` 按滚动中首次出现的顺序排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// 运行开始时间
    pub scraped_at: DateTime<Utc>,
    /// 有效记录数量，始终等于 `professors.len()`
    pub total_professors: usize,
    pub professors: Vec<ProfessorRecord>,
}

impl ScrapeResult {
    /// 创建一个新的抓取结果
    ///
    /// # 参数
    ///
    /// * `scraped_at` - 运行开始时间
    /// * `professors` - 已校验且去重的记录
    pub fn new(scraped_at: DateTime<Utc>, professors: Vec<ProfessorRecord>) -> Self {
        Self {
            scraped_at,
            total_professors: professors.len(),
            professors,
        }
    }
}
