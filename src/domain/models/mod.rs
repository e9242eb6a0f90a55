// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了抓取流程中的核心数据：
/// - 卡片（card）：滚动过程中捕获的卡片快照
/// - 原始记录（raw_record）：带有逐字段提取结果的未校验记录
/// - 教授记录（professor）：通过校验的记录及最终抓取结果
/// - 运行上下文（scrape_context）：单次运行的累积状态与统计
pub mod card;
pub mod professor;
pub mod raw_record;
pub mod scrape_context;
