// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：从卡片 HTML 中解析字段
/// - 健康服务（health_service）：评估已写出的结果
/// - 页面加载（page_loader）：导航并等待首批卡片
/// - 滚动服务（scroll_service）：滚动虚拟列表并累积卡片
/// - 校验服务（validation_service）：过滤不合格的记录
pub mod extraction_service;
pub mod health_service;
pub mod page_loader;
pub mod scroll_service;
pub mod validation_service;
