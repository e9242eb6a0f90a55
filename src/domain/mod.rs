// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：卡片、原始记录、教授记录和运行上下文
/// - 仓库接口（repositories）：结果持久化抽象接口
/// - 服务（services）：加载、滚动、提取、校验和健康检查
/// - 用例（use_cases）：一次完整的抓取流程
pub mod models;
pub mod repositories;
pub mod services;
pub mod use_cases;
