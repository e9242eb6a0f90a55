// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域用例模块
///
/// - 健康检查（monitor_use_case）：读取结果文件并评估
/// - 抓取（scrape_use_case）：加载、滚动、提取、校验并写出结果
pub mod monitor_use_case;
pub mod scrape_use_case;
